//! Capabilities the scroll mode consumes from its environment.
//!
//! The rendering engine, the page-event bus and the surface element are all
//! external. These traits are the seams; the browser binding lives in
//! [`crate::dom`], tests use recording fakes.

use crate::camera::{CameraBound, CameraSyncMode, ContainRect, MoveCamera};
use crate::input::{WheelDelta, WheelVerdict};
use crate::lifecycle::Disposer;
use crate::viewport::ViewportSize;

/// Error returned when a host capability cannot be acquired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("failed to attach {what} listener: {reason}")]
    Attach { what: &'static str, reason: String },
}

/// Callback receiving the rendered element's size.
pub type SizeListener = Box<dyn FnMut(ViewportSize)>;

/// Callback fired once the host surface is ready.
pub type ReadyListener = Box<dyn FnMut()>;

/// Callback for one wheel event; the return value says how to treat the native event.
pub type WheelHandler = Box<dyn FnMut(WheelDelta) -> WheelVerdict>;

/// The whiteboard rendering surface.
pub trait RenderHost {
    fn move_camera(&self, directive: MoveCamera);
    fn move_camera_to_contain(&self, rect: ContainRect);
    fn set_camera_bound(&self, bound: CameraBound);

    fn camera_sync_mode(&self) -> CameraSyncMode;
    fn set_camera_sync_mode(&self, mode: CameraSyncMode);

    /// Whether the local participant may write shared state.
    fn writable(&self) -> bool;

    /// Report size changes of the primary rendering surface.
    fn on_size_change(&self, listener: SizeListener) -> Disposer;

    /// Fire `listener` when the host signals readiness.
    fn on_ready(&self, listener: ReadyListener) -> Disposer;
}

/// Outbound event channel for the derived page.
pub trait ScrollEvents {
    fn scroll_page(&self, page: f64);
}

/// An element that can deliver wheel events.
pub trait WheelTarget {
    /// Attach `handler` in the capture phase with native scrolling disabled.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Attach`] when the listener cannot be attached.
    fn listen_wheel(&self, handler: WheelHandler) -> Result<Disposer, HostError>;
}
