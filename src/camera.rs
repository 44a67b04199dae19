//! Camera directives issued to the rendering host.
//!
//! The scroll mode never owns the camera. It derives, from `(scrollTop,
//! viewport, scale)`, the directives a host applies to its pan/zoom transform:
//! a cheap recentre on every `scrollTop` change, and a contain + bound pair that
//! pins the camera to exactly the current projection.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::FULL_DAMPING;
use crate::space::LogicalSpace;
use crate::viewport::ViewportSize;

/// Recentre the camera vertically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCamera {
    pub center_y: f64,
    /// Apply without animation.
    pub immediate: bool,
}

/// Refit the camera so that this logical rectangle fills the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainRect {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
    pub immediate: bool,
}

/// Pan/zoom limits for the host camera.
///
/// `min_scale == max_scale` disables independent zoom while the mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraBound {
    pub min_scale: f64,
    pub max_scale: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    /// 1.0 = no elastic overscroll.
    pub damping: f64,
}

/// How the host shares camera positions between viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSyncMode {
    /// One leader's camera is broadcast and everyone follows it.
    #[default]
    Shared,
    /// Each viewer derives its own camera.
    Independent,
}

/// Low-latency recentre used on every `scrollTop` tick.
#[must_use]
pub fn recentre(scroll_top: f64) -> MoveCamera {
    MoveCamera { center_y: scroll_top, immediate: true }
}

/// The rectangle `(0, scrollTop)` sized `(BASE_WIDTH, viewportHeight / scale)`.
///
/// `None` while the scale is unknown.
#[must_use]
pub fn contain_rect(space: &LogicalSpace, scroll_top: f64, viewport: ViewportSize, scale: f64) -> Option<ContainRect> {
    let height = LogicalSpace::view_height(viewport.height, scale)?;
    Some(ContainRect { origin_x: 0.0, origin_y: scroll_top, width: space.width, height, immediate: true })
}

/// Bound pinning zoom to `scale` and panning to the whole logical space.
#[must_use]
pub fn camera_bound(space: &LogicalSpace, scale: f64) -> Option<CameraBound> {
    if !(scale > 0.0 && scale.is_finite()) {
        return None;
    }
    let (center_x, center_y) = space.center();
    Some(CameraBound {
        min_scale: scale,
        max_scale: scale,
        center_x,
        center_y,
        width: space.width,
        height: space.height,
        damping: FULL_DAMPING,
    })
}
