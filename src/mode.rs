//! The scroll mode: wires a [`ScrollCore`] to its host, store and surface.
//!
//! Construction acquires every host resource (camera sync override, store
//! subscription, size listener, readiness hook) and records its teardown in
//! one [`SideEffects`] bag. Assigning a root element activates the mode and
//! attaches the wheel listener. [`ScrollMode::dispose`] (or drop) releases
//! everything exactly once.
//!
//! Callbacks handed to the host hold a `Weak` to the shared state, so the host
//! never keeps a disposed mode alive. Core borrows end before any store write:
//! the store notifies synchronously and the notification re-enters the core.

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::{Rc, Weak};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::camera::CameraSyncMode;
use crate::config::{ConfigError, ScrollConfig};
use crate::engine::{Action, ProjectionSnapshot, ScrollCore};
use crate::graph::GraphError;
use crate::host::{HostError, RenderHost, ScrollEvents, WheelTarget};
use crate::input::{WheelDelta, WheelSkip, WheelVerdict};
use crate::lifecycle::{Disposer, EffectId, ReleaseReport, SideEffects};
use crate::store::ScrollStore;
use crate::viewport::ViewportSize;

#[derive(Debug, thiserror::Error)]
pub enum ModeError {
    #[error("invalid scroll config: {0}")]
    Config(#[from] ConfigError),
    #[error("projection graph: {0}")]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("store is keyed {found:?} but the config names {expected:?}")]
    StorageKey { expected: String, found: String },
    #[error("scroll mode already disposed")]
    Disposed,
}

/// Lifecycle of a [`ScrollMode`]. `Disposed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeState {
    /// Constructed, no root element yet. Directives are dropped.
    Inactive,
    Active,
    Disposed,
}

/// Debug view returned by [`ScrollMode::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSnapshot {
    pub state: ModeState,
    #[serde(flatten)]
    pub projection: ProjectionSnapshot,
}

/// State reachable from host callbacks.
struct Shared {
    core: RefCell<ScrollCore>,
    state: Cell<ModeState>,
    host: Rc<dyn RenderHost>,
    store: Rc<dyn ScrollStore>,
    events: Rc<dyn ScrollEvents>,
}

impl Shared {
    fn dispatch(&self, actions: Vec<Action>) {
        if actions.is_empty() {
            return;
        }
        let state = self.state.get();
        if state != ModeState::Active {
            trace!(?state, dropped = actions.len(), "mode not active; dropping directives");
            return;
        }
        for action in actions {
            match action {
                Action::MoveCamera(directive) => self.host.move_camera(directive),
                Action::MoveCameraToContain(rect) => self.host.move_camera_to_contain(rect),
                Action::SetCameraBound(bound) => self.host.set_camera_bound(bound),
                Action::PageChanged(page) => self.events.scroll_page(page),
            }
        }
    }

    /// Run `f` against the core unless disposed or already borrowed, then dispatch.
    fn update(&self, what: &'static str, f: impl FnOnce(&mut ScrollCore) -> Vec<Action>) {
        if self.state.get() == ModeState::Disposed {
            trace!(what, "mode disposed; ignoring");
            return;
        }
        let actions = match self.core.try_borrow_mut() {
            Ok(mut core) => f(&mut core),
            Err(_) => {
                warn!(what, "re-entrant update; skipped");
                return;
            }
        };
        self.dispatch(actions);
    }

    fn on_wheel(&self, delta: WheelDelta) -> WheelVerdict {
        if self.state.get() != ModeState::Active {
            return WheelVerdict::SWALLOW;
        }
        let writable = self.host.writable();
        let outcome = match self.core.try_borrow() {
            Ok(core) => core.on_wheel(delta, writable),
            Err(_) => {
                warn!("wheel during projection update; swallowed");
                return WheelVerdict::SWALLOW;
            }
        };
        if let Some(top) = outcome.write() {
            trace!(scroll_top = top, "wheel write");
            self.store.set_scroll_top(top);
        }
        outcome.verdict()
    }

    fn write(&self, what: &'static str, target: impl FnOnce(&ScrollCore, bool) -> Result<f64, WheelSkip>) -> Option<f64> {
        if self.state.get() == ModeState::Disposed {
            return None;
        }
        let writable = self.host.writable();
        let result = match self.core.try_borrow() {
            Ok(core) => target(&core, writable),
            Err(_) => {
                warn!(what, "write during projection update; skipped");
                return None;
            }
        };
        match result {
            Ok(top) => {
                self.store.set_scroll_top(top);
                Some(top)
            }
            Err(skip) => {
                debug!(what, ?skip, "programmatic scroll skipped");
                None
            }
        }
    }
}

/// Scrollable, paginated view over a shared canvas.
pub struct ScrollMode {
    shared: Rc<Shared>,
    effects: SideEffects,
    wheel: Option<(EffectId, Rc<dyn WheelTarget>)>,
}

impl ScrollMode {
    /// Acquire host resources and start the projection from the store.
    ///
    /// The host's camera sync mode is switched to
    /// [`CameraSyncMode::Independent`] until the mode is disposed.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::Config`] for an invalid config,
    /// [`ModeError::StorageKey`] when `store` holds a different record than the
    /// config names, and [`ModeError::Graph`] if the projection graph cannot be
    /// built.
    pub fn new(
        config: &ScrollConfig,
        host: Rc<dyn RenderHost>,
        store: Rc<dyn ScrollStore>,
        events: Rc<dyn ScrollEvents>,
    ) -> Result<Self, ModeError> {
        config.validate()?;
        let found = store.key();
        if found != config.storage_key {
            return Err(ModeError::StorageKey { expected: config.storage_key.clone(), found });
        }
        let core = ScrollCore::new(config.space(), store.scroll_top())?;
        let shared = Rc::new(Shared {
            core: RefCell::new(core),
            state: Cell::new(ModeState::Inactive),
            host: Rc::clone(&host),
            store: Rc::clone(&store),
            events,
        });
        let mut effects = SideEffects::new();

        let previous = host.camera_sync_mode();
        host.set_camera_sync_mode(CameraSyncMode::Independent);
        let restore = Rc::clone(&host);
        effects.add(Disposer::new("camera sync mode", move || {
            restore.set_camera_sync_mode(previous);
            Ok(())
        }));

        let weak = Rc::downgrade(&shared);
        effects.add(store.subscribe(Box::new(move |top| {
            if let Some(shared) = weak.upgrade() {
                shared.update("store", |core| core.apply_scroll_top(top));
            }
        })));

        let weak = Rc::downgrade(&shared);
        effects.add(host.on_size_change(Box::new(move |size: ViewportSize| {
            if let Some(shared) = weak.upgrade() {
                shared.update("resize", |core| core.set_viewport(size));
            }
        })));

        let weak = Rc::downgrade(&shared);
        effects.add(host.on_ready(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.update("ready", ScrollCore::recompute_all);
            }
        })));

        debug!(
            width = config.base_width,
            height = config.space().height,
            key = %config.storage_key,
            ?previous,
            "scroll mode constructed"
        );
        Ok(Self { shared, effects, wheel: None })
    }

    /// Assign (or clear) the element that receives wheel input.
    ///
    /// The first surface activates the mode and re-issues every directive from
    /// the current inputs; `None` leaves an inactive mode inactive.
    /// Re-assigning the same element keeps the existing listener; a different
    /// element moves it.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::Disposed`] after teardown and [`ModeError::Host`]
    /// if the listener cannot be attached.
    pub fn set_root(&mut self, target: Option<Rc<dyn WheelTarget>>) -> Result<(), ModeError> {
        if self.shared.state.get() == ModeState::Disposed {
            return Err(ModeError::Disposed);
        }
        let same = match (&self.wheel, &target) {
            (Some((_, current)), Some(next)) => std::ptr::addr_eq(Rc::as_ptr(current), Rc::as_ptr(next)),
            _ => false,
        };
        if !same {
            if let Some((id, _)) = self.wheel.take() {
                if let Err(e) = self.effects.remove(id) {
                    warn!(error = %e, "failed to detach previous wheel listener");
                }
            }
            if let Some(target) = target {
                let weak: Weak<Shared> = Rc::downgrade(&self.shared);
                let disposer = target.listen_wheel(Box::new(move |delta| match weak.upgrade() {
                    Some(shared) => shared.on_wheel(delta),
                    None => WheelVerdict::SWALLOW,
                }))?;
                let id = self.effects.add(disposer);
                self.wheel = Some((id, target));
            }
        }
        if self.shared.state.get() == ModeState::Inactive && self.wheel.is_some() {
            self.shared.state.set(ModeState::Active);
            debug!(wheel = self.wheel.is_some(), "scroll mode active");
            // directives derived while inactive were dropped
            self.recompute_all();
        }
        Ok(())
    }

    /// Recompute every derivation from current inputs and re-issue all directives.
    pub fn recompute_all(&self) {
        self.shared.update("recompute", ScrollCore::recompute_all);
    }

    /// Write a clamped `scroll_top` to the shared store.
    ///
    /// Returns the value written, or `None` when the participant is read-only,
    /// the viewport is unmeasured or the mode is disposed.
    pub fn scroll_to(&self, scroll_top: f64) -> Option<f64> {
        self.shared.write("scroll_to", |core, writable| core.scroll_target(scroll_top, writable))
    }

    /// Write the `scrollTop` whose page indicator reads `page`.
    pub fn scroll_to_page(&self, page: f64) -> Option<f64> {
        self.shared.write("scroll_to_page", |core, writable| core.page_target(page, writable))
    }

    /// Release every acquired resource. Later calls return an empty report.
    pub fn dispose(&mut self) -> ReleaseReport {
        if self.shared.state.get() == ModeState::Disposed {
            return ReleaseReport::default();
        }
        self.shared.state.set(ModeState::Disposed);
        self.wheel = None;
        let report = self.effects.release();
        if report.is_clean() {
            debug!(released = report.released, "scroll mode disposed");
        } else {
            warn!(released = report.released, failures = report.failures.len(), "scroll mode disposed with failures");
        }
        report
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> ModeState {
        self.shared.state.get()
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.shared.core.borrow().scroll_top()
    }

    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.shared.core.borrow().viewport()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.shared.core.borrow().scale()
    }

    #[must_use]
    pub fn page(&self) -> Option<f64> {
        self.shared.core.borrow().page()
    }

    #[must_use]
    pub fn page_count(&self) -> Option<f64> {
        self.shared.core.borrow().page_count()
    }

    #[must_use]
    pub fn visible_range(&self) -> Option<Range<f64>> {
        self.shared.core.borrow().visible_range()
    }

    /// Current state and projection, for inspection in place of a debug global.
    #[must_use]
    pub fn snapshot(&self) -> ModeSnapshot {
        ModeSnapshot { state: self.state(), projection: self.shared.core.borrow().snapshot() }
    }
}

impl Drop for ScrollMode {
    fn drop(&mut self) {
        self.dispose();
    }
}
