//! The replicated `{ scrollTop }` record.
//!
//! DESIGN
//! ======
//! Transport and conflict resolution belong to the collaboration backend; the
//! scroll mode only needs "read the latest value", "propose a value" and "tell
//! me when it changes". [`ScrollStore`] is that seam. Writes are fire-and-forget
//! and unvalidated: callers clamp before writing.
//!
//! [`MemoryScrollStore`] is an in-process implementation where every clone of
//! the handle is one participant of the same session. A write notifies every
//! subscriber synchronously, the writer included, which is how a local write
//! "lands" and flows back into the writer's own projection.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

use crate::config::ScrollConfig;
use crate::consts::DEFAULT_STORAGE_KEY;
use crate::lifecycle::Disposer;

/// Unique identifier for a store subscription.
pub type SubscriptionId = Uuid;

/// Callback invoked with the latest `scrollTop`.
pub type ScrollListener = Box<dyn FnMut(f64)>;

/// Error returned when a replicated payload does not match the schema.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid scroll record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("scrollTop must be finite, got {0}")]
    NonFinite(f64),
}

/// Replicated record as stored on the wire: `{ "scrollTop": number }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollState {
    pub scroll_top: f64,
}

impl ScrollState {
    /// Decode a replicated payload. A missing `scrollTop` reads as `0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] when the payload has the wrong shape.
    pub fn from_value(value: serde_json::Value) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(value)?)
    }

    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "scrollTop": self.scroll_top })
    }
}

/// Shared scroll record as seen by one participant.
pub trait ScrollStore {
    /// Key of the replicated record this store reads and writes.
    fn key(&self) -> String;

    /// Latest observed `scrollTop`.
    fn scroll_top(&self) -> f64;

    /// Propose a new `scrollTop`. No acknowledgement.
    fn set_scroll_top(&self, scroll_top: f64);

    /// Call `listener` on every observed change until the returned disposer runs.
    fn subscribe(&self, listener: ScrollListener) -> Disposer;
}

/// One subscriber plus the latest value that arrived while it was running.
struct Subscriber {
    callback: RefCell<ScrollListener>,
    pending: Cell<Option<f64>>,
}

type SharedListener = Rc<Subscriber>;

struct StoreInner {
    key: String,
    state: ScrollState,
    listeners: Vec<(SubscriptionId, SharedListener)>,
    writes: u64,
}

/// In-process replicated store; clone the handle once per participant.
#[derive(Clone)]
pub struct MemoryScrollStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl fmt::Debug for MemoryScrollStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryScrollStore")
            .field("key", &inner.key)
            .field("state", &inner.state)
            .field("listeners", &inner.listeners.len())
            .field("writes", &inner.writes)
            .finish()
    }
}

impl Default for MemoryScrollStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl MemoryScrollStore {
    /// Create the record under `key` with the default `{ scrollTop: 0 }`.
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self::with_state(key, ScrollState::default())
    }

    /// Create the record under the configured storage key.
    #[must_use]
    pub fn from_config(config: &ScrollConfig) -> Self {
        Self::new(&config.storage_key)
    }

    #[must_use]
    pub fn with_state(key: &str, state: ScrollState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                key: key.to_owned(),
                state,
                listeners: Vec::new(),
                writes: 0,
            })),
        }
    }

    #[must_use]
    pub fn state(&self) -> ScrollState {
        self.inner.borrow().state
    }

    /// Number of writes accepted so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.borrow().writes
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Apply a payload received from the transport.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the payload is malformed or non-finite; the
    /// record is left untouched.
    pub fn apply_remote(&self, payload: serde_json::Value) -> Result<(), StoreError> {
        let state = ScrollState::from_value(payload)?;
        if !state.scroll_top.is_finite() {
            return Err(StoreError::NonFinite(state.scroll_top));
        }
        self.set_scroll_top(state.scroll_top);
        Ok(())
    }

    /// Deliver `scroll_top` to every subscriber. A nested write notifies
    /// everyone itself, so this pass stops as soon as it is superseded.
    fn notify(&self, scroll_top: f64) {
        let (generation, listeners) = {
            let inner = self.inner.borrow();
            let listeners: Vec<SharedListener> = inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (inner.writes, listeners)
        };
        for listener in listeners {
            if self.inner.borrow().writes != generation {
                trace!(scroll_top, "superseded by a nested write");
                return;
            }
            deliver(&listener, scroll_top);
        }
    }
}

/// Run `listener` with `scroll_top`. A write landing while the listener is
/// already running is parked and delivered once it returns, newest value only.
fn deliver(listener: &Subscriber, scroll_top: f64) {
    let Ok(mut callback) = listener.callback.try_borrow_mut() else {
        trace!(scroll_top, "listener busy; deferring delivery");
        listener.pending.set(Some(scroll_top));
        return;
    };
    (*callback)(scroll_top);
    while let Some(next) = listener.pending.take() {
        (*callback)(next);
    }
}

impl ScrollStore for MemoryScrollStore {
    fn key(&self) -> String {
        self.inner.borrow().key.clone()
    }

    fn scroll_top(&self) -> f64 {
        self.inner.borrow().state.scroll_top
    }

    fn set_scroll_top(&self, scroll_top: f64) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.state.scroll_top = scroll_top;
            inner.writes += 1;
            trace!(key = %inner.key, scroll_top, "scroll record written");
        }
        self.notify(scroll_top);
    }

    fn subscribe(&self, listener: ScrollListener) -> Disposer {
        let id = Uuid::new_v4();
        self.inner
            .borrow_mut()
            .listeners
            .push((id, Rc::new(Subscriber { callback: RefCell::new(listener), pending: Cell::new(None) })));
        let weak: Weak<RefCell<StoreInner>> = Rc::downgrade(&self.inner);
        Disposer::new("store subscription", move || {
            // A dropped store has no listeners left to remove.
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(key, _)| *key != id);
            }
            Ok(())
        })
    }
}
