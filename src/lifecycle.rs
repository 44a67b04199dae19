//! Scoped teardown of listeners, subscriptions and host overrides.
//!
//! Every resource the scroll mode acquires is paired with one [`Disposer`]
//! holding the action that gives it back. [`SideEffects`] owns all of them and
//! releases them together, exactly once. A failing action is logged and does
//! not stop the rest.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use std::fmt;

use tracing::{trace, warn};

/// Error returned by a single teardown action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeardownError {
    /// The host rejected the release (e.g. `removeEventListener` threw).
    #[error("{label}: host rejected release: {reason}")]
    Host { label: &'static str, reason: String },
}

type TeardownFn = Box<dyn FnOnce() -> Result<(), TeardownError>>;

/// One teardown action. Runs at most once: on [`Disposer::dispose`] or on drop.
pub struct Disposer {
    label: &'static str,
    action: Option<TeardownFn>,
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("label", &self.label)
            .field("pending", &self.action.is_some())
            .finish()
    }
}

impl Disposer {
    pub fn new<F>(label: &'static str, action: F) -> Self
    where
        F: FnOnce() -> Result<(), TeardownError> + 'static,
    {
        Self { label, action: Some(Box::new(action)) }
    }

    /// A disposer with nothing to release.
    #[must_use]
    pub fn noop(label: &'static str) -> Self {
        Self { label, action: None }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Whether the teardown action has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.action.is_some()
    }

    /// Run the teardown action now.
    ///
    /// # Errors
    ///
    /// Returns whatever the action reported.
    pub fn dispose(mut self) -> Result<(), TeardownError> {
        self.run()
    }

    fn run(&mut self) -> Result<(), TeardownError> {
        match self.action.take() {
            Some(action) => action(),
            None => Ok(()),
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        if let Err(e) = self.run() {
            warn!(label = self.label, error = %e, "teardown on drop failed");
        }
    }
}

/// Key of one entry in a [`SideEffects`] bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(u64);

/// Result of [`SideEffects::release`].
#[derive(Debug, Default)]
pub struct ReleaseReport {
    /// Actions that ran, successfully or not.
    pub released: usize,
    pub failures: Vec<TeardownError>,
}

impl ReleaseReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ownership record for every acquired resource of one scope.
#[derive(Debug, Default)]
pub struct SideEffects {
    entries: Vec<(EffectId, Disposer)>,
    next_id: u64,
    released: bool,
}

impl SideEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `disposer`.
    ///
    /// After [`Self::release`] the bag is closed: the disposer runs immediately.
    pub fn add(&mut self, disposer: Disposer) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        if self.released {
            trace!(label = disposer.label(), "scope already released; disposing immediately");
            if let Err(e) = disposer.dispose() {
                warn!(error = %e, "teardown action failed");
            }
            return id;
        }
        self.entries.push((id, disposer));
        id
    }

    /// Release a single entry ahead of the rest. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns the entry's teardown error.
    pub fn remove(&mut self, id: EffectId) -> Result<(), TeardownError> {
        match self.entries.iter().position(|(key, _)| *key == id) {
            Some(pos) => self.entries.remove(pos).1.dispose(),
            None => Ok(()),
        }
    }

    /// Release every entry, newest first. Idempotent.
    pub fn release(&mut self) -> ReleaseReport {
        let mut report = ReleaseReport::default();
        if self.released {
            return report;
        }
        self.released = true;
        while let Some((_, disposer)) = self.entries.pop() {
            let label = disposer.label();
            report.released += 1;
            if let Err(e) = disposer.dispose() {
                warn!(label, error = %e, "teardown action failed; continuing");
                report.failures.push(e);
            }
        }
        report
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for SideEffects {
    fn drop(&mut self) {
        self.release();
    }
}
