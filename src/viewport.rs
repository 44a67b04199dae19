//! Local viewport size tracking and the width-derived scale.
//!
//! The viewport is never replicated: each viewer reports its own rendered
//! element size. Reports are compared by value, so layout passes that produce
//! identical dimensions do not reach the derived graph.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

/// Pixel size of the element the canvas renders into.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace negative or non-finite dimensions with zero ("not measured").
    #[must_use]
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self { width: fix(self.width), height: fix(self.height) }
    }

    /// True once both dimensions are known.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// `scale = width / base_width`; `0.0` until a real width is known.
#[must_use]
pub fn project_scale(size: ViewportSize, base_width: f64) -> f64 {
    if size.width > 0.0 && base_width > 0.0 {
        size.width / base_width
    } else {
        0.0
    }
}

/// Value-equality size signal.
#[derive(Debug, Clone, Default)]
pub struct ViewportObserver {
    current: ViewportSize,
}

impl ViewportObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a measurement. Returns `true` only when the size differs from the last one.
    pub fn observe(&mut self, size: ViewportSize) -> bool {
        let size = size.sanitized();
        if size == self.current {
            return false;
        }
        self.current = size;
        true
    }

    #[must_use]
    pub fn size(&self) -> ViewportSize {
        self.current
    }
}
