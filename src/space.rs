//! The shared logical document space and the valid range for `scrollTop`.
//!
//! All scroll and camera math is expressed in logical units. A viewer whose
//! viewport is `h` pixels tall at scale `s` sees `h / s` logical units, so a
//! `scrollTop` (the logical y at the centre of the view) is valid between half
//! that height and the document height minus half that height.

#[cfg(test)]
#[path = "space_test.rs"]
mod space_test;

use serde::{Deserialize, Serialize};

/// Fixed-size coordinate system shared by every viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalSpace {
    pub width: f64,
    pub height: f64,
}

/// Inclusive bounds for a clamped `scrollTop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRange {
    pub min: f64,
    pub max: f64,
}

impl ScrollRange {
    /// True when the viewport shows more than the whole document height.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl LogicalSpace {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Logical height visible in a viewport `viewport_height` pixels tall.
    ///
    /// Returns `None` until a positive scale is known.
    #[must_use]
    pub fn view_height(viewport_height: f64, scale: f64) -> Option<f64> {
        if scale > 0.0 && scale.is_finite() {
            Some(viewport_height / scale)
        } else {
            None
        }
    }

    /// Valid `scrollTop` range for the given viewport height and scale.
    #[must_use]
    pub fn scroll_range(&self, viewport_height: f64, scale: f64) -> Option<ScrollRange> {
        let half = Self::view_height(viewport_height, scale)? / 2.0;
        Some(ScrollRange { min: half, max: self.height - half })
    }

    /// Clamp a proposed `scrollTop` into `range`.
    ///
    /// An inverted range (viewport taller than the document) pins the result to
    /// the document centre. Non-finite proposals fall back to the lower bound.
    #[must_use]
    pub fn clamp_scroll_top(&self, value: f64, range: ScrollRange) -> f64 {
        if range.is_inverted() {
            return self.height / 2.0;
        }
        if !value.is_finite() {
            return range.min;
        }
        value.clamp(range.min, range.max)
    }

    /// Centre of the document, used as the camera bound's centre.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}
