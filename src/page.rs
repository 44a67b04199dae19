//! Fractional page derived from scroll position.
//!
//! One "page" is one viewport of logical height. Page `0` is reached while the
//! view's centre is within the first half-viewport, so a fresh document reads
//! as page zero rather than a negative value.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use crate::space::LogicalSpace;
use crate::viewport::ViewportSize;

/// `max(scrollTop / (viewportHeight / scale) − 0.5, 0)`; `None` while unmeasured.
#[must_use]
pub fn page_for(scroll_top: f64, viewport: ViewportSize, scale: f64) -> Option<f64> {
    let view_height = LogicalSpace::view_height(viewport.height, scale)?;
    if view_height <= 0.0 {
        return None;
    }
    Some((scroll_top / view_height - 0.5).max(0.0))
}

/// Inverse of [`page_for`]: the unclamped `scrollTop` whose page is `page`.
#[must_use]
pub fn scroll_top_for_page(page: f64, viewport: ViewportSize, scale: f64) -> Option<f64> {
    let view_height = LogicalSpace::view_height(viewport.height, scale)?;
    Some((page.max(0.0) + 0.5) * view_height)
}

/// How many viewports tall the document is.
#[must_use]
pub fn page_count(space: &LogicalSpace, viewport: ViewportSize, scale: f64) -> Option<f64> {
    let view_height = LogicalSpace::view_height(viewport.height, scale)?;
    if view_height <= 0.0 {
        return None;
    }
    Some(space.height / view_height)
}
