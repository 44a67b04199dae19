//! Input model: wheel events and what the scroll mode decides to do with them.
//!
//! Every wheel event over the rendered surface is swallowed (default prevented,
//! propagation stopped) so the host never scrolls or zooms natively. Whether the
//! event also proposes a new `scrollTop` is decided here, as a pure function of
//! the current projection.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::space::LogicalSpace;
use crate::viewport::ViewportSize;

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    /// Vertical scroll amount in pixels (positive = down). `None` when the
    /// platform reported no value.
    pub dy: Option<f64>,
}

impl WheelDelta {
    #[must_use]
    pub fn vertical(dy: f64) -> Self {
        Self { dy: Some(dy) }
    }

    /// Vertical delta with missing or non-finite values read as zero.
    #[must_use]
    pub fn dy_or_zero(&self) -> f64 {
        match self.dy {
            Some(dy) if dy.is_finite() => dy,
            _ => 0.0,
        }
    }
}

/// What the host must do with the native event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelVerdict {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl WheelVerdict {
    /// Swallow the event entirely. The only verdict the scroll mode issues.
    pub const SWALLOW: Self = Self { prevent_default: true, stop_propagation: true };
}

/// Why a wheel event did not produce a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSkip {
    /// The local participant cannot write to the shared store.
    ReadOnly,
    /// The delta was zero or missing.
    NoDelta,
    /// The viewport has not been measured yet.
    Unmeasured,
}

/// Outcome of one wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// Write this clamped `scrollTop` to the shared store.
    Write(f64),
    /// Event swallowed without a write.
    Skipped(WheelSkip),
}

impl WheelOutcome {
    /// Host-side handling of the native event; always swallowed.
    #[must_use]
    pub fn verdict(&self) -> WheelVerdict {
        WheelVerdict::SWALLOW
    }

    #[must_use]
    pub fn write(&self) -> Option<f64> {
        match self {
            Self::Write(top) => Some(*top),
            Self::Skipped(_) => None,
        }
    }
}

/// Clamped `scrollTop` after applying `delta_px` screen pixels at `scale`.
///
/// # Errors
///
/// Returns the [`WheelSkip`] reason when the event must not produce a write.
pub fn scroll_after_wheel(
    space: &LogicalSpace,
    current: f64,
    delta: WheelDelta,
    viewport: ViewportSize,
    scale: f64,
) -> Result<f64, WheelSkip> {
    let dy = delta.dy_or_zero();
    if dy == 0.0 {
        return Err(WheelSkip::NoDelta);
    }
    if !viewport.is_measured() {
        return Err(WheelSkip::Unmeasured);
    }
    let range = space
        .scroll_range(viewport.height, scale)
        .ok_or(WheelSkip::Unmeasured)?;
    Ok(space.clamp_scroll_top(current + dy / scale, range))
}
