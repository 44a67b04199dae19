//! Shared numeric constants for the scroll projection.

// ── Logical space ───────────────────────────────────────────────

/// Default logical document width. Every viewer maps this width onto its own
/// viewport width.
pub const DEFAULT_BASE_WIDTH: f64 = 1600.0;

/// Default document height expressed as a multiple of the width.
pub const DEFAULT_HEIGHT_RATIO: f64 = 3.0;

// ── Replicated storage ──────────────────────────────────────────

/// Key of the replicated record holding `{ scrollTop }`.
pub const DEFAULT_STORAGE_KEY: &str = "scroll";

// ── Camera ──────────────────────────────────────────────────────

/// Damping applied to camera bounds: 1.0 means no elastic overscroll.
pub const FULL_DAMPING: f64 = 1.0;
