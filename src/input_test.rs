#![allow(clippy::float_cmp)]

use super::*;

fn space() -> LogicalSpace {
    LogicalSpace::new(1600.0, 4800.0)
}

fn small_view() -> ViewportSize {
    ViewportSize::new(800.0, 600.0)
}

// =============================================================
// WheelDelta
// =============================================================

#[test]
fn missing_delta_reads_as_zero() {
    assert_eq!(WheelDelta::default().dy_or_zero(), 0.0);
}

#[test]
fn nan_delta_reads_as_zero() {
    assert_eq!(WheelDelta::vertical(f64::NAN).dy_or_zero(), 0.0);
}

#[test]
fn real_delta_passes_through() {
    assert_eq!(WheelDelta::vertical(-42.0).dy_or_zero(), -42.0);
}

// =============================================================
// WheelOutcome
// =============================================================

#[test]
fn every_outcome_swallows_the_event() {
    assert_eq!(WheelOutcome::Write(1.0).verdict(), WheelVerdict::SWALLOW);
    assert_eq!(WheelOutcome::Skipped(WheelSkip::ReadOnly).verdict(), WheelVerdict::SWALLOW);
    assert!(WheelVerdict::SWALLOW.prevent_default);
    assert!(WheelVerdict::SWALLOW.stop_propagation);
}

#[test]
fn outcome_write_accessor() {
    assert_eq!(WheelOutcome::Write(12.0).write(), Some(12.0));
    assert_eq!(WheelOutcome::Skipped(WheelSkip::NoDelta).write(), None);
}

// =============================================================
// scroll_after_wheel
// =============================================================

#[test]
fn delta_is_divided_by_scale() {
    // 100px at scale 0.5 = 200 logical units
    let top = scroll_after_wheel(&space(), 1000.0, WheelDelta::vertical(100.0), small_view(), 0.5).unwrap();
    assert_eq!(top, 1200.0);
}

#[test]
fn negative_delta_scrolls_up() {
    let top = scroll_after_wheel(&space(), 1000.0, WheelDelta::vertical(-100.0), small_view(), 0.5).unwrap();
    assert_eq!(top, 800.0);
}

#[test]
fn result_clamps_to_lower_bound() {
    let top = scroll_after_wheel(&space(), 700.0, WheelDelta::vertical(-500.0), small_view(), 0.5).unwrap();
    assert_eq!(top, 600.0);
}

#[test]
fn result_clamps_to_upper_bound() {
    let top = scroll_after_wheel(&space(), 4100.0, WheelDelta::vertical(500.0), small_view(), 0.5).unwrap();
    assert_eq!(top, 4200.0);
}

#[test]
fn full_height_view_clamps_to_single_position() {
    // 800x2400 at scale 0.5: range is [2400, 2400]
    let view = ViewportSize::new(800.0, 2400.0);
    let top = scroll_after_wheel(&space(), 0.0, WheelDelta::vertical(100.0), view, 0.5).unwrap();
    assert_eq!(top, 2400.0);
}

#[test]
fn zero_delta_is_skipped() {
    let err = scroll_after_wheel(&space(), 1000.0, WheelDelta::vertical(0.0), small_view(), 0.5).unwrap_err();
    assert_eq!(err, WheelSkip::NoDelta);
}

#[test]
fn missing_delta_is_skipped() {
    let err = scroll_after_wheel(&space(), 1000.0, WheelDelta::default(), small_view(), 0.5).unwrap_err();
    assert_eq!(err, WheelSkip::NoDelta);
}

#[test]
fn unmeasured_viewport_is_skipped() {
    let err = scroll_after_wheel(&space(), 0.0, WheelDelta::vertical(100.0), ViewportSize::default(), 0.0).unwrap_err();
    assert_eq!(err, WheelSkip::Unmeasured);
}

#[test]
fn width_without_height_is_still_unmeasured() {
    let view = ViewportSize::new(800.0, 0.0);
    let err = scroll_after_wheel(&space(), 0.0, WheelDelta::vertical(100.0), view, 0.5).unwrap_err();
    assert_eq!(err, WheelSkip::Unmeasured);
}

#[test]
fn written_value_always_within_range() {
    let s = space();
    let view = small_view();
    let range = s.scroll_range(view.height, 0.5).unwrap();
    let mut top = range.min;
    for dy in [900.0, -3000.0, 45.5, 10_000.0, -1.0, 7.0, -99_999.0] {
        top = scroll_after_wheel(&s, top, WheelDelta::vertical(dy), view, 0.5).unwrap();
        assert!(top >= range.min && top <= range.max, "{top} escaped {range:?}");
    }
}
