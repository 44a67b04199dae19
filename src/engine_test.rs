#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn space() -> LogicalSpace {
    LogicalSpace::new(1600.0, 4800.0)
}

fn core() -> ScrollCore {
    ScrollCore::new(space(), 0.0).unwrap()
}

/// 800x600 at BASE_WIDTH 1600: scale 0.5, view height 1200 logical.
fn measured_core(scroll_top: f64) -> ScrollCore {
    let mut c = ScrollCore::new(space(), scroll_top).unwrap();
    c.set_viewport(ViewportSize::new(800.0, 600.0));
    c
}

fn pages(actions: &[Action]) -> Vec<f64> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::PageChanged(p) => Some(*p),
            _ => None,
        })
        .collect()
}

fn camera_actions(actions: &[Action]) -> usize {
    actions
        .iter()
        .filter(|a| !matches!(a, Action::PageChanged(_)))
        .count()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_is_unmeasured() {
    let c = core();
    assert_eq!(c.scale(), 0.0);
    assert_eq!(c.viewport(), ViewportSize::default());
    assert_eq!(c.page(), None);
    assert_eq!(c.scroll_range(), None);
    assert_eq!(c.ticks(), 0);
}

#[test]
fn new_core_replaces_nan_start() {
    let c = ScrollCore::new(space(), f64::NAN).unwrap();
    assert_eq!(c.scroll_top(), 0.0);
}

// =============================================================
// Degenerate scale gating
// =============================================================

#[test]
fn scroll_change_before_measurement_only_recentres() {
    let mut c = core();
    let actions = c.apply_scroll_top(500.0);
    assert_eq!(actions, vec![Action::MoveCamera(MoveCamera { center_y: 500.0, immediate: true })]);
    assert_eq!(c.evaluations(Node::Bound), 1);
    assert_eq!(c.contain_rect(), None);
}

#[test]
fn zero_viewport_report_is_ignored() {
    let mut c = core();
    assert!(c.set_viewport(ViewportSize::default()).is_empty());
    assert_eq!(c.ticks(), 0);
}

#[test]
fn height_only_measurement_emits_nothing() {
    let mut c = core();
    let actions = c.set_viewport(ViewportSize::new(0.0, 600.0));
    assert!(actions.is_empty());
    assert_eq!(c.scale(), 0.0);
}

// =============================================================
// Scenario: 800x2400 viewport at BASE_WIDTH 1600
// =============================================================

#[test]
fn first_measurement_derives_scale_bound_and_page() {
    let mut c = core();
    let actions = c.set_viewport(ViewportSize::new(800.0, 2400.0));
    assert_eq!(c.scale(), 0.5);
    assert_eq!(c.page(), Some(0.0));
    assert_eq!(
        actions,
        vec![
            Action::MoveCameraToContain(ContainRect {
                origin_x: 0.0,
                origin_y: 0.0,
                width: 1600.0,
                height: 4800.0,
                immediate: true,
            }),
            Action::SetCameraBound(CameraBound {
                min_scale: 0.5,
                max_scale: 0.5,
                center_x: 800.0,
                center_y: 2400.0,
                width: 1600.0,
                height: 4800.0,
                damping: 1.0,
            }),
            Action::PageChanged(0.0),
        ]
    );
}

#[test]
fn wheel_in_full_height_view_clamps_to_single_position() {
    let mut c = core();
    c.set_viewport(ViewportSize::new(800.0, 2400.0));
    let outcome = c.on_wheel(WheelDelta::vertical(100.0), true);
    assert_eq!(outcome, WheelOutcome::Write(2400.0));
}

// =============================================================
// Tick ordering and memoization
// =============================================================

#[test]
fn scroll_change_runs_recentre_then_bound_then_page() {
    let mut c = measured_core(600.0);
    let actions = c.apply_scroll_top(1800.0);
    assert!(matches!(actions[0], Action::MoveCamera(m) if m.center_y == 1800.0));
    assert!(matches!(actions[1], Action::MoveCameraToContain(r) if r.origin_y == 1800.0));
    assert!(matches!(actions[2], Action::SetCameraBound(_)));
    assert_eq!(actions[3], Action::PageChanged(1.0));
    assert_eq!(actions.len(), 4);
}

#[test]
fn scroll_change_does_not_recompute_scale() {
    let mut c = measured_core(600.0);
    let before = c.evaluations(Node::Scale);
    c.apply_scroll_top(900.0);
    assert_eq!(c.evaluations(Node::Scale), before);
}

#[test]
fn viewport_change_does_not_recentre() {
    let mut c = measured_core(600.0);
    let actions = c.set_viewport(ViewportSize::new(800.0, 700.0));
    assert!(!actions.iter().any(|a| matches!(a, Action::MoveCamera(_))));
    assert_eq!(c.evaluations(Node::Recentre), 0);
}

#[test]
fn multi_input_nodes_run_once_per_tick() {
    let mut c = core();
    // viewport change dirties bound/page directly and again through scale
    c.set_viewport(ViewportSize::new(800.0, 600.0));
    assert_eq!(c.evaluations(Node::Scale), 1);
    assert_eq!(c.evaluations(Node::Bound), 1);
    assert_eq!(c.evaluations(Node::Page), 1);
}

#[test]
fn scale_recomputed_once_per_distinct_size() {
    let mut c = core();
    c.set_viewport(ViewportSize::new(800.0, 600.0));
    c.set_viewport(ViewportSize::new(800.0, 600.0));
    c.set_viewport(ViewportSize::new(1600.0, 600.0));
    c.set_viewport(ViewportSize::new(1600.0, 600.0));
    assert_eq!(c.evaluations(Node::Scale), 2);
    assert_eq!(c.scale(), 1.0);
}

#[test]
fn identical_viewport_is_idempotent() {
    let mut c = measured_core(600.0);
    let bound_before = c.evaluations(Node::Bound);
    let page_before = c.evaluations(Node::Page);
    let actions = c.set_viewport(ViewportSize::new(800.0, 600.0));
    assert!(actions.is_empty());
    assert_eq!(c.evaluations(Node::Bound), bound_before);
    assert_eq!(c.evaluations(Node::Page), page_before);
}

#[test]
fn identical_scroll_top_does_not_tick() {
    let mut c = measured_core(600.0);
    let ticks = c.ticks();
    assert!(c.apply_scroll_top(600.0).is_empty());
    assert_eq!(c.ticks(), ticks);
}

#[test]
fn non_finite_scroll_top_is_ignored() {
    let mut c = measured_core(600.0);
    assert!(c.apply_scroll_top(f64::INFINITY).is_empty());
    assert_eq!(c.scroll_top(), 600.0);
}

#[test]
fn height_change_republishes_page_even_when_unchanged() {
    let mut c = measured_core(0.0);
    let first = pages(&c.set_viewport(ViewportSize::new(800.0, 700.0)));
    assert_eq!(first, vec![0.0]);
    let second = pages(&c.set_viewport(ViewportSize::new(800.0, 650.0)));
    assert_eq!(second, vec![0.0]);
}

#[test]
fn recompute_all_reissues_every_directive() {
    let mut c = measured_core(600.0);
    let actions = c.recompute_all();
    assert_eq!(camera_actions(&actions), 3);
    assert_eq!(pages(&actions), vec![0.0]);
}

#[test]
fn recompute_all_before_measurement_only_recentres() {
    let mut c = core();
    let actions = c.recompute_all();
    assert_eq!(actions, vec![Action::MoveCamera(MoveCamera { center_y: 0.0, immediate: true })]);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_without_permission_is_read_only() {
    let c = measured_core(600.0);
    assert_eq!(c.on_wheel(WheelDelta::vertical(100.0), false), WheelOutcome::Skipped(WheelSkip::ReadOnly));
}

#[test]
fn wheel_with_zero_delta_is_skipped() {
    let c = measured_core(600.0);
    assert_eq!(c.on_wheel(WheelDelta::vertical(0.0), true), WheelOutcome::Skipped(WheelSkip::NoDelta));
}

#[test]
fn wheel_before_measurement_is_skipped() {
    let c = core();
    assert_eq!(c.on_wheel(WheelDelta::vertical(100.0), true), WheelOutcome::Skipped(WheelSkip::Unmeasured));
}

#[test]
fn wheel_moves_in_logical_units() {
    let c = measured_core(1000.0);
    assert_eq!(c.on_wheel(WheelDelta::vertical(50.0), true), WheelOutcome::Write(1100.0));
}

#[test]
fn wheel_does_not_change_state_by_itself() {
    let c = measured_core(1000.0);
    let _outcome = c.on_wheel(WheelDelta::vertical(50.0), true);
    assert_eq!(c.scroll_top(), 1000.0);
}

// =============================================================
// Programmatic scrolling and queries
// =============================================================

#[test]
fn scroll_target_clamps() {
    let c = measured_core(600.0);
    assert_eq!(c.scroll_target(10_000.0, true), Ok(4200.0));
    assert_eq!(c.scroll_target(-1.0, true), Ok(600.0));
    assert_eq!(c.scroll_target(1000.0, false), Err(WheelSkip::ReadOnly));
}

#[test]
fn page_target_inverts_page() {
    let c = measured_core(600.0);
    assert_eq!(c.page_target(1.0, true), Ok(1800.0));
    assert_eq!(c.page_target(99.0, true), Ok(4200.0));
    assert_eq!(core().page_target(1.0, true), Err(WheelSkip::Unmeasured));
}

#[test]
fn visible_range_is_centred_on_scroll_top() {
    let c = measured_core(1800.0);
    assert_eq!(c.visible_range(), Some(1200.0..2400.0));
    assert_eq!(core().visible_range(), None);
}

#[test]
fn page_count_reflects_view_height() {
    assert_eq!(measured_core(600.0).page_count(), Some(4.0));
}

#[test]
fn snapshot_serializes_projection() {
    let c = measured_core(1800.0);
    let json = serde_json::to_value(c.snapshot()).unwrap();
    assert_eq!(json["scrollTop"], 1800.0);
    assert_eq!(json["scale"], 0.5);
    assert_eq!(json["page"], 1.0);
    assert_eq!(json["pageCount"], 4.0);
    assert_eq!(json["viewport"]["width"], 800.0);
}
