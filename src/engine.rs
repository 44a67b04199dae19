use std::ops::Range;

use serde::Serialize;
use tracing::{trace, warn};

use crate::camera::{self, CameraBound, ContainRect, MoveCamera};
use crate::graph::{DepGraph, GraphError, NodeId};
use crate::input::{self, WheelDelta, WheelOutcome, WheelSkip};
use crate::page;
use crate::space::{LogicalSpace, ScrollRange};
use crate::viewport::{ViewportObserver, ViewportSize, project_scale};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    MoveCamera(MoveCamera),
    MoveCameraToContain(ContainRect),
    SetCameraBound(CameraBound),
    PageChanged(f64),
}

/// Nodes of the projection graph, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    ScrollTop,
    Viewport,
    Scale,
    Recentre,
    Bound,
    Page,
}

#[derive(Debug, Clone, Copy)]
struct Nodes {
    scroll_top: NodeId,
    viewport: NodeId,
    scale: NodeId,
    recentre: NodeId,
    bound: NodeId,
    page: NodeId,
}

impl Nodes {
    fn register(graph: &mut DepGraph) -> Result<Self, GraphError> {
        let scroll_top = graph.add_root("scroll_top");
        let viewport = graph.add_root("viewport");
        let scale = graph.add_derived("scale", &[viewport])?;
        let recentre = graph.add_derived("recentre", &[scroll_top])?;
        let bound = graph.add_derived("bound", &[scroll_top, viewport, scale])?;
        let page = graph.add_derived("page", &[scroll_top, viewport, scale])?;
        Ok(Self { scroll_top, viewport, scale, recentre, bound, page })
    }

    fn id(&self, node: Node) -> NodeId {
        match node {
            Node::ScrollTop => self.scroll_top,
            Node::Viewport => self.viewport,
            Node::Scale => self.scale,
            Node::Recentre => self.recentre,
            Node::Bound => self.bound,
            Node::Page => self.page,
        }
    }
}

/// Current values of every node plus per-node evaluation counts.
#[derive(Debug, Clone)]
struct Projection {
    scroll_top: f64,
    viewport: ViewportObserver,
    scale: f64,
    page: Option<f64>,
    contain: Option<ContainRect>,
    bound: Option<CameraBound>,
    evaluations: Vec<u64>,
}

impl Projection {
    fn recompute(&mut self, id: NodeId, nodes: &Nodes, space: &LogicalSpace, out: &mut Vec<Action>) -> bool {
        if let Some(count) = self.evaluations.get_mut(id.index()) {
            *count += 1;
        }
        let size = self.viewport.size();
        if id == nodes.scale {
            let scale = project_scale(size, space.width);
            let changed = scale != self.scale;
            self.scale = scale;
            changed
        } else if id == nodes.recentre {
            out.push(Action::MoveCamera(camera::recentre(self.scroll_top)));
            true
        } else if id == nodes.bound {
            let contain = camera::contain_rect(space, self.scroll_top, size, self.scale);
            let bound = camera::camera_bound(space, self.scale);
            let (Some(contain), Some(bound)) = (contain, bound) else {
                return false;
            };
            out.push(Action::MoveCameraToContain(contain));
            out.push(Action::SetCameraBound(bound));
            self.contain = Some(contain);
            self.bound = Some(bound);
            true
        } else if id == nodes.page {
            let Some(page) = page::page_for(self.scroll_top, size, self.scale) else {
                return false;
            };
            out.push(Action::PageChanged(page));
            self.page = Some(page);
            true
        } else {
            false
        }
    }
}

/// Serializable view of the projection for debugging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSnapshot {
    pub scroll_top: f64,
    pub viewport: ViewportSize,
    pub scale: f64,
    pub page: Option<f64>,
    pub page_count: Option<f64>,
}

/// Projection state and every derivation that does not need a host.
///
/// Separated from `ScrollMode` so it can be tested without listeners, stores
/// or a browser.
#[derive(Debug, Clone)]
pub struct ScrollCore {
    space: LogicalSpace,
    graph: DepGraph,
    nodes: Nodes,
    state: Projection,
    ticks: u64,
}

impl ScrollCore {
    /// Build the projection graph over `space`, starting at `scroll_top`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if the node graph cannot be registered.
    pub fn new(space: LogicalSpace, scroll_top: f64) -> Result<Self, GraphError> {
        let mut graph = DepGraph::new();
        let nodes = Nodes::register(&mut graph)?;
        let state = Projection {
            scroll_top: if scroll_top.is_finite() { scroll_top } else { 0.0 },
            viewport: ViewportObserver::new(),
            scale: 0.0,
            page: None,
            contain: None,
            bound: None,
            evaluations: vec![0; graph.len()],
        };
        Ok(Self { space, graph, nodes, state, ticks: 0 })
    }

    // --- Data inputs ---

    /// Mirror a `scrollTop` observed in the shared store.
    pub fn apply_scroll_top(&mut self, scroll_top: f64) -> Vec<Action> {
        if !scroll_top.is_finite() {
            warn!(scroll_top, "ignoring non-finite scrollTop from store");
            return Vec::new();
        }
        if scroll_top == self.state.scroll_top {
            trace!(scroll_top, "scrollTop unchanged; no tick");
            return Vec::new();
        }
        self.state.scroll_top = scroll_top;
        self.tick(&[self.nodes.scroll_top])
    }

    /// Record a local viewport measurement. Identical sizes are ignored.
    pub fn set_viewport(&mut self, size: ViewportSize) -> Vec<Action> {
        if !self.state.viewport.observe(size) {
            return Vec::new();
        }
        self.tick(&[self.nodes.viewport])
    }

    /// Recompute every derivation once from the current inputs.
    pub fn recompute_all(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        let Self { space, graph, nodes, state, ticks } = self;
        let visited = graph.recompute_all(|id| state.recompute(id, nodes, space, &mut actions));
        *ticks += 1;
        trace!(tick = *ticks, nodes = visited.len(), actions = actions.len(), "forced recompute");
        actions
    }

    fn tick(&mut self, changed: &[NodeId]) -> Vec<Action> {
        let mut actions = Vec::new();
        let Self { space, graph, nodes, state, ticks } = self;
        let visited = graph.propagate(changed, |id| state.recompute(id, nodes, space, &mut actions));
        *ticks += 1;
        trace!(tick = *ticks, nodes = visited.len(), actions = actions.len(), "projection tick");
        actions
    }

    // --- Input ---

    /// Decide what a wheel event does. The host swallows the event regardless.
    #[must_use]
    pub fn on_wheel(&self, delta: WheelDelta, writable: bool) -> WheelOutcome {
        if !writable {
            return WheelOutcome::Skipped(WheelSkip::ReadOnly);
        }
        let size = self.state.viewport.size();
        match input::scroll_after_wheel(&self.space, self.state.scroll_top, delta, size, self.state.scale) {
            Ok(top) => WheelOutcome::Write(top),
            Err(skip) => WheelOutcome::Skipped(skip),
        }
    }

    /// Clamped target for a programmatic scroll to `scroll_top`.
    ///
    /// # Errors
    ///
    /// Returns the [`WheelSkip`] gate that blocks the write.
    pub fn scroll_target(&self, scroll_top: f64, writable: bool) -> Result<f64, WheelSkip> {
        if !writable {
            return Err(WheelSkip::ReadOnly);
        }
        let range = self.scroll_range().ok_or(WheelSkip::Unmeasured)?;
        Ok(self.space.clamp_scroll_top(scroll_top, range))
    }

    /// Clamped target that puts `page` at the top of the page indicator.
    ///
    /// # Errors
    ///
    /// Returns the [`WheelSkip`] gate that blocks the write.
    pub fn page_target(&self, page: f64, writable: bool) -> Result<f64, WheelSkip> {
        let top = page::scroll_top_for_page(page, self.state.viewport.size(), self.state.scale)
            .ok_or(WheelSkip::Unmeasured)?;
        self.scroll_target(top, writable)
    }

    // --- Queries ---

    #[must_use]
    pub fn space(&self) -> LogicalSpace {
        self.space
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.state.scroll_top
    }

    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.state.viewport.size()
    }

    /// `viewportWidth / BASE_WIDTH`, or `0.0` before the first measurement.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Last computed page, `None` until the scale is known.
    #[must_use]
    pub fn page(&self) -> Option<f64> {
        self.state.page
    }

    #[must_use]
    pub fn page_count(&self) -> Option<f64> {
        page::page_count(&self.space, self.state.viewport.size(), self.state.scale)
    }

    #[must_use]
    pub fn scroll_range(&self) -> Option<ScrollRange> {
        let size = self.state.viewport.size();
        if !size.is_measured() {
            return None;
        }
        self.space.scroll_range(size.height, self.state.scale)
    }

    /// Logical y-range currently visible, centred on `scrollTop`.
    #[must_use]
    pub fn visible_range(&self) -> Option<Range<f64>> {
        let height = LogicalSpace::view_height(self.state.viewport.size().height, self.state.scale)?;
        let top = self.state.scroll_top - height / 2.0;
        Some(top..top + height)
    }

    #[must_use]
    pub fn contain_rect(&self) -> Option<ContainRect> {
        self.state.contain
    }

    #[must_use]
    pub fn camera_bound(&self) -> Option<CameraBound> {
        self.state.bound
    }

    /// How many times `node` has been recomputed.
    #[must_use]
    pub fn evaluations(&self, node: Node) -> u64 {
        self.state
            .evaluations
            .get(self.nodes.id(node).index())
            .copied()
            .unwrap_or_default()
    }

    /// Number of ticks run so far (including forced recomputes).
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn snapshot(&self) -> ProjectionSnapshot {
        ProjectionSnapshot {
            scroll_top: self.state.scroll_top,
            viewport: self.state.viewport.size(),
            scale: self.state.scale,
            page: self.state.page,
            page_count: self.page_count(),
        }
    }
}
