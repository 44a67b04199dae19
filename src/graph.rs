//! Push-based dependency graph for the derived scroll quantities.
//!
//! DESIGN
//! ======
//! Nodes are registered in order, and a derived node may only name nodes that
//! already exist as its dependencies. Registration order is therefore a
//! topological order, and the graph needs no cycle detection.
//!
//! The graph owns structure only. Values live with the caller, which supplies a
//! `recompute` callback during [`DepGraph::propagate`]. One propagation is one
//! tick: every affected derived node is recomputed exactly once, in
//! registration order, after all of its inputs for that tick are settled. A
//! node whose recompute reports "unchanged" does not dirty its dependents.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

/// Handle to a node in a [`DepGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Registration index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Error returned when registering a derived node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("derived node {name} has no dependencies")]
    NoDependencies { name: &'static str },
    #[error("derived node {name} depends on unregistered node #{dep}")]
    UnknownDependency { name: &'static str, dep: usize },
}

#[derive(Debug, Clone)]
struct Node {
    name: &'static str,
    deps: Vec<NodeId>,
    dependents: Vec<NodeId>,
}

/// Registration-ordered DAG of root and derived nodes.
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    nodes: Vec<Node>,
}

impl DepGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input node. Roots are only ever changed from outside.
    pub fn add_root(&mut self, name: &'static str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { name, deps: Vec::new(), dependents: Vec::new() });
        id
    }

    /// Register a node derived from `deps`, all of which must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] for an empty or unknown dependency list.
    pub fn add_derived(&mut self, name: &'static str, deps: &[NodeId]) -> Result<NodeId, GraphError> {
        if deps.is_empty() {
            return Err(GraphError::NoDependencies { name });
        }
        if let Some(bad) = deps.iter().find(|d| d.0 >= self.nodes.len()) {
            return Err(GraphError::UnknownDependency { name, dep: bad.0 });
        }
        let id = NodeId(self.nodes.len());
        let mut unique: Vec<NodeId> = Vec::with_capacity(deps.len());
        for dep in deps {
            if !unique.contains(dep) {
                unique.push(*dep);
            }
        }
        for dep in &unique {
            self.nodes[dep.0].dependents.push(id);
        }
        self.nodes.push(Node { name, deps: unique, dependents: Vec::new() });
        Ok(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn name(&self, id: NodeId) -> Option<&'static str> {
        self.nodes.get(id.0).map(|n| n.name)
    }

    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.deps.is_empty())
    }

    /// Direct inputs of `id`, in the order they were declared.
    #[must_use]
    pub fn dependencies(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.deps.as_slice())
    }

    /// Direct dependents of `id`, in registration order.
    #[must_use]
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.dependents.as_slice())
    }

    /// Run one tick starting from the roots in `changed`.
    ///
    /// `recompute` is called once per affected derived node and returns whether
    /// the node's value changed. Returns the recomputed nodes in visit order.
    pub fn propagate<F>(&self, changed: &[NodeId], mut recompute: F) -> Vec<NodeId>
    where
        F: FnMut(NodeId) -> bool,
    {
        let mut dirty = vec![false; self.nodes.len()];
        for id in changed {
            if let Some(slot) = dirty.get_mut(id.0) {
                *slot = true;
            }
        }
        let mut visited = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.deps.is_empty() || !node.deps.iter().any(|d| dirty[d.0]) {
                continue;
            }
            let id = NodeId(idx);
            visited.push(id);
            if recompute(id) {
                dirty[idx] = true;
            }
        }
        visited
    }

    /// Recompute every derived node once, in registration order, regardless of change.
    pub fn recompute_all<F>(&self, mut recompute: F) -> Vec<NodeId>
    where
        F: FnMut(NodeId) -> bool,
    {
        let mut visited = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.deps.is_empty() {
                continue;
            }
            let id = NodeId(idx);
            visited.push(id);
            recompute(id);
        }
        visited
    }
}
