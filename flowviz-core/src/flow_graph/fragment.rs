//! Partially built regions of the flow graph.

use petgraph::stable_graph::NodeIndex;

use super::{ControlFlowGraph, EdgeCondition};

/// A region of the graph still under construction: a non-owning view over
/// the arena.
///
/// `entry` records the nodes the region was entered through and never
/// changes after seeding. `frontier` is the open end, the nodes whose
/// outgoing edges are still to be wired. `pending` tags the next edge wired
/// out of the frontier; it is consumed by the first edge of the next
/// [`Fragment::attach`] call and all further edges fall back to
/// [`EdgeCondition::Unconditional`].
#[derive(Clone, Debug, Default)]
pub struct Fragment {
    entry: Vec<NodeIndex>,
    frontier: Vec<NodeIndex>,
    pending: Option<EdgeCondition>,
}

impl Fragment {
    /// A fragment whose entry set and frontier are both `entry`.
    pub fn seeded(entry: Vec<NodeIndex>) -> Self {
        Fragment {
            frontier: entry.clone(),
            entry,
            pending: None,
        }
    }

    /// Like [`Fragment::seeded`], with a condition for the first edge wired
    /// out of this fragment.
    pub fn seeded_with(entry: Vec<NodeIndex>, condition: EdgeCondition) -> Self {
        Fragment {
            frontier: entry.clone(),
            entry,
            pending: Some(condition),
        }
    }

    pub fn entry(&self) -> &[NodeIndex] {
        &self.entry
    }

    pub fn frontier(&self) -> &[NodeIndex] {
        &self.frontier
    }

    pub(crate) fn pending(&self) -> Option<EdgeCondition> {
        self.pending
    }

    /// The frontier filtered to nodes that may still gain successors.
    pub fn active_frontier(&self, graph: &ControlFlowGraph) -> Vec<NodeIndex> {
        self.frontier
            .iter()
            .copied()
            .filter(|index| !graph.is_sink(*index))
            .collect()
    }

    /// Wire every active frontier node to `node` and make `node` the sole
    /// frontier. The pending condition goes on the first edge only.
    pub fn attach(&mut self, graph: &mut ControlFlowGraph, node: NodeIndex) {
        for from in self.active_frontier(graph) {
            let condition = self.pending.take().unwrap_or(EdgeCondition::Unconditional);
            graph.add_edge(from, node, condition);
        }
        self.frontier = vec![node];
    }

    /// Continue this fragment through `other`: the frontier becomes
    /// `other`'s active frontier.
    pub fn sequence(&mut self, graph: &ControlFlowGraph, other: Fragment) {
        self.frontier = other.active_frontier(graph);
    }

    /// Reconverge `other` into this fragment: `other`'s active frontier is
    /// unioned into the frontier. The pending condition is left to each
    /// fragment; merging never transfers it.
    pub fn merge(&mut self, graph: &ControlFlowGraph, other: Fragment) {
        for index in other.active_frontier(graph) {
            if !self.frontier.contains(&index) {
                self.frontier.push(index);
            }
        }
    }

    /// Append a single node to the frontier.
    pub fn push_frontier(&mut self, index: NodeIndex) {
        if !self.frontier.contains(&index) {
            self.frontier.push(index);
        }
    }

    /// Replace the frontier wholesale. Loop wiring uses this to reopen the
    /// loop test as the frontier once the body has been closed.
    pub fn set_frontier(&mut self, frontier: Vec<NodeIndex>) {
        self.frontier = frontier;
    }

    /// Empty the frontier: the current path has jumped away and only
    /// rejoins the graph through the enclosing loop's bookkeeping.
    pub fn clear_frontier(&mut self) {
        self.frontier.clear();
    }
}
