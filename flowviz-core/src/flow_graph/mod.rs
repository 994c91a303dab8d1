//! This is the flow graph, a graph which contains edges that represent possible steps of program
//! execution through a single function body.

use std::fmt;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

mod fragment;
pub use fragment::Fragment;

pub type EntryPoint = NodeIndex;
pub type ExitPoint = NodeIndex;

/// Nodes are stored in one stable arena per build, so node indices stay
/// valid across the removals performed by jump elimination.
pub type Graph = StableDiGraph<FlowGraphNode, EdgeCondition>;

/// The condition under which an edge is taken. Edges out of a
/// [`FlowGraphNode::Condition`] carry `True` or `False`; everything else is
/// `Unconditional`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeCondition {
    Unconditional,
    True,
    False,
}

impl EdgeCondition {
    /// Edge color in the rendered graph.
    pub(crate) fn color(&self) -> &'static str {
        match self {
            EdgeCondition::Unconditional => "#000000",
            EdgeCondition::True => "#00FF00",
            EdgeCondition::False => "#FF0000",
        }
    }
}

/// A vertex of the flow graph.
///
/// Every variant except `Jump` carries the order number assigned when the
/// builder reached it and a display label derived from the source text.
/// `Jump` is a placeholder for a `break` or `continue` whose destination is
/// unknown while the enclosing loop is still being built; placeholders are
/// spliced out by [`ControlFlowGraph::eliminate_jumps`] and never reach the
/// rendered output.
///
/// [`ControlFlowGraph::eliminate_jumps`]: crate::ControlFlowGraph::eliminate_jumps
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowGraphNode {
    Entry {
        order: u32,
        label: String,
    },
    Action {
        order: u32,
        label: String,
        is_sink: bool,
    },
    Condition {
        order: u32,
        label: String,
    },
    Jump {
        label: String,
    },
}

impl FlowGraphNode {
    /// The position of this node in the builder's traversal, if it has one.
    /// Jump placeholders do not consume order numbers.
    pub fn order(&self) -> Option<u32> {
        match self {
            FlowGraphNode::Entry { order, .. }
            | FlowGraphNode::Action { order, .. }
            | FlowGraphNode::Condition { order, .. } => Some(*order),
            FlowGraphNode::Jump { .. } => None,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FlowGraphNode::Entry { label, .. }
            | FlowGraphNode::Action { label, .. }
            | FlowGraphNode::Condition { label, .. }
            | FlowGraphNode::Jump { label } => label,
        }
    }

    /// A sink never gains outgoing edges; `return` nodes are sinks.
    pub fn is_sink(&self) -> bool {
        matches!(self, FlowGraphNode::Action { is_sink: true, .. })
    }

    pub fn is_jump(&self) -> bool {
        matches!(self, FlowGraphNode::Jump { .. })
    }

    /// Node shape in the rendered graph.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            FlowGraphNode::Entry { .. } => "ellipse",
            FlowGraphNode::Action { .. } => "box",
            FlowGraphNode::Condition { .. } => "diamond",
            // only visible when a graph is rendered without jump
            // elimination having run
            FlowGraphNode::Jump { .. } => "egg",
        }
    }

    /// The text shown inside the rendered node.
    pub(crate) fn title(&self) -> String {
        match self.order() {
            Some(order) => format!("{}. {}", order, self.label()),
            None => self.label().to_string(),
        }
    }
}

impl fmt::Display for FlowGraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A graph that models the control flow of one function: statements and
/// branch tests are nodes, possible execution steps are edges tagged with
/// the [`EdgeCondition`] that enables them.
#[derive(Clone, Debug, Default)]
pub struct ControlFlowGraph {
    pub(crate) graph: Graph,
    pub(crate) entry_points: Vec<EntryPoint>,
    pub(crate) exit_points: Vec<ExitPoint>,
}

impl ControlFlowGraph {
    pub(crate) fn add_node(&mut self, node: FlowGraphNode) -> NodeIndex {
        self.graph.add_node(node)
    }

    /// Add the edge `from -> to`, replacing the condition if the edge
    /// already exists. A node holds at most one edge to any given
    /// successor.
    pub(crate) fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, condition: EdgeCondition) {
        self.graph.update_edge(from, to, condition);
    }

    pub(crate) fn mark_sink(&mut self, index: NodeIndex) {
        if let FlowGraphNode::Action { is_sink, .. } = &mut self.graph[index] {
            *is_sink = true;
        }
    }

    pub(crate) fn is_sink(&self, index: NodeIndex) -> bool {
        self.graph[index].is_sink()
    }

    pub fn node(&self, index: NodeIndex) -> &FlowGraphNode {
        &self.graph[index]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// The nodes reachable from `index` in one step, with the condition on
    /// each edge.
    pub fn successors(&self, index: NodeIndex) -> Vec<(NodeIndex, EdgeCondition)> {
        self.graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| (edge.target(), *edge.weight()))
            .collect()
    }

    pub fn predecessors(&self, index: NodeIndex) -> Vec<(NodeIndex, EdgeCondition)> {
        self.graph
            .edges_directed(index, Direction::Incoming)
            .map(|edge| (edge.source(), *edge.weight()))
            .collect()
    }

    /// The condition on the edge `from -> to`, if that edge exists.
    pub fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<EdgeCondition> {
        self.graph.find_edge(from, to).map(|edge| self.graph[edge])
    }

    /// The first node whose display label equals `label`.
    pub fn node_with_label(&self, label: &str) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|index| self.graph[*index].label() == label)
    }

    pub fn entry_points(&self) -> &[EntryPoint] {
        &self.entry_points
    }

    /// The open frontier left when the last statement of the function body
    /// had been wired: the nodes control falls off the end from.
    pub fn exit_points(&self) -> &[ExitPoint] {
        &self.exit_points
    }
}
