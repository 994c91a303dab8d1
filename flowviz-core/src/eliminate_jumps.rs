//! Removal of `break` and `continue` placeholder nodes.

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::flow_graph::{ControlFlowGraph, EdgeCondition};

impl ControlFlowGraph {
    /// Splice every jump placeholder out of the graph.
    ///
    /// Each placeholder's predecessors are wired directly to each of its
    /// successors, and the predecessor's edge condition survives onto the
    /// replacement edge. The full replacement set is collected before the
    /// graph is touched; only then is the placeholder removed together with
    /// its own edges. A graph without placeholders passes through
    /// unchanged.
    pub fn eliminate_jumps(&mut self) {
        let jumps: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|index| self.graph[*index].is_jump())
            .collect();

        for jump in &jumps {
            let incoming: Vec<(NodeIndex, EdgeCondition)> = self
                .graph
                .edges_directed(*jump, Direction::Incoming)
                .map(|edge| (edge.source(), *edge.weight()))
                .collect();
            let outgoing: Vec<NodeIndex> = self
                .graph
                .edges_directed(*jump, Direction::Outgoing)
                .map(|edge| edge.target())
                .collect();

            for (source, condition) in &incoming {
                for target in &outgoing {
                    self.add_edge(*source, *target, *condition);
                }
            }
            self.graph.remove_node(*jump);
        }

        if !jumps.is_empty() {
            tracing::debug!(spliced = jumps.len(), "jump placeholders eliminated");
            self.exit_points
                .retain(|index| self.graph.node_weight(*index).is_some());
        }
    }
}
