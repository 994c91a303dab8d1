//! GraphViz DOT serialization of a finished graph.

use petgraph::dot::{Config, Dot};

use crate::flow_graph::ControlFlowGraph;

impl ControlFlowGraph {
    /// Serialize the graph to DOT source.
    ///
    /// Nodes are titled `"<order>. <label>"`, node shapes encode the node
    /// kind and edge colors encode the branch condition, so the rendered
    /// picture carries the same information as the graph itself.
    pub fn to_dot(&self) -> String {
        format!(
            "{:?}",
            Dot::with_attr_getters(
                &self.graph,
                &[Config::NodeNoLabel, Config::EdgeNoLabel],
                &|_, er| format!("color = {:?}", er.weight().color()),
                &|_, nr| format!("label = {:?} shape = {}", nr.1.title(), nr.1.shape()),
            )
        )
    }
}
