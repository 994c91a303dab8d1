//! Control flow graph construction for a single Rust function.
//!
//! The crate consumes a [`syn::File`] holding exactly one function item and
//! produces a [`ControlFlowGraph`]: declarations, calls and branch tests
//! become nodes, and the possible steps of execution become edges tagged
//! with the branch condition that enables them. `break` and `continue` are
//! modeled with transient jump placeholders that
//! [`ControlFlowGraph::eliminate_jumps`] splices out once every destination
//! is known; [`ControlFlowGraph::to_dot`] then serializes the result for
//! GraphViz.

mod builder;
mod display;
mod dot;
mod eliminate_jumps;
mod flow_graph;

pub use builder::GraphBuilder;
pub use flow_graph::{
    ControlFlowGraph, EdgeCondition, EntryPoint, ExitPoint, FlowGraphNode, Fragment, Graph,
};
pub use flowviz_error::error::FlowError;

// Re-exported for downstream crates that hold on to node handles.
pub use petgraph::stable_graph::NodeIndex;
