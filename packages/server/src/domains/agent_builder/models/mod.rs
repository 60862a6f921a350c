pub mod agent_builder;
pub mod graph;
pub mod references;

pub use agent_builder::{
    AgentBuilderDetail, AgentBuilderSummary, CreateAgentBuilder, CreatedAgentBuilder,
    SaveAgentGraph, SavedAgentGraph,
};
pub use graph::{normalize_graph, parse_edges, parse_nodes};
pub use references::{bindings, HasReferences, NodeBinding, ResourceRef};
