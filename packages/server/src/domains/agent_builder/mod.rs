//! Agent builder domain - agent workflow graphs and the lineage they imply
//!
//! Graphs live in the remote Graph Store. After every save the nodes are
//! walked for resource references and the agent's lineage is replaced in the
//! Lineage Store. Executions are relayed from the Agent Runtime unbuffered.

pub mod actions;
pub mod activities;
pub mod models;

pub use activities::{LineageExtractor, LineageReconciler, ReconcileReport, RelayStream};
pub use models::{
    AgentBuilderDetail, AgentBuilderSummary, CreateAgentBuilder, CreatedAgentBuilder,
    HasReferences, NodeBinding, ResourceRef, SaveAgentGraph, SavedAgentGraph,
};
