//! Read models returned by agent-builder operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sktai_client::{Graph, GraphSummary};

use crate::domains::scope::Scope;

/// One row of the agent-builder listing.
#[derive(Debug, Clone, Serialize)]
pub struct AgentBuilderSummary {
    #[serde(flatten)]
    pub graph: GraphSummary,
    pub scope: Scope,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentBuilderDetail {
    #[serde(flatten)]
    pub graph: Graph,
    pub scope: Scope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgentBuilder {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Initial `{ nodes, edges }`, e.g. copied from a template
    #[serde(default)]
    pub graph: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveAgentGraph {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub graph: Option<Value>,
}

/// Result of a create: the graph plus the scope actually enforced.
///
/// `applied_scope` is `None` when the policy push failed; reads then show the default.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedAgentBuilder {
    #[serde(flatten)]
    pub graph: Graph,
    pub applied_scope: Option<Scope>,
    pub lineage_edges: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedAgentGraph {
    #[serde(flatten)]
    pub graph: Graph,
    pub lineage_edges: usize,
}
