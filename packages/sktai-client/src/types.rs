//! Wire types for the SKTAI platform APIs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Graph Store
// =============================================================================

/// Node/edge structure exactly as the Graph Store stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Editor-only fields (position, measured size, ...) carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub graph: GraphPayload,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Row of a Graph Store listing (no node payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphPage {
    #[serde(default)]
    pub data: Vec<GraphSummary>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListGraphsQuery {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGraphRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub graph: GraphPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphInfoUpdate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveGraphRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub graph: GraphPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub graph: Option<GraphPayload>,
}

// =============================================================================
// Lineage Store
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineageObjectType {
    AgentGraph,
    ServingModel,
    Prompt,
    Tool,
    FewShot,
    Mcp,
    Knowledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineageAction {
    Use,
}

/// Directed "uses" relationship between two platform objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineageEdge {
    pub source_key: String,
    pub source_type: LineageObjectType,
    pub target_key: String,
    pub target_type: LineageObjectType,
    pub action: LineageAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineageBatch {
    pub lineages: Vec<LineageEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineageDirection {
    Upstream,
    #[default]
    Downstream,
}

impl LineageDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineageDirection::Upstream => "upstream",
            LineageDirection::Downstream => "downstream",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FullLineage {
    #[serde(default)]
    pub lineages: Vec<LineageEdge>,
}

// =============================================================================
// Prompt Service
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferencePrompt {
    #[serde(alias = "uuid")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

// =============================================================================
// Policy Engine
// =============================================================================

/// One access policy attached to a resource URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub decision_strategy: Option<String>,
    #[serde(default)]
    pub logic: Option<String>,
    #[serde(default)]
    pub policies: Vec<PolicyItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single condition inside a policy ("role", "regex", "user", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub logic: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyItem {
    pub fn is_role(&self) -> bool {
        self.kind.eq_ignore_ascii_case("role")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPolicyRequest {
    pub resource_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberPolicyRequest {
    pub resource_url: String,
    pub member_id: String,
    pub project_name: String,
}

// =============================================================================
// MCP Catalog
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpCatalog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMcpCatalogRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Server type, transport and connection settings as the catalog expects them.
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

// =============================================================================
// Agent Runtime
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamGraphRequest {
    pub graph_id: String,
    #[serde(default)]
    pub input_data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_edge_wire_format() {
        let edge = LineageEdge {
            source_key: "g-1".into(),
            source_type: LineageObjectType::AgentGraph,
            target_key: "fs-1".into(),
            target_type: LineageObjectType::FewShot,
            action: LineageAction::Use,
        };
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["source_type"], "AGENT_GRAPH");
        assert_eq!(json["target_type"], "FEW_SHOT");
        assert_eq!(json["action"], "USE");
    }

    #[test]
    fn test_graph_node_keeps_editor_fields() {
        let node: GraphNode = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "type": "agent__generator",
            "data": {"serving_model": "D"},
            "position": {"x": 10, "y": 20}
        }))
        .unwrap();
        assert_eq!(node.kind, "agent__generator");
        assert_eq!(node.extra["position"]["x"], 10);

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["type"], "agent__generator");
        assert_eq!(back["position"]["y"], 20);
    }

    #[test]
    fn test_policy_item_role_detection() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "decision_strategy": "AFFIRMATIVE",
            "logic": "POSITIVE",
            "policies": [
                {"type": "role", "roles": ["admin"]},
                {"type": "regex", "target_claim": "current_group", "pattern": "^/p1$"}
            ]
        }))
        .unwrap();
        assert!(policy.policies[0].is_role());
        assert!(!policy.policies[1].is_role());
        assert_eq!(policy.policies[1].extra["pattern"], "^/p1$");
    }
}
