use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `sharing_project_seq` value meaning "public to all projects".
pub const PUBLIC_SHARING_SEQ: i64 = -1;

/// Ownership/sharing row for one resource URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectAsset {
    pub asset_url: String,
    pub owning_project_seq: i64,
    /// < 0 public, > 0 shared with that project
    pub sharing_project_seq: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resource kinds that carry a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    AgentGraph,
    McpCatalog,
}

impl AssetKind {
    fn url_prefix(&self) -> &'static str {
        match self {
            AssetKind::AgentGraph => "/api/v1/agent/agents/graphs",
            AssetKind::McpCatalog => "/api/v1/mcp/catalogs",
        }
    }
}

/// Canonical URL the Policy Engine and the scope table key a resource by.
pub fn asset_url(kind: AssetKind, resource_id: &str) -> String {
    format!("{}/{}", kind.url_prefix(), resource_id)
}
