// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Each one covers a single SKTAI platform service; lineage derivation and
// scope resolution are domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseGraphStore, BasePolicyEngine)

use async_trait::async_trait;
use serde_json::Value;
use sktai_client::{
    ByteStream, CreateGraphRequest, CreateMcpCatalogRequest, FullLineage, Graph, GraphInfoUpdate,
    GraphPage, GraphTemplate, InferencePrompt, LineageDirection, LineageEdge, ListGraphsQuery,
    McpCatalog, Policy, Result, SaveGraphRequest, StreamGraphRequest,
};

// =============================================================================
// Graph Store Trait
// =============================================================================

#[async_trait]
pub trait BaseGraphStore: Send + Sync {
    async fn list_graphs(&self, query: &ListGraphsQuery) -> Result<GraphPage>;

    async fn create_graph(&self, req: &CreateGraphRequest) -> Result<Graph>;

    async fn get_graph(&self, graph_id: &str) -> Result<Graph>;

    /// Replace name, description and the full node/edge payload.
    async fn save_graph(&self, graph_id: &str, req: &SaveGraphRequest) -> Result<Graph>;

    async fn update_graph_info(&self, graph_id: &str, req: &GraphInfoUpdate) -> Result<()>;

    async fn delete_graph(&self, graph_id: &str) -> Result<()>;

    async fn get_graph_app_info(&self, graph_id: &str) -> Result<Value>;

    async fn export_graph_code(&self, graph_id: &str, credential_type: &str) -> Result<Value>;

    async fn get_graph_templates(&self) -> Result<Vec<GraphTemplate>>;

    async fn get_graph_template(&self, template_id: &str) -> Result<GraphTemplate>;
}

// =============================================================================
// Lineage Store Trait
// =============================================================================

#[async_trait]
pub trait BaseLineageStore: Send + Sync {
    /// Delete every edge whose source key is `source_key`.
    async fn delete_lineage(&self, source_key: &str) -> Result<()>;

    /// Insert all edges in one call.
    async fn create_lineage(&self, edges: &[LineageEdge]) -> Result<()>;

    async fn get_full_lineage(
        &self,
        source_key: &str,
        direction: LineageDirection,
    ) -> Result<FullLineage>;
}

// =============================================================================
// Prompt Service Trait
// =============================================================================

#[async_trait]
pub trait BasePromptService: Send + Sync {
    async fn get_inference_prompt(&self, prompt_id: &str) -> Result<InferencePrompt>;
}

// =============================================================================
// Policy Engine Trait
// =============================================================================

#[async_trait]
pub trait BasePolicyEngine: Send + Sync {
    /// Policy derived from the group carried by the user's token.
    async fn set_policy_by_current_group(&self, resource_url: &str, user_token: &str)
        -> Result<()>;

    async fn set_policy_by_member(
        &self,
        resource_url: &str,
        member_id: &str,
        project_name: &str,
    ) -> Result<()>;

    async fn get_policy(&self, resource_url: &str) -> Result<Vec<Policy>>;
}

// =============================================================================
// MCP Catalog Trait
// =============================================================================

#[async_trait]
pub trait BaseMcpCatalogService: Send + Sync {
    async fn create_catalog(&self, req: &CreateMcpCatalogRequest) -> Result<McpCatalog>;

    /// Remove the serving instance behind a catalog entry.
    async fn delete_serving(&self, catalog_id: &str) -> Result<()>;

    async fn delete_catalog(&self, catalog_id: &str) -> Result<()>;
}

// =============================================================================
// Agent Runtime Trait
// =============================================================================

#[async_trait]
pub trait BaseAgentRuntime: Send + Sync {
    /// Open a chunked execution; chunks are yielded as the runtime sends them.
    async fn stream_graph(&self, req: &StreamGraphRequest) -> Result<ByteStream>;
}
