//! Server dependencies for domain operations (using traits for testability)
//!
//! This module provides the central dependency container used by all
//! agent-builder and MCP-catalog actions. Every platform service sits behind a
//! `Base*` trait so tests can swap in the mocks from `test_dependencies`.

use async_trait::async_trait;
use serde_json::Value;
use sktai_client::{
    ByteStream, CreateGraphRequest, CreateMcpCatalogRequest, FullLineage, Graph, GraphInfoUpdate,
    GraphPage, GraphTemplate, InferencePrompt, LineageBatch, LineageDirection, LineageEdge,
    ListGraphsQuery, McpCatalog, Policy, Result, SaveGraphRequest, SktaiClient,
    StreamGraphRequest,
};
use std::sync::Arc;

use crate::domains::agent_builder::activities::{LineageExtractor, LineageReconciler};
use crate::domains::scope::{ProjectAssetStore, ScopeResolver};
use crate::kernel::{
    BaseAgentRuntime, BaseGraphStore, BaseLineageStore, BaseMcpCatalogService, BasePolicyEngine,
    BasePromptService,
};

// =============================================================================
// SktaiClient Adapter (implements every platform trait)
// =============================================================================

/// Wrapper around SktaiClient that implements the Base* platform traits
pub struct SktaiAdapter(pub Arc<SktaiClient>);

impl SktaiAdapter {
    pub fn new(client: Arc<SktaiClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseGraphStore for SktaiAdapter {
    async fn list_graphs(&self, query: &ListGraphsQuery) -> Result<GraphPage> {
        self.0.list_graphs(query).await
    }

    async fn create_graph(&self, req: &CreateGraphRequest) -> Result<Graph> {
        self.0.create_graph(req).await
    }

    async fn get_graph(&self, graph_id: &str) -> Result<Graph> {
        self.0.get_graph(graph_id).await
    }

    async fn save_graph(&self, graph_id: &str, req: &SaveGraphRequest) -> Result<Graph> {
        self.0.save_graph(graph_id, req).await
    }

    async fn update_graph_info(&self, graph_id: &str, req: &GraphInfoUpdate) -> Result<()> {
        self.0.update_graph_info(graph_id, req).await
    }

    async fn delete_graph(&self, graph_id: &str) -> Result<()> {
        self.0.delete_graph(graph_id).await
    }

    async fn get_graph_app_info(&self, graph_id: &str) -> Result<Value> {
        self.0.get_graph_app_info(graph_id).await
    }

    async fn export_graph_code(&self, graph_id: &str, credential_type: &str) -> Result<Value> {
        self.0.export_graph_code(graph_id, credential_type).await
    }

    async fn get_graph_templates(&self) -> Result<Vec<GraphTemplate>> {
        self.0.get_graph_templates().await
    }

    async fn get_graph_template(&self, template_id: &str) -> Result<GraphTemplate> {
        self.0.get_graph_template(template_id).await
    }
}

#[async_trait]
impl BaseLineageStore for SktaiAdapter {
    async fn delete_lineage(&self, source_key: &str) -> Result<()> {
        self.0.delete_lineage(source_key).await
    }

    async fn create_lineage(&self, edges: &[LineageEdge]) -> Result<()> {
        let batch = LineageBatch {
            lineages: edges.to_vec(),
        };
        self.0.create_lineage(&batch).await
    }

    async fn get_full_lineage(
        &self,
        source_key: &str,
        direction: LineageDirection,
    ) -> Result<FullLineage> {
        self.0.get_full_lineage(source_key, direction).await
    }
}

#[async_trait]
impl BasePromptService for SktaiAdapter {
    async fn get_inference_prompt(&self, prompt_id: &str) -> Result<InferencePrompt> {
        self.0.get_inference_prompt(prompt_id).await
    }
}

#[async_trait]
impl BasePolicyEngine for SktaiAdapter {
    async fn set_policy_by_current_group(
        &self,
        resource_url: &str,
        user_token: &str,
    ) -> Result<()> {
        self.0
            .set_resource_policy_by_current_group(resource_url, user_token)
            .await
    }

    async fn set_policy_by_member(
        &self,
        resource_url: &str,
        member_id: &str,
        project_name: &str,
    ) -> Result<()> {
        self.0
            .set_resource_policy_by_member(resource_url, member_id, project_name)
            .await
    }

    async fn get_policy(&self, resource_url: &str) -> Result<Vec<Policy>> {
        self.0.get_policy(resource_url).await
    }
}

#[async_trait]
impl BaseMcpCatalogService for SktaiAdapter {
    async fn create_catalog(&self, req: &CreateMcpCatalogRequest) -> Result<McpCatalog> {
        self.0.create_mcp_catalog(req).await
    }

    async fn delete_serving(&self, catalog_id: &str) -> Result<()> {
        self.0.delete_mcp_serving(catalog_id).await
    }

    async fn delete_catalog(&self, catalog_id: &str) -> Result<()> {
        self.0.delete_mcp_catalog(catalog_id).await
    }
}

#[async_trait]
impl BaseAgentRuntime for SktaiAdapter {
    async fn stream_graph(&self, req: &StreamGraphRequest) -> Result<ByteStream> {
        self.0.stream_graph(req).await
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub graphs: Arc<dyn BaseGraphStore>,
    pub lineage: Arc<dyn BaseLineageStore>,
    pub mcp: Arc<dyn BaseMcpCatalogService>,
    pub runtime: Arc<dyn BaseAgentRuntime>,
    /// Shared so reconcile checkpoints survive across requests
    pub reconciler: Arc<LineageReconciler>,
    pub scope: Arc<ScopeResolver>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        graphs: Arc<dyn BaseGraphStore>,
        lineage: Arc<dyn BaseLineageStore>,
        prompts: Arc<dyn BasePromptService>,
        policy: Arc<dyn BasePolicyEngine>,
        mcp: Arc<dyn BaseMcpCatalogService>,
        runtime: Arc<dyn BaseAgentRuntime>,
        assets: Arc<dyn ProjectAssetStore>,
    ) -> Self {
        let reconciler = Arc::new(LineageReconciler::new(
            LineageExtractor::new(prompts),
            lineage.clone(),
        ));
        let scope = Arc::new(ScopeResolver::new(policy, assets));
        Self {
            graphs,
            lineage,
            mcp,
            runtime,
            reconciler,
            scope,
        }
    }

    /// Wire every platform trait to one SKTAI client.
    pub fn from_client(client: Arc<SktaiClient>, assets: Arc<dyn ProjectAssetStore>) -> Self {
        let adapter = Arc::new(SktaiAdapter::new(client));
        Self::new(
            adapter.clone(),
            adapter.clone(),
            adapter.clone(),
            adapter.clone(),
            adapter.clone(),
            adapter,
            assets,
        )
    }
}
