// TestDependencies - mock implementations for testing
//
// Provides mock platform services that can be injected into ServerDeps for tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use sktai_client::{
    ByteStream, CreateGraphRequest, CreateMcpCatalogRequest, FullLineage, Graph, GraphInfoUpdate,
    GraphPage, GraphPayload, GraphSummary, GraphTemplate, InferencePrompt, LineageDirection,
    LineageEdge, ListGraphsQuery, McpCatalog, Policy, Result, SaveGraphRequest, SktaiError,
    StreamGraphRequest,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{
    BaseAgentRuntime, BaseGraphStore, BaseLineageStore, BaseMcpCatalogService, BasePolicyEngine,
    BasePromptService, ServerDeps,
};
use crate::common::Actor;
use crate::domains::scope::{MemoryProjectAssetStore, ProjectAsset, ProjectAssetStore};

fn api_error(status: u16, message: &str) -> SktaiError {
    SktaiError::Api {
        status,
        message: message.to_string(),
    }
}

fn not_found(what: &str, id: &str) -> SktaiError {
    api_error(404, &format!("{} {} not found", what, id))
}

/// Actor with a complete project assignment in project `p-1`.
pub fn test_actor() -> Actor {
    Actor {
        member_id: "member-1".to_string(),
        project_id: "p-1".to_string(),
        project_name: "project-one".to_string(),
        project_seq: 1,
        access_token: "user-token".to_string(),
    }
}

// =============================================================================
// Mock Graph Store
// =============================================================================

pub struct MockGraphStore {
    graphs: Arc<Mutex<HashMap<String, Graph>>>,
    templates: Arc<Mutex<Vec<GraphTemplate>>>,
    failures: Arc<Mutex<HashMap<&'static str, (u16, String)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    next_id: AtomicU64,
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self {
            graphs: Arc::new(Mutex::new(HashMap::new())),
            templates: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed a stored graph
    pub fn with_graph(self, graph: Graph) -> Self {
        self.graphs.lock().unwrap().insert(graph.id.clone(), graph);
        self
    }

    pub fn with_template(self, template: GraphTemplate) -> Self {
        self.templates.lock().unwrap().push(template);
        self
    }

    /// Make one operation ("create", "save", "delete", ...) answer with an API error
    pub fn failing(self, operation: &'static str, status: u16, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (status, message.to_string()));
        self
    }

    /// Operations in call order, as "op" or "op:graph_id"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self, graph_id: &str) -> Option<Graph> {
        self.graphs.lock().unwrap().get(graph_id).cloned()
    }

    fn record(&self, operation: &'static str, graph_id: Option<&str>) -> Result<()> {
        let call = match graph_id {
            Some(id) => format!("{}:{}", operation, id),
            None => operation.to_string(),
        };
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(operation) {
            Some((status, message)) => Err(api_error(*status, message)),
            None => Ok(()),
        }
    }

    fn find(&self, graph_id: &str) -> Result<Graph> {
        self.stored(graph_id)
            .ok_or_else(|| not_found("graph", graph_id))
    }
}

#[async_trait]
impl BaseGraphStore for MockGraphStore {
    async fn list_graphs(&self, query: &ListGraphsQuery) -> Result<GraphPage> {
        self.record("list", None)?;
        let mut matching: Vec<Graph> = self
            .graphs
            .lock()
            .unwrap()
            .values()
            .filter(|g| match &query.search {
                Some(search) => g.name.contains(search.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));

        let total = matching.len() as u64;
        let skip = (query.page.saturating_sub(1) * query.size) as usize;
        let data = matching
            .into_iter()
            .skip(skip)
            .take(query.size as usize)
            .map(|g| GraphSummary {
                id: g.id,
                name: g.name,
                description: g.description,
                created_by: g.created_by,
                created_at: g.created_at,
                updated_at: g.updated_at,
            })
            .collect();
        Ok(GraphPage { data, total })
    }

    async fn create_graph(&self, req: &CreateGraphRequest) -> Result<Graph> {
        self.record("create", None)?;
        let id = format!("g-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let graph = Graph {
            id: id.clone(),
            name: req.name.clone(),
            description: req.description.clone(),
            graph: req.graph.clone(),
            created_by: Some("member-1".to_string()),
            created_at: None,
            updated_at: None,
        };
        self.graphs.lock().unwrap().insert(id, graph.clone());
        Ok(graph)
    }

    async fn get_graph(&self, graph_id: &str) -> Result<Graph> {
        self.record("get", Some(graph_id))?;
        self.find(graph_id)
    }

    async fn save_graph(&self, graph_id: &str, req: &SaveGraphRequest) -> Result<Graph> {
        self.record("save", Some(graph_id))?;
        let mut graph = self.find(graph_id)?;
        graph.name = req.name.clone();
        graph.description = req.description.clone();
        graph.graph = req.graph.clone();
        self.graphs
            .lock()
            .unwrap()
            .insert(graph_id.to_string(), graph.clone());
        Ok(graph)
    }

    async fn update_graph_info(&self, graph_id: &str, req: &GraphInfoUpdate) -> Result<()> {
        self.record("update_info", Some(graph_id))?;
        let mut graphs = self.graphs.lock().unwrap();
        let graph = graphs
            .get_mut(graph_id)
            .ok_or_else(|| not_found("graph", graph_id))?;
        graph.name = req.name.clone();
        graph.description = req.description.clone();
        Ok(())
    }

    async fn delete_graph(&self, graph_id: &str) -> Result<()> {
        self.record("delete", Some(graph_id))?;
        self.graphs
            .lock()
            .unwrap()
            .remove(graph_id)
            .map(|_| ())
            .ok_or_else(|| not_found("graph", graph_id))
    }

    async fn get_graph_app_info(&self, graph_id: &str) -> Result<Value> {
        self.record("app_info", Some(graph_id))?;
        self.find(graph_id)?;
        Ok(json!({"graph_id": graph_id, "deployed": false}))
    }

    async fn export_graph_code(&self, graph_id: &str, credential_type: &str) -> Result<Value> {
        self.record("export", Some(graph_id))?;
        let graph = self.find(graph_id)?;
        Ok(json!({"name": graph.name, "credential_type": credential_type, "code": "# generated"}))
    }

    async fn get_graph_templates(&self) -> Result<Vec<GraphTemplate>> {
        self.record("templates", None)?;
        Ok(self.templates.lock().unwrap().clone())
    }

    async fn get_graph_template(&self, template_id: &str) -> Result<GraphTemplate> {
        self.record("template", Some(template_id))?;
        self.templates
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == template_id)
            .cloned()
            .ok_or_else(|| not_found("template", template_id))
    }
}

// =============================================================================
// Mock Lineage Store
// =============================================================================

/// One call received by the lineage store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineageCall {
    Delete(String),
    Create(usize),
    Read(String, LineageDirection),
}

/// Keeps edges grouped by source key, the way the store deletes them.
pub struct MockLineageStore {
    edges: Arc<Mutex<HashMap<String, Vec<LineageEdge>>>>,
    calls: Arc<Mutex<Vec<LineageCall>>>,
    failing_creates: AtomicUsize,
    failing_deletes: AtomicUsize,
}

impl MockLineageStore {
    pub fn new() -> Self {
        Self {
            edges: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_creates: AtomicUsize::new(0),
            failing_deletes: AtomicUsize::new(0),
        }
    }

    /// Fail the next `count` bulk creates
    pub fn failing_creates(self, count: usize) -> Self {
        self.failing_creates.store(count, Ordering::SeqCst);
        self
    }

    /// Fail the next `count` deletes
    pub fn failing_deletes(self, count: usize) -> Self {
        self.failing_deletes.store(count, Ordering::SeqCst);
        self
    }

    pub fn edges_for(&self, source_key: &str) -> Vec<LineageEdge> {
        self.edges
            .lock()
            .unwrap()
            .get(source_key)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<LineageCall> {
        self.calls.lock().unwrap().clone()
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl BaseLineageStore for MockLineageStore {
    async fn delete_lineage(&self, source_key: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(LineageCall::Delete(source_key.to_string()));
        if Self::take_failure(&self.failing_deletes) {
            return Err(api_error(500, "lineage delete failed"));
        }
        self.edges.lock().unwrap().remove(source_key);
        Ok(())
    }

    async fn create_lineage(&self, edges: &[LineageEdge]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(LineageCall::Create(edges.len()));
        if Self::take_failure(&self.failing_creates) {
            return Err(api_error(503, "lineage store unavailable"));
        }
        let mut stored = self.edges.lock().unwrap();
        for edge in edges {
            stored
                .entry(edge.source_key.clone())
                .or_default()
                .push(edge.clone());
        }
        Ok(())
    }

    async fn get_full_lineage(
        &self,
        source_key: &str,
        direction: LineageDirection,
    ) -> Result<FullLineage> {
        self.calls
            .lock()
            .unwrap()
            .push(LineageCall::Read(source_key.to_string(), direction));
        let lineages = match direction {
            LineageDirection::Downstream => self.edges_for(source_key),
            LineageDirection::Upstream => self
                .edges
                .lock()
                .unwrap()
                .values()
                .flatten()
                .filter(|e| e.target_key == source_key)
                .cloned()
                .collect(),
        };
        Ok(FullLineage { lineages })
    }
}

// =============================================================================
// Mock Prompt Service
// =============================================================================

pub struct MockPromptService {
    prompts: Arc<Mutex<HashMap<String, String>>>,
    failures: Arc<Mutex<HashMap<String, (u16, String)>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPromptService {
    pub fn new() -> Self {
        Self {
            prompts: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a prompt owned by `project_id`
    pub fn with_prompt(self, prompt_id: &str, project_id: &str) -> Self {
        self.prompts
            .lock()
            .unwrap()
            .insert(prompt_id.to_string(), project_id.to_string());
        self
    }

    pub fn with_failure(self, prompt_id: &str, status: u16, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(prompt_id.to_string(), (status, message.to_string()));
        self
    }

    /// Prompt ids looked up, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePromptService for MockPromptService {
    async fn get_inference_prompt(&self, prompt_id: &str) -> Result<InferencePrompt> {
        self.calls.lock().unwrap().push(prompt_id.to_string());
        if let Some((status, message)) = self.failures.lock().unwrap().get(prompt_id) {
            return Err(api_error(*status, message));
        }
        self.prompts
            .lock()
            .unwrap()
            .get(prompt_id)
            .map(|project_id| InferencePrompt {
                id: prompt_id.to_string(),
                name: Some(format!("prompt {}", prompt_id)),
                project_id: Some(project_id.clone()),
            })
            .ok_or_else(|| not_found("prompt", prompt_id))
    }
}

// =============================================================================
// Mock Policy Engine
// =============================================================================

/// Policy push received by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyCall {
    ByGroup {
        resource_url: String,
        user_token: String,
    },
    ByMember {
        resource_url: String,
        member_id: String,
        project_name: String,
    },
}

pub struct MockPolicyEngine {
    policies: Arc<Mutex<HashMap<String, Vec<Policy>>>>,
    set_failure: Arc<Mutex<Option<(u16, String)>>>,
    calls: Arc<Mutex<Vec<PolicyCall>>>,
}

impl MockPolicyEngine {
    pub fn new() -> Self {
        Self {
            policies: Arc::new(Mutex::new(HashMap::new())),
            set_failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Policies `get_policy` returns for a URL
    pub fn with_policies(self, resource_url: &str, policies: Vec<Policy>) -> Self {
        self.policies
            .lock()
            .unwrap()
            .insert(resource_url.to_string(), policies);
        self
    }

    /// Make every policy push fail
    pub fn failing_sets(self, status: u16, message: &str) -> Self {
        *self.set_failure.lock().unwrap() = Some((status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<PolicyCall> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: PolicyCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.set_failure.lock().unwrap().as_ref() {
            Some((status, message)) => Err(api_error(*status, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BasePolicyEngine for MockPolicyEngine {
    async fn set_policy_by_current_group(
        &self,
        resource_url: &str,
        user_token: &str,
    ) -> Result<()> {
        self.push(PolicyCall::ByGroup {
            resource_url: resource_url.to_string(),
            user_token: user_token.to_string(),
        })
    }

    async fn set_policy_by_member(
        &self,
        resource_url: &str,
        member_id: &str,
        project_name: &str,
    ) -> Result<()> {
        self.push(PolicyCall::ByMember {
            resource_url: resource_url.to_string(),
            member_id: member_id.to_string(),
            project_name: project_name.to_string(),
        })
    }

    async fn get_policy(&self, resource_url: &str) -> Result<Vec<Policy>> {
        Ok(self
            .policies
            .lock()
            .unwrap()
            .get(resource_url)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock MCP Catalog Service
// =============================================================================

pub struct MockMcpCatalogService {
    serving_failure: Arc<Mutex<Option<(u16, String)>>>,
    catalog_failure: Arc<Mutex<Option<(u16, String)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    next_id: AtomicU64,
}

impl MockMcpCatalogService {
    pub fn new() -> Self {
        Self {
            serving_failure: Arc::new(Mutex::new(None)),
            catalog_failure: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn failing_serving_delete(self, status: u16, message: &str) -> Self {
        *self.serving_failure.lock().unwrap() = Some((status, message.to_string()));
        self
    }

    pub fn failing_catalog_delete(self, status: u16, message: &str) -> Self {
        *self.catalog_failure.lock().unwrap() = Some((status, message.to_string()));
        self
    }

    /// Operations in call order, as "op:catalog_id"
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseMcpCatalogService for MockMcpCatalogService {
    async fn create_catalog(&self, req: &CreateMcpCatalogRequest) -> Result<McpCatalog> {
        let id = format!("mcp-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.calls.lock().unwrap().push(format!("create:{}", id));
        Ok(McpCatalog {
            id,
            name: req.name.clone(),
            description: req.description.clone(),
            extra: req.config.clone(),
        })
    }

    async fn delete_serving(&self, catalog_id: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("delete_serving:{}", catalog_id));
        match self.serving_failure.lock().unwrap().as_ref() {
            Some((status, message)) => Err(api_error(*status, message)),
            None => Ok(()),
        }
    }

    async fn delete_catalog(&self, catalog_id: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("delete_catalog:{}", catalog_id));
        match self.catalog_failure.lock().unwrap().as_ref() {
            Some((status, message)) => Err(api_error(*status, message)),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Mock Agent Runtime
// =============================================================================

/// One item the mock runtime yields on its body stream
#[derive(Debug, Clone)]
pub enum MockChunk {
    Data(&'static [u8]),
    /// Peer went away mid-body
    Interrupt,
    /// Any other body failure
    Fail(&'static str),
}

pub struct MockAgentRuntime {
    chunks: Arc<Mutex<Vec<MockChunk>>>,
    open_failure: Arc<Mutex<Option<(u16, String)>>>,
    requests: Arc<Mutex<Vec<StreamGraphRequest>>>,
}

impl MockAgentRuntime {
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(Mutex::new(Vec::new())),
            open_failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_chunks(self, chunks: Vec<MockChunk>) -> Self {
        *self.chunks.lock().unwrap() = chunks;
        self
    }

    /// Answer the stream request itself with an error status
    pub fn failing_open(self, status: u16, message: &str) -> Self {
        *self.open_failure.lock().unwrap() = Some((status, message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<StreamGraphRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseAgentRuntime for MockAgentRuntime {
    async fn stream_graph(&self, req: &StreamGraphRequest) -> Result<ByteStream> {
        self.requests.lock().unwrap().push(req.clone());
        if let Some((status, message)) = self.open_failure.lock().unwrap().as_ref() {
            return Err(api_error(*status, message));
        }
        let items: Vec<Result<Bytes>> = self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .map(|chunk| match chunk {
                MockChunk::Data(bytes) => Ok(Bytes::from_static(*bytes)),
                MockChunk::Interrupt => Err(SktaiError::StreamInterrupted(
                    "connection reset by peer".to_string(),
                )),
                MockChunk::Fail(reason) => Err(SktaiError::Network(reason.to_string())),
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

// =============================================================================
// Failing Project Asset Store
// =============================================================================

/// Scope table whose every call fails, for the read-path default.
pub struct FailingProjectAssetStore;

#[async_trait]
impl ProjectAssetStore for FailingProjectAssetStore {
    async fn find_by_url(&self, _asset_url: &str) -> anyhow::Result<Option<ProjectAsset>> {
        Err(anyhow::anyhow!("scope table unavailable"))
    }

    async fn upsert(
        &self,
        _asset_url: &str,
        _owning_project_seq: i64,
        _sharing_project_seq: i64,
    ) -> anyhow::Result<ProjectAsset> {
        Err(anyhow::anyhow!("scope table unavailable"))
    }

    async fn delete_by_url(&self, _asset_url: &str) -> anyhow::Result<bool> {
        Err(anyhow::anyhow!("scope table unavailable"))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub graphs: Arc<MockGraphStore>,
    pub lineage: Arc<MockLineageStore>,
    pub prompts: Arc<MockPromptService>,
    pub policy: Arc<MockPolicyEngine>,
    pub mcp: Arc<MockMcpCatalogService>,
    pub runtime: Arc<MockAgentRuntime>,
    pub assets: Arc<dyn ProjectAssetStore>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            graphs: Arc::new(MockGraphStore::new()),
            lineage: Arc::new(MockLineageStore::new()),
            prompts: Arc::new(MockPromptService::new()),
            policy: Arc::new(MockPolicyEngine::new()),
            mcp: Arc::new(MockMcpCatalogService::new()),
            runtime: Arc::new(MockAgentRuntime::new()),
            assets: Arc::new(MemoryProjectAssetStore::new()),
        }
    }

    pub fn mock_graphs(mut self, graphs: MockGraphStore) -> Self {
        self.graphs = Arc::new(graphs);
        self
    }

    pub fn mock_lineage(mut self, lineage: MockLineageStore) -> Self {
        self.lineage = Arc::new(lineage);
        self
    }

    pub fn mock_prompts(mut self, prompts: MockPromptService) -> Self {
        self.prompts = Arc::new(prompts);
        self
    }

    pub fn mock_policy(mut self, policy: MockPolicyEngine) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn mock_mcp(mut self, mcp: MockMcpCatalogService) -> Self {
        self.mcp = Arc::new(mcp);
        self
    }

    pub fn mock_runtime(mut self, runtime: MockAgentRuntime) -> Self {
        self.runtime = Arc::new(runtime);
        self
    }

    pub fn asset_store(mut self, assets: Arc<dyn ProjectAssetStore>) -> Self {
        self.assets = assets;
        self
    }

    /// Build ServerDeps over these mocks. Build it once per test: the
    /// reconciler's checkpoints live in the returned value.
    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.graphs.clone(),
            self.lineage.clone(),
            self.prompts.clone(),
            self.policy.clone(),
            self.mcp.clone(),
            self.runtime.clone(),
            self.assets.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

/// Empty payload helper for seeding graphs
pub fn graph(id: &str, name: &str) -> Graph {
    Graph {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        graph: GraphPayload::default(),
        created_by: Some("member-1".to_string()),
        created_at: None,
        updated_at: None,
    }
}
