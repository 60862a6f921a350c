//! Agent Graph Store endpoints.

use reqwest::Method;
use serde_json::Value;

use crate::error::Result;
use crate::types::{
    CreateGraphRequest, Graph, GraphInfoUpdate, GraphPage, GraphTemplate, ListGraphsQuery,
    SaveGraphRequest,
};
use crate::SktaiClient;

const GRAPHS_PATH: &str = "/api/v1/agent/agents/graphs";

impl SktaiClient {
    pub async fn list_graphs(&self, query: &ListGraphsQuery) -> Result<GraphPage> {
        let builder = self.request(Method::GET, GRAPHS_PATH).query(query);
        Self::send_json(builder).await
    }

    pub async fn create_graph(&self, req: &CreateGraphRequest) -> Result<Graph> {
        let builder = self.request(Method::POST, GRAPHS_PATH).json(req);
        Self::send_json(builder).await
    }

    pub async fn get_graph(&self, graph_id: &str) -> Result<Graph> {
        let path = format!("{}/{}", GRAPHS_PATH, graph_id);
        Self::send_json(self.request(Method::GET, &path)).await
    }

    /// Replace the graph's name, description and full node/edge payload.
    pub async fn save_graph(&self, graph_id: &str, req: &SaveGraphRequest) -> Result<Graph> {
        let path = format!("{}/{}", GRAPHS_PATH, graph_id);
        let builder = self.request(Method::PUT, &path).json(req);
        Self::send_json(builder).await
    }

    pub async fn update_graph_info(&self, graph_id: &str, req: &GraphInfoUpdate) -> Result<()> {
        let path = format!("{}/{}/info", GRAPHS_PATH, graph_id);
        Self::send_empty(self.request(Method::PUT, &path).json(req)).await
    }

    pub async fn delete_graph(&self, graph_id: &str) -> Result<()> {
        let path = format!("{}/{}", GRAPHS_PATH, graph_id);
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }

    pub async fn get_graph_app_info(&self, graph_id: &str) -> Result<Value> {
        let path = format!("{}/{}/app", GRAPHS_PATH, graph_id);
        Self::send_json(self.request(Method::GET, &path)).await
    }

    pub async fn export_graph_code(&self, graph_id: &str, credential_type: &str) -> Result<Value> {
        let path = format!("{}/{}/export", GRAPHS_PATH, graph_id);
        let builder = self
            .request(Method::GET, &path)
            .query(&[("credential_type", credential_type)]);
        Self::send_json(builder).await
    }

    pub async fn get_graph_templates(&self) -> Result<Vec<GraphTemplate>> {
        let path = format!("{}/templates", GRAPHS_PATH);
        Self::send_json(self.request(Method::GET, &path)).await
    }

    pub async fn get_graph_template(&self, template_id: &str) -> Result<GraphTemplate> {
        let path = format!("{}/templates/{}", GRAPHS_PATH, template_id);
        Self::send_json(self.request(Method::GET, &path)).await
    }
}
