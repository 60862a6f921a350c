//! MCP Catalog endpoints.

use reqwest::Method;

use crate::error::Result;
use crate::types::{CreateMcpCatalogRequest, McpCatalog};
use crate::SktaiClient;

const CATALOGS_PATH: &str = "/api/v1/mcp/catalogs";

impl SktaiClient {
    pub async fn create_mcp_catalog(&self, req: &CreateMcpCatalogRequest) -> Result<McpCatalog> {
        Self::send_json(self.request(Method::POST, CATALOGS_PATH).json(req)).await
    }

    pub async fn get_mcp_catalog(&self, catalog_id: &str) -> Result<McpCatalog> {
        let path = format!("{}/{}", CATALOGS_PATH, catalog_id);
        Self::send_json(self.request(Method::GET, &path)).await
    }

    /// Tear down the serving instance backing a catalog entry.
    pub async fn delete_mcp_serving(&self, catalog_id: &str) -> Result<()> {
        let path = format!("{}/{}/serving", CATALOGS_PATH, catalog_id);
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }

    pub async fn delete_mcp_catalog(&self, catalog_id: &str) -> Result<()> {
        let path = format!("{}/{}", CATALOGS_PATH, catalog_id);
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }
}
