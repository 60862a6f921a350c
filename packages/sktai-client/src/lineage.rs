//! Lineage Store endpoints.

use reqwest::Method;

use crate::error::Result;
use crate::types::{FullLineage, LineageBatch, LineageDirection};
use crate::SktaiClient;

const LINEAGES_PATH: &str = "/api/v1/lineages";

impl SktaiClient {
    /// Remove every edge whose source is `source_key`.
    pub async fn delete_lineage(&self, source_key: &str) -> Result<()> {
        let path = format!("{}/{}", LINEAGES_PATH, source_key);
        Self::send_empty(self.request(Method::DELETE, &path)).await
    }

    pub async fn create_lineage(&self, batch: &LineageBatch) -> Result<()> {
        Self::send_empty(self.request(Method::POST, LINEAGES_PATH).json(batch)).await
    }

    pub async fn get_full_lineage(
        &self,
        source_key: &str,
        direction: LineageDirection,
    ) -> Result<FullLineage> {
        let path = format!("{}/{}/full", LINEAGES_PATH, source_key);
        let builder = self
            .request(Method::GET, &path)
            .query(&[("direction", direction.as_str())]);
        Self::send_json(builder).await
    }
}
