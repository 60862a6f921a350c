//! Storage for the project-asset scope table.

mod memory;
mod postgres;

pub use memory::MemoryProjectAssetStore;
pub use postgres::PostgresProjectAssetStore;

use anyhow::Result;
use async_trait::async_trait;

use super::models::ProjectAsset;

#[async_trait]
pub trait ProjectAssetStore: Send + Sync {
    async fn find_by_url(&self, asset_url: &str) -> Result<Option<ProjectAsset>>;

    /// Insert or replace the owning/sharing pair for `asset_url`.
    async fn upsert(
        &self,
        asset_url: &str,
        owning_project_seq: i64,
        sharing_project_seq: i64,
    ) -> Result<ProjectAsset>;

    /// Returns whether a row was removed.
    async fn delete_by_url(&self, asset_url: &str) -> Result<bool>;
}
