//! In-memory scope table for testing and development.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ProjectAssetStore;
use crate::domains::scope::models::ProjectAsset;

/// Not suitable for production as data is lost on restart.
#[derive(Default)]
pub struct MemoryProjectAssetStore {
    rows: RwLock<HashMap<String, ProjectAsset>>,
}

impl MemoryProjectAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectAssetStore for MemoryProjectAssetStore {
    async fn find_by_url(&self, asset_url: &str) -> Result<Option<ProjectAsset>> {
        Ok(self.rows.read().await.get(asset_url).cloned())
    }

    async fn upsert(
        &self,
        asset_url: &str,
        owning_project_seq: i64,
        sharing_project_seq: i64,
    ) -> Result<ProjectAsset> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let row = rows
            .entry(asset_url.to_string())
            .and_modify(|row| {
                row.owning_project_seq = owning_project_seq;
                row.sharing_project_seq = sharing_project_seq;
                row.updated_at = now;
            })
            .or_insert_with(|| ProjectAsset {
                asset_url: asset_url.to_string(),
                owning_project_seq,
                sharing_project_seq,
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn delete_by_url(&self, asset_url: &str) -> Result<bool> {
        Ok(self.rows.write().await.remove(asset_url).is_some())
    }
}
