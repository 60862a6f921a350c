//! PostgreSQL-backed scope table.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::ProjectAssetStore;
use crate::domains::scope::models::ProjectAsset;

pub struct PostgresProjectAssetStore {
    pool: PgPool,
}

impl PostgresProjectAssetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectAssetStore for PostgresProjectAssetStore {
    async fn find_by_url(&self, asset_url: &str) -> Result<Option<ProjectAsset>> {
        sqlx::query_as::<_, ProjectAsset>("SELECT * FROM project_assets WHERE asset_url = $1")
            .bind(asset_url)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn upsert(
        &self,
        asset_url: &str,
        owning_project_seq: i64,
        sharing_project_seq: i64,
    ) -> Result<ProjectAsset> {
        sqlx::query_as::<_, ProjectAsset>(
            r#"
            INSERT INTO project_assets (asset_url, owning_project_seq, sharing_project_seq)
            VALUES ($1, $2, $3)
            ON CONFLICT (asset_url) DO UPDATE
            SET owning_project_seq = EXCLUDED.owning_project_seq,
                sharing_project_seq = EXCLUDED.sharing_project_seq,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(asset_url)
        .bind(owning_project_seq)
        .bind(sharing_project_seq)
        .fetch_one(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn delete_by_url(&self, asset_url: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM project_assets WHERE asset_url = $1")
            .bind(asset_url)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
