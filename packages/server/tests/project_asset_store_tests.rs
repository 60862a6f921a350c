//! PostgresProjectAssetStore against a real database.
//!
//! Needs Docker: cargo test --test project_asset_store_tests -- --ignored

mod common;

use admin_core::domains::scope::{
    resolve_scope, PostgresProjectAssetStore, ProjectAssetStore, Scope, PUBLIC_SHARING_SEQ,
};
use common::harness::test_pool;
use uuid::Uuid;

fn unique_url() -> String {
    format!("/api/v1/agent/agents/graphs/{}", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn missing_row_reads_as_public() {
    let store = PostgresProjectAssetStore::new(test_pool().await);

    let row = store.find_by_url(&unique_url()).await.unwrap();

    assert!(row.is_none());
    assert_eq!(resolve_scope(row.as_ref()), Scope::Public);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn upsert_replaces_sharing_in_place() {
    let store = PostgresProjectAssetStore::new(test_pool().await);
    let url = unique_url();

    let first = store.upsert(&url, 3, PUBLIC_SHARING_SEQ).await.unwrap();
    let second = store.upsert(&url, 3, 9).await.unwrap();

    assert_eq!(second.sharing_project_seq, 9);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
    let row = store.find_by_url(&url).await.unwrap();
    assert_eq!(resolve_scope(row.as_ref()), Scope::Shared);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn delete_reports_whether_a_row_went_away() {
    let store = PostgresProjectAssetStore::new(test_pool().await);
    let url = unique_url();
    store.upsert(&url, 1, 2).await.unwrap();

    assert!(store.delete_by_url(&url).await.unwrap());
    assert!(!store.delete_by_url(&url).await.unwrap());
    assert!(store.find_by_url(&url).await.unwrap().is_none());
}
