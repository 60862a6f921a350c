//! MCP catalog create/delete: scope push, serving cascade and scope row cleanup.

mod common;

use std::sync::Arc;

use admin_core::common::DomainError;
use admin_core::domains::mcp_catalog::{create_mcp_catalog, delete_mcp_catalog};
use admin_core::domains::scope::{asset_url, AssetKind, MemoryProjectAssetStore, ProjectAssetStore, Scope};
use admin_core::kernel::test_dependencies::{MockMcpCatalogService, MockPolicyEngine, PolicyCall};
use admin_core::kernel::TestDependencies;
use common::*;
use serde_json::{json, Map};
use sktai_client::CreateMcpCatalogRequest;

fn catalog_request(name: &str) -> CreateMcpCatalogRequest {
    let config: Map<String, serde_json::Value> = serde_json::from_value(json!({
        "server_type": "sse",
        "url": "https://tools.example.com/sse"
    }))
    .unwrap();
    CreateMcpCatalogRequest {
        name: name.to_string(),
        description: None,
        config,
    }
}

#[tokio::test]
async fn create_pushes_scope_for_catalog_url() {
    let test_deps = TestDependencies::new();
    let deps = test_deps.into_server_deps();

    let created = create_mcp_catalog(catalog_request("search tools"), &actor(), &deps)
        .await
        .unwrap();

    assert_eq!(created.catalog.id, "mcp-1");
    assert_eq!(created.applied_scope, Some(Scope::Private));
    assert_eq!(
        test_deps.policy.calls(),
        vec![PolicyCall::ByMember {
            resource_url: asset_url(AssetKind::McpCatalog, "mcp-1"),
            member_id: "member-1".to_string(),
            project_name: "project-one".to_string(),
        }]
    );
}

#[tokio::test]
async fn create_keeps_catalog_when_scope_push_fails() {
    let test_deps = TestDependencies::new()
        .mock_policy(MockPolicyEngine::new().failing_sets(500, "policy engine down"));
    let deps = test_deps.into_server_deps();

    let created = create_mcp_catalog(catalog_request("search tools"), &actor(), &deps)
        .await
        .unwrap();

    assert!(created.applied_scope.is_none());
    assert_eq!(test_deps.mcp.calls(), vec!["create:mcp-1"]);
}

#[tokio::test]
async fn delete_removes_serving_before_catalog() {
    let test_deps = TestDependencies::new();
    let deps = test_deps.into_server_deps();

    let deleted = delete_mcp_catalog("mcp-7", &deps).await.unwrap();

    assert!(!deleted.cascade_error_suppressed);
    assert_eq!(
        test_deps.mcp.calls(),
        vec!["delete_serving:mcp-7", "delete_catalog:mcp-7"]
    );
}

#[tokio::test]
async fn delete_suppresses_cascade_report() {
    let test_deps = TestDependencies::new().mock_mcp(
        MockMcpCatalogService::new()
            .failing_catalog_delete(500, "MCP Serving 삭제 중 오류가 발생했습니다"),
    );
    let deps = test_deps.into_server_deps();

    let deleted = delete_mcp_catalog("mcp-7", &deps).await.unwrap();

    assert!(deleted.cascade_error_suppressed);
    assert_eq!(deleted.id, "mcp-7");
}

#[tokio::test]
async fn delete_propagates_other_catalog_errors() {
    let test_deps = TestDependencies::new().mock_mcp(
        MockMcpCatalogService::new().failing_catalog_delete(500, "database unavailable"),
    );
    let deps = test_deps.into_server_deps();

    let err = delete_mcp_catalog("mcp-7", &deps).await.unwrap_err();

    assert!(matches!(err, DomainError::Upstream { operation: "mcp catalog delete", .. }));
    assert!(err.to_string().contains("database unavailable"));
}

#[tokio::test]
async fn delete_of_unknown_catalog_is_not_found() {
    let test_deps = TestDependencies::new()
        .mock_mcp(MockMcpCatalogService::new().failing_catalog_delete(404, "no such catalog"));
    let deps = test_deps.into_server_deps();

    let err = delete_mcp_catalog("mcp-404", &deps).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn delete_tolerates_missing_serving() {
    let test_deps = TestDependencies::new()
        .mock_mcp(MockMcpCatalogService::new().failing_serving_delete(404, "not serving"));
    let deps = test_deps.into_server_deps();

    delete_mcp_catalog("mcp-7", &deps).await.unwrap();

    assert_eq!(
        test_deps.mcp.calls(),
        vec!["delete_serving:mcp-7", "delete_catalog:mcp-7"]
    );
}

#[tokio::test]
async fn delete_stops_when_serving_delete_fails() {
    let test_deps = TestDependencies::new()
        .mock_mcp(MockMcpCatalogService::new().failing_serving_delete(502, "serving gateway"));
    let deps = test_deps.into_server_deps();

    let err = delete_mcp_catalog("mcp-7", &deps).await.unwrap_err();

    assert!(matches!(err, DomainError::Upstream { operation: "mcp serving delete", .. }));
    assert_eq!(test_deps.mcp.calls(), vec!["delete_serving:mcp-7"]);
}

#[tokio::test]
async fn delete_forgets_scope_row() {
    let assets = Arc::new(MemoryProjectAssetStore::new());
    let url = asset_url(AssetKind::McpCatalog, "mcp-7");
    assets.upsert(&url, 1, 4).await.unwrap();
    let test_deps = TestDependencies::new().asset_store(assets.clone());
    let deps = test_deps.into_server_deps();

    delete_mcp_catalog("mcp-7", &deps).await.unwrap();

    assert!(assets.find_by_url(&url).await.unwrap().is_none());
}
