//! Saving agent graphs and the lineage each save leaves in the Lineage Store.

mod common;

use std::sync::Arc;

use admin_core::common::DomainError;
use admin_core::domains::agent_builder::actions::{
    delete_agent_builder, get_agent_lineages, save_agent_graph,
};
use admin_core::domains::agent_builder::SaveAgentGraph;
use admin_core::kernel::test_dependencies::{
    graph, LineageCall, MockGraphStore, MockLineageStore, MockPromptService,
};
use admin_core::domains::scope::ProjectAssetStore;
use admin_core::kernel::TestDependencies;
use common::*;
use serde_json::{json, Value};
use sktai_client::{LineageDirection, LineageObjectType};

fn save_request(graph: Value) -> SaveAgentGraph {
    SaveAgentGraph {
        name: "support bot".to_string(),
        description: Some("answers tickets".to_string()),
        graph: Some(graph),
    }
}

fn deps_with_graph() -> TestDependencies {
    TestDependencies::new()
        .mock_graphs(MockGraphStore::new().with_graph(graph("g-1", "support bot")))
        .mock_prompts(
            MockPromptService::new()
                .with_prompt("pr-home", HOME_PROJECT)
                .with_prompt("pr-foreign", "p-2"),
        )
}

fn target_keys(edges: &[sktai_client::LineageEdge], kind: LineageObjectType) -> Vec<String> {
    edges
        .iter()
        .filter(|e| e.target_type == kind)
        .map(|e| e.target_key.clone())
        .collect()
}

#[tokio::test]
async fn save_records_every_reference_kind() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();

    let saved = save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();

    let edges = test_deps.lineage.edges_for("g-1");
    assert_eq!(saved.lineage_edges, 7);
    assert_eq!(target_keys(&edges, LineageObjectType::ServingModel), vec![MODEL_ID]);
    assert_eq!(target_keys(&edges, LineageObjectType::Prompt), vec!["pr-home"]);
    assert_eq!(target_keys(&edges, LineageObjectType::FewShot), vec!["fs-1"]);
    assert_eq!(target_keys(&edges, LineageObjectType::Tool), vec!["t-1", "t-2"]);
    assert_eq!(target_keys(&edges, LineageObjectType::Mcp), vec!["mcp-1"]);
    assert_eq!(target_keys(&edges, LineageObjectType::Knowledge), vec!["kb-1"]);
    assert!(edges.iter().all(|e| e.source_key == "g-1"));
}

#[tokio::test]
async fn repeated_saves_leave_the_same_edge_set() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();

    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();
    let first = test_deps.lineage.edges_for("g-1");
    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();
    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();

    assert_eq!(test_deps.lineage.edges_for("g-1"), first);
}

#[tokio::test]
async fn removed_reference_disappears_on_next_save() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();

    let trimmed = json!({
        "nodes": [{"id": "tools", "type": "agent__tool", "data": {"tool_ids": ["t-2"]}}],
        "edges": []
    });
    save_agent_graph("g-1", save_request(trimmed), &actor(), &deps)
        .await
        .unwrap();

    let edges = test_deps.lineage.edges_for("g-1");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].target_key, "t-2");
}

#[tokio::test]
async fn placeholder_models_are_not_lineage() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    let graph = json!({
        "nodes": [
            {"id": "a", "type": "agent__generator", "data": {"serving_model": "D"}},
            {"id": "b", "type": "agent__generator", "data": {"serving_model": "not-a-uuid"}},
            {"id": "c", "type": "agent__generator", "data": {"serving_model": MODEL_ID}}
        ]
    });

    save_agent_graph("g-1", save_request(graph), &actor(), &deps)
        .await
        .unwrap();

    let edges = test_deps.lineage.edges_for("g-1");
    assert_eq!(target_keys(&edges, LineageObjectType::ServingModel), vec![MODEL_ID]);
}

#[tokio::test]
async fn prompts_from_other_projects_are_excluded() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();

    save_agent_graph("g-1", save_request(editor_graph("pr-foreign")), &actor(), &deps)
        .await
        .unwrap();

    let edges = test_deps.lineage.edges_for("g-1");
    assert!(target_keys(&edges, LineageObjectType::Prompt).is_empty());
    // The rest of the node still counts
    assert_eq!(target_keys(&edges, LineageObjectType::FewShot), vec!["fs-1"]);
}

#[tokio::test]
async fn null_edges_save_with_empty_edge_list() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    let graph = json!({
        "nodes": [{"id": "solo", "type": "agent__generator", "data": {}}],
        "edges": null
    });

    let saved = save_agent_graph("g-1", save_request(graph), &actor(), &deps)
        .await
        .unwrap();

    assert_eq!(saved.graph.graph.nodes.len(), 1);
    assert!(saved.graph.graph.edges.is_empty());
}

#[tokio::test]
async fn unparsable_edges_keep_the_nodes() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    let graph = json!({
        "nodes": [{"id": "tools", "type": "agent__tool", "data": {"tool_ids": ["t-1"]}}],
        "edges": "not-a-list"
    });

    let saved = save_agent_graph("g-1", save_request(graph), &actor(), &deps)
        .await
        .unwrap();

    assert!(saved.graph.graph.edges.is_empty());
    let stored = test_deps.graphs.stored("g-1").unwrap();
    assert_eq!(stored.graph.nodes[0].id, "tools");
    assert_eq!(test_deps.lineage.edges_for("g-1").len(), 1);
}

#[tokio::test]
async fn editor_fields_survive_the_save() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();

    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();

    let stored = test_deps.graphs.stored("g-1").unwrap();
    assert_eq!(stored.graph.nodes[0].extra["position"], json!({"x": 10, "y": 20}));
}

#[tokio::test]
async fn missing_payload_and_blank_id_are_client_errors() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    let no_graph = SaveAgentGraph {
        name: "support bot".to_string(),
        description: None,
        graph: None,
    };

    let err = save_agent_graph("g-1", no_graph, &actor(), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));

    let err = save_agent_graph("  ", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert!(test_deps.graphs.calls().is_empty());
}

#[tokio::test]
async fn failed_graph_save_leaves_lineage_untouched() {
    let test_deps = TestDependencies::new().mock_graphs(
        MockGraphStore::new()
            .with_graph(graph("g-1", "support bot"))
            .failing("save", 409, "graph is locked by another editor"),
    );
    let deps = test_deps.into_server_deps();

    let err = save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("graph is locked by another editor"));
    assert!(test_deps.lineage.calls().is_empty());
}

#[tokio::test]
async fn retry_after_failed_create_finishes_the_replace() {
    let test_deps = deps_with_graph().mock_lineage(MockLineageStore::new().failing_creates(1));
    let deps = test_deps.into_server_deps();

    let err = save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Upstream { operation: "lineage create", .. }));
    assert!(test_deps.lineage.edges_for("g-1").is_empty());

    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();

    assert_eq!(test_deps.lineage.edges_for("g-1").len(), 7);
    assert_eq!(test_deps.prompts.calls(), vec!["pr-home".to_string()]);
}

#[tokio::test]
async fn failed_prompt_lookup_leaves_no_stale_edges() {
    let test_deps = TestDependencies::new()
        .mock_graphs(MockGraphStore::new().with_graph(graph("g-1", "support bot")))
        .mock_prompts(
            MockPromptService::new().with_failure("pr-down", 503, "prompt service down"),
        );
    let deps = test_deps.into_server_deps();
    let first = json!({
        "nodes": [{"id": "tools", "type": "agent__tool", "data": {"tool_ids": ["t-old"]}}]
    });
    save_agent_graph("g-1", save_request(first), &actor(), &deps)
        .await
        .unwrap();

    let second = json!({
        "nodes": [{"id": "gen", "type": "agent__generator", "data": {
            "prompt_id": "pr-down",
            "tool_ids": ["t-new"]
        }}]
    });
    let err = save_agent_graph("g-1", save_request(second), &actor(), &deps)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Upstream { operation: "prompt lookup", .. }));
    let stored = test_deps.graphs.stored("g-1").unwrap();
    assert_eq!(stored.graph.nodes[0].id, "gen");
    assert!(test_deps.lineage.edges_for("g-1").is_empty());
    assert_eq!(
        test_deps.lineage.calls(),
        vec![
            LineageCall::Delete("g-1".to_string()),
            LineageCall::Create(1),
            LineageCall::Delete("g-1".to_string()),
        ]
    );
}

#[tokio::test]
async fn lineage_read_passes_direction() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();

    let downstream = get_agent_lineages("g-1", LineageDirection::Downstream, &deps)
        .await
        .unwrap();
    let upstream = get_agent_lineages("t-1", LineageDirection::Upstream, &deps)
        .await
        .unwrap();

    assert_eq!(downstream.lineages.len(), 7);
    assert_eq!(upstream.lineages.len(), 1);
    assert_eq!(upstream.lineages[0].source_key, "g-1");
    assert!(test_deps
        .lineage
        .calls()
        .contains(&LineageCall::Read("t-1".to_string(), LineageDirection::Upstream)));
}

#[tokio::test]
async fn delete_removes_graph_then_lineage() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();

    delete_agent_builder("g-1", &deps).await.unwrap();

    assert!(test_deps.graphs.stored("g-1").is_none());
    assert!(test_deps.lineage.edges_for("g-1").is_empty());
    assert_eq!(
        test_deps.lineage.calls().last(),
        Some(&LineageCall::Delete("g-1".to_string()))
    );
}

#[tokio::test]
async fn deleting_already_removed_graph_still_clears_lineage() {
    let test_deps = TestDependencies::new();
    let url = "/api/v1/agent/agents/graphs/gone";
    test_deps.assets.upsert(url, 1, 3).await.unwrap();
    let deps = test_deps.into_server_deps();

    delete_agent_builder("gone", &deps).await.unwrap();

    assert_eq!(test_deps.graphs.calls(), vec!["delete:gone"]);
    assert_eq!(
        test_deps.lineage.calls(),
        vec![LineageCall::Delete("gone".to_string())]
    );
    assert!(test_deps.assets.find_by_url(url).await.unwrap().is_none());
}

#[tokio::test]
async fn graph_store_failure_on_delete_keeps_lineage() {
    let test_deps = deps_with_graph();
    let deps = test_deps.into_server_deps();
    save_agent_graph("g-1", save_request(editor_graph("pr-home")), &actor(), &deps)
        .await
        .unwrap();
    let failing = TestDependencies {
        graphs: Arc::new(MockGraphStore::new().failing("delete", 500, "graph store down")),
        ..test_deps.clone()
    };
    let failing_deps = failing.into_server_deps();

    let err = delete_agent_builder("g-1", &failing_deps).await.unwrap_err();

    assert!(matches!(err, DomainError::Upstream { operation: "graph delete", .. }));
    assert_eq!(test_deps.lineage.edges_for("g-1").len(), 7);
}
