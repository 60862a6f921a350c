//! Payloads and actors shared by the integration tests.

use admin_core::common::Actor;
use admin_core::kernel::test_dependencies::test_actor;
use serde_json::{json, Value};
use sktai_client::{GraphNode, GraphPayload};

pub const MODEL_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const HOME_PROJECT: &str = "p-1";

/// Actor working in the home project
pub fn actor() -> Actor {
    test_actor()
}

/// Actor whose token carries no member/project details
pub fn actor_without_assignment() -> Actor {
    Actor {
        member_id: String::new(),
        project_name: String::new(),
        ..test_actor()
    }
}

/// Editor payload: generator node with model + prompt, tool node, retriever node
pub fn editor_graph(prompt_id: &str) -> Value {
    json!({
        "nodes": [
            {
                "id": "generator",
                "type": "agent__generator",
                "position": {"x": 10, "y": 20},
                "data": {
                    "serving_model": MODEL_ID,
                    "prompt_id": prompt_id,
                    "fewshot_id": "fs-1"
                }
            },
            {
                "id": "tools",
                "type": "agent__tool",
                "data": {"tool_ids": ["t-1", "t-2"], "mcp_catalogs": [{"id": "mcp-1"}]}
            },
            {
                "id": "retriever",
                "type": "retriever__knowledge",
                "data": {"knowledge_retriever": {"repo_id": "kb-1", "top_k": 3}}
            }
        ],
        "edges": [
            {"id": "e1", "source": "retriever", "target": "generator"},
            {"id": "e2", "source": "generator", "target": "tools"}
        ]
    })
}

pub fn nodes(value: Value) -> Vec<GraphNode> {
    serde_json::from_value(value).unwrap()
}

pub fn payload(value: Value) -> GraphPayload {
    serde_json::from_value(value).unwrap()
}
