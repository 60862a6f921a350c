//! Normalizing editor-produced graph payloads before they reach the Graph Store.
//!
//! Node `data` stays an opaque map. Only the node list must be well formed;
//! an unreadable edge list degrades to no edges so node data is never lost.

use serde_json::Value;
use sktai_client::{GraphEdge, GraphNode, GraphPayload};
use tracing::warn;

use crate::common::{DomainError, RecoverableError};

/// Turn a raw `{ nodes, edges }` payload into the strict Graph Store shape.
pub fn normalize_graph(payload: &Value) -> Result<GraphPayload, DomainError> {
    if !payload.is_object() {
        return Err(DomainError::invalid("graph payload must be an object"));
    }

    let nodes = parse_nodes(payload.get("nodes"))?;
    let edges = parse_edges(payload.get("edges")).unwrap_or_else(|e| {
        warn!(error = %e, nodes = nodes.len(), "Saving graph without edges");
        Vec::new()
    });

    Ok(GraphPayload { nodes, edges })
}

/// Missing or null means an empty graph; anything else must parse.
pub fn parse_nodes(value: Option<&Value>) -> Result<Vec<GraphNode>, DomainError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| DomainError::invalid(format!("graph nodes are malformed: {}", e))),
    }
}

/// Missing or null is a legitimate empty edge list (single-node graphs).
pub fn parse_edges(value: Option<&Value>) -> Result<Vec<GraphEdge>, RecoverableError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            RecoverableError::EdgesUnparsed {
                reason: e.to_string(),
            }
        }),
    }
}
