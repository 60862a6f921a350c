//! Graph content: save with lineage, execution, lineage reads and
//! Graph Store pass-throughs.

use serde_json::Value;
use sktai_client::{FullLineage, GraphTemplate, LineageDirection, SaveGraphRequest, StreamGraphRequest};
use tracing::info;

use super::builders::require_graph_id;
use crate::common::{Actor, DomainError};
use crate::domains::agent_builder::activities::RelayStream;
use crate::domains::agent_builder::models::{normalize_graph, SaveAgentGraph, SavedAgentGraph};
use crate::kernel::ServerDeps;

/// Save the full graph and replace its lineage with what the saved nodes reference.
pub async fn save_agent_graph(
    graph_id: &str,
    input: SaveAgentGraph,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<SavedAgentGraph, DomainError> {
    require_graph_id(graph_id)?;
    let raw = input
        .graph
        .as_ref()
        .filter(|raw| !raw.is_null())
        .ok_or_else(|| DomainError::invalid("graph payload is required"))?;
    let payload = normalize_graph(raw)?;

    let saved = deps
        .graphs
        .save_graph(
            graph_id,
            &SaveGraphRequest {
                name: input.name,
                description: input.description,
                graph: payload,
            },
        )
        .await
        .map_err(|e| DomainError::platform("graph save", &format!("agent builder {}", graph_id), e))?;
    info!(
        graph_id,
        nodes = saved.graph.nodes.len(),
        edges = saved.graph.edges.len(),
        "Agent graph saved"
    );

    let report = deps
        .reconciler
        .reconcile(graph_id, &actor.project_id, &saved.graph.nodes)
        .await?;

    Ok(SavedAgentGraph {
        graph: saved,
        lineage_edges: report.edges.len(),
    })
}

/// Open an execution on the Agent Runtime and hand back its chunk relay.
pub async fn stream_agent_graph(
    request: StreamGraphRequest,
    deps: &ServerDeps,
) -> Result<RelayStream, DomainError> {
    if request.graph_id.trim().is_empty() {
        return Err(DomainError::invalid("graph_id is required"));
    }
    let stream = deps
        .runtime
        .stream_graph(&request)
        .await
        .map_err(|e| DomainError::platform("graph stream", &format!("agent builder {}", request.graph_id), e))?;
    info!(graph_id = %request.graph_id, "Execution stream opened");
    Ok(RelayStream::new(request.graph_id, stream))
}

pub async fn get_agent_lineages(
    graph_id: &str,
    direction: LineageDirection,
    deps: &ServerDeps,
) -> Result<FullLineage, DomainError> {
    require_graph_id(graph_id)?;
    deps.lineage
        .get_full_lineage(graph_id, direction)
        .await
        .map_err(|e| DomainError::upstream("lineage read", e))
}

pub async fn get_agent_app_info(graph_id: &str, deps: &ServerDeps) -> Result<Value, DomainError> {
    require_graph_id(graph_id)?;
    deps.graphs
        .get_graph_app_info(graph_id)
        .await
        .map_err(|e| DomainError::platform("graph app info", &format!("agent builder {}", graph_id), e))
}

pub async fn export_agent_graph_code(
    graph_id: &str,
    credential_type: &str,
    deps: &ServerDeps,
) -> Result<Value, DomainError> {
    require_graph_id(graph_id)?;
    if credential_type.trim().is_empty() {
        return Err(DomainError::invalid("credential_type is required"));
    }
    deps.graphs
        .export_graph_code(graph_id, credential_type)
        .await
        .map_err(|e| DomainError::platform("graph export", &format!("agent builder {}", graph_id), e))
}

pub async fn get_graph_templates(deps: &ServerDeps) -> Result<Vec<GraphTemplate>, DomainError> {
    deps.graphs
        .get_graph_templates()
        .await
        .map_err(|e| DomainError::upstream("template list", e))
}

pub async fn get_graph_template(
    template_id: &str,
    deps: &ServerDeps,
) -> Result<GraphTemplate, DomainError> {
    deps.graphs
        .get_graph_template(template_id)
        .await
        .map_err(|e| DomainError::platform("template read", &format!("template {}", template_id), e))
}
