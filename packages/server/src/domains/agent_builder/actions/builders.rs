//! Agent-builder lifecycle: list, read, create, rename, delete.

use sktai_client::{CreateGraphRequest, GraphInfoUpdate, GraphPayload, ListGraphsQuery};
use tracing::{info, warn};

use crate::common::{Actor, DomainError, Page, PageRequest};
use crate::domains::agent_builder::models::{
    normalize_graph, AgentBuilderDetail, AgentBuilderSummary, CreateAgentBuilder,
    CreatedAgentBuilder,
};
use crate::domains::scope::{asset_url, AssetKind};
use crate::kernel::ServerDeps;

fn graph_url(graph_id: &str) -> String {
    asset_url(AssetKind::AgentGraph, graph_id)
}

pub(super) fn require_graph_id(graph_id: &str) -> Result<(), DomainError> {
    if graph_id.trim().is_empty() {
        return Err(DomainError::invalid("graph_id is required"));
    }
    Ok(())
}

/// One page of agent builders, each with its displayed scope.
///
/// Scope is looked up per item; a failed lookup shows the default and does
/// not fail the page.
pub async fn get_agent_builders(
    request: &PageRequest,
    deps: &ServerDeps,
) -> Result<Page<AgentBuilderSummary>, DomainError> {
    let page = request
        .validate()
        .map_err(|e| DomainError::invalid(e.to_string()))?;

    let listing = deps
        .graphs
        .list_graphs(&ListGraphsQuery {
            page: page.page,
            size: page.size,
            search: page.search.clone(),
        })
        .await
        .map_err(|e| DomainError::upstream("graph list", e))?;

    let mut items = Vec::with_capacity(listing.data.len());
    for graph in listing.data {
        let scope = deps.scope.get_scope(&graph_url(&graph.id)).await;
        items.push(AgentBuilderSummary { graph, scope });
    }

    Ok(Page {
        items,
        page: page.page,
        size: page.size,
        total: listing.total,
    })
}

pub async fn get_agent_builder(
    graph_id: &str,
    deps: &ServerDeps,
) -> Result<AgentBuilderDetail, DomainError> {
    require_graph_id(graph_id)?;
    let graph = deps
        .graphs
        .get_graph(graph_id)
        .await
        .map_err(|e| DomainError::platform("graph read", &format!("agent builder {}", graph_id), e))?;
    let scope = deps.scope.get_scope(&graph_url(graph_id)).await;
    Ok(AgentBuilderDetail { graph, scope })
}

/// Create a graph, push the creator's project policy, and record lineage of
/// any initial nodes.
///
/// A failed policy push does not undo the create; the result reports no
/// applied scope and reads show the default.
pub async fn create_agent_builder(
    input: CreateAgentBuilder,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CreatedAgentBuilder, DomainError> {
    if input.name.trim().is_empty() {
        return Err(DomainError::invalid("name is required"));
    }
    let payload = match &input.graph {
        Some(raw) => normalize_graph(raw)?,
        None => GraphPayload::default(),
    };

    let graph = deps
        .graphs
        .create_graph(&CreateGraphRequest {
            name: input.name,
            description: input.description,
            graph: payload,
        })
        .await
        .map_err(|e| DomainError::upstream("graph create", e))?;
    info!(graph_id = %graph.id, member_id = %actor.member_id, "Agent builder created");

    let applied_scope = match deps.scope.set_scope(&graph_url(&graph.id), actor).await {
        Ok(scope) => Some(scope),
        Err(e) => {
            warn!(graph_id = %graph.id, error = %e, "Continuing without scope");
            None
        }
    };

    let lineage_edges = if graph.graph.nodes.is_empty() {
        0
    } else {
        deps.reconciler
            .reconcile(&graph.id, &actor.project_id, &graph.graph.nodes)
            .await?
            .edges
            .len()
    };

    Ok(CreatedAgentBuilder {
        graph,
        applied_scope,
        lineage_edges,
    })
}

/// Rename or re-describe an agent, then re-push its scope.
///
/// The push covers a creation-time push that ran before the actor had a
/// project assignment; its failure is logged and ignored.
pub async fn update_agent_info(
    graph_id: &str,
    update: GraphInfoUpdate,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<(), DomainError> {
    require_graph_id(graph_id)?;
    if update.name.trim().is_empty() {
        return Err(DomainError::invalid("name is required"));
    }

    deps.graphs
        .update_graph_info(graph_id, &update)
        .await
        .map_err(|e| DomainError::platform("graph info update", &format!("agent builder {}", graph_id), e))?;

    if let Err(e) = deps.scope.set_scope(&graph_url(graph_id), actor).await {
        warn!(graph_id, error = %e, "Scope re-push failed after info update");
    }
    Ok(())
}

/// Delete the graph, then its lineage, then its scope row.
///
/// A graph the Graph Store no longer knows counts as deleted; its lineage and
/// scope row are still removed.
pub async fn delete_agent_builder(graph_id: &str, deps: &ServerDeps) -> Result<(), DomainError> {
    require_graph_id(graph_id)?;

    match deps.graphs.delete_graph(graph_id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            info!(graph_id, "Graph already gone, clearing what is left");
        }
        Err(e) => return Err(DomainError::upstream("graph delete", e)),
    }

    deps.lineage
        .delete_lineage(graph_id)
        .await
        .map_err(|e| DomainError::upstream("lineage delete", e))?;
    deps.reconciler.forget(graph_id).await;

    match deps.scope.forget_asset(&graph_url(graph_id)).await {
        Ok(removed) => info!(graph_id, scope_row_removed = removed, "Agent builder deleted"),
        Err(e) => warn!(graph_id, error = %e, "Agent builder deleted, scope row left behind"),
    }
    Ok(())
}
