//! Agent-builder scope: explicit push and policy read-back.

use sktai_client::Policy;

use super::builders::require_graph_id;
use crate::common::{Actor, DomainError};
use crate::domains::scope::{asset_url, AssetKind, Scope};
use crate::kernel::ServerDeps;

/// Push the actor's project policy; unlike creation, a failure is returned.
pub async fn set_agent_builder_policy(
    graph_id: &str,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Scope, DomainError> {
    require_graph_id(graph_id)?;
    deps.scope
        .apply_scope(&asset_url(AssetKind::AgentGraph, graph_id), actor)
        .await
}

/// Active policies without role-based entries.
pub async fn get_agent_builder_policy(
    graph_id: &str,
    deps: &ServerDeps,
) -> Result<Vec<Policy>, DomainError> {
    require_graph_id(graph_id)?;
    deps.scope
        .get_policy(&asset_url(AssetKind::AgentGraph, graph_id))
        .await
}
