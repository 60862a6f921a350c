//! Agent builder endpoints under `/api/v1/agent-builders`.

use axum::{
    body::Body,
    extract::{Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use sktai_client::{
    FullLineage, GraphInfoUpdate, GraphTemplate, LineageDirection, Policy, StreamGraphRequest,
};

use super::error::{require_actor, ApiError};
use crate::common::{Actor, Page, PageRequest};
use crate::domains::agent_builder::actions;
use crate::domains::agent_builder::{
    AgentBuilderDetail, AgentBuilderSummary, CreateAgentBuilder, CreatedAgentBuilder,
    SaveAgentGraph, SavedAgentGraph,
};
use crate::domains::scope::Scope;
use crate::server::app::AppState;

#[derive(Deserialize)]
pub struct LineageQuery {
    #[serde(default)]
    direction: LineageDirection,
}

#[derive(Deserialize)]
pub struct ExportQuery {
    credential_type: String,
}

pub async fn list_agent_builders(
    Extension(state): Extension<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Page<AgentBuilderSummary>>, ApiError> {
    Ok(Json(actions::get_agent_builders(&page, &state.deps).await?))
}

pub async fn create_agent_builder(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Json(input): Json<CreateAgentBuilder>,
) -> Result<(StatusCode, Json<CreatedAgentBuilder>), ApiError> {
    let actor = require_actor(actor)?;
    let created = actions::create_agent_builder(input, &actor, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_agent_builder(
    Extension(state): Extension<AppState>,
    Path(graph_id): Path<String>,
) -> Result<Json<AgentBuilderDetail>, ApiError> {
    Ok(Json(actions::get_agent_builder(&graph_id, &state.deps).await?))
}

pub async fn delete_agent_builder(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(graph_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_actor(actor)?;
    actions::delete_agent_builder(&graph_id, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_agent_info(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(graph_id): Path<String>,
    Json(update): Json<GraphInfoUpdate>,
) -> Result<StatusCode, ApiError> {
    let actor = require_actor(actor)?;
    actions::update_agent_info(&graph_id, update, &actor, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn save_agent_graph(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(graph_id): Path<String>,
    Json(input): Json<SaveAgentGraph>,
) -> Result<Json<SavedAgentGraph>, ApiError> {
    let actor = require_actor(actor)?;
    Ok(Json(
        actions::save_agent_graph(&graph_id, input, &actor, &state.deps).await?,
    ))
}

/// Chunked relay of one execution; each runtime chunk is written as it arrives.
pub async fn stream_agent_graph(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Json(request): Json<StreamGraphRequest>,
) -> Result<Response, ApiError> {
    require_actor(actor)?;
    let relay = actions::stream_agent_graph(request, &state.deps).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(relay),
    )
        .into_response())
}

pub async fn get_agent_lineages(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(graph_id): Path<String>,
    Query(query): Query<LineageQuery>,
) -> Result<Json<FullLineage>, ApiError> {
    require_actor(actor)?;
    Ok(Json(
        actions::get_agent_lineages(&graph_id, query.direction, &state.deps).await?,
    ))
}

pub async fn get_agent_policy(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(graph_id): Path<String>,
) -> Result<Json<Vec<Policy>>, ApiError> {
    require_actor(actor)?;
    Ok(Json(
        actions::get_agent_builder_policy(&graph_id, &state.deps).await?,
    ))
}

pub async fn set_agent_policy(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(graph_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let actor = require_actor(actor)?;
    let scope: Scope = actions::set_agent_builder_policy(&graph_id, &actor, &state.deps).await?;
    Ok(Json(serde_json::json!({ "graph_id": graph_id, "scope": scope })))
}

pub async fn get_app_info(
    Extension(state): Extension<AppState>,
    Path(graph_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(actions::get_agent_app_info(&graph_id, &state.deps).await?))
}

pub async fn export_code(
    Extension(state): Extension<AppState>,
    Path(graph_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(
        actions::export_agent_graph_code(&graph_id, &query.credential_type, &state.deps).await?,
    ))
}

pub async fn list_templates(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<GraphTemplate>>, ApiError> {
    Ok(Json(actions::get_graph_templates(&state.deps).await?))
}

pub async fn get_template(
    Extension(state): Extension<AppState>,
    Path(template_id): Path<String>,
) -> Result<Json<GraphTemplate>, ApiError> {
    Ok(Json(actions::get_graph_template(&template_id, &state.deps).await?))
}
