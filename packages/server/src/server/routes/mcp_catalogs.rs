//! MCP catalog endpoints under `/api/v1/mcp-catalogs`.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use sktai_client::CreateMcpCatalogRequest;

use super::error::{require_actor, ApiError};
use crate::common::Actor;
use crate::domains::mcp_catalog::{self, CreatedMcpCatalog, DeletedMcpCatalog};
use crate::server::app::AppState;

pub async fn create_mcp_catalog(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Json(req): Json<CreateMcpCatalogRequest>,
) -> Result<(StatusCode, Json<CreatedMcpCatalog>), ApiError> {
    let actor = require_actor(actor)?;
    let created = mcp_catalog::create_mcp_catalog(req, &actor, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_mcp_catalog(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Path(catalog_id): Path<String>,
) -> Result<Json<DeletedMcpCatalog>, ApiError> {
    require_actor(actor)?;
    Ok(Json(
        mcp_catalog::delete_mcp_catalog(&catalog_id, &state.deps).await?,
    ))
}
