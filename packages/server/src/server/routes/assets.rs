//! Moving a resource between projects.

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use super::error::{require_actor, ApiError};
use crate::common::Actor;
use crate::domains::scope::{resolve_scope, ProjectAsset, Scope, PUBLIC_SHARING_SEQ};
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveAssetRequest {
    pub asset_url: String,
    /// Defaults to the caller's project
    #[serde(default)]
    pub owning_project_seq: Option<i64>,
    /// Negative for public
    #[serde(default = "public_sharing_seq")]
    pub sharing_project_seq: i64,
}

fn public_sharing_seq() -> i64 {
    PUBLIC_SHARING_SEQ
}

#[derive(Debug, Serialize)]
pub struct MovedAsset {
    #[serde(flatten)]
    pub asset: ProjectAsset,
    pub scope: Scope,
}

pub async fn move_asset(
    Extension(state): Extension<AppState>,
    actor: Option<Extension<Actor>>,
    Json(req): Json<MoveAssetRequest>,
) -> Result<Json<MovedAsset>, ApiError> {
    let actor = require_actor(actor)?;
    let asset = state
        .deps
        .scope
        .move_asset(
            &req.asset_url,
            req.owning_project_seq.unwrap_or(actor.project_seq),
            req.sharing_project_seq,
            &actor,
        )
        .await?;
    let scope = resolve_scope(Some(&asset));
    Ok(Json(MovedAsset { asset, scope }))
}
