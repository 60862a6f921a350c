//! MCP catalog create/delete with scope push and serving cascade.

use serde::Serialize;
use sktai_client::{CreateMcpCatalogRequest, McpCatalog, SktaiError};
use tracing::{info, warn};

use crate::common::{Actor, DomainError, RecoverableError};
use crate::domains::scope::{asset_url, AssetKind, Scope};
use crate::kernel::ServerDeps;

/// Text the catalog service puts in its delete error when its own serving
/// cleanup failed. Delete runs that cleanup first, so that error means the
/// catalog itself is gone.
///
/// Compatibility shim: the service has no error code for this case. Replace
/// with a code match once it reports one.
pub const CASCADE_SERVING_DELETE_MARKER: &str = "MCP Serving 삭제";

#[derive(Debug, Clone, Serialize)]
pub struct CreatedMcpCatalog {
    #[serde(flatten)]
    pub catalog: McpCatalog,
    pub applied_scope: Option<Scope>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedMcpCatalog {
    pub id: String,
    /// The catalog service reported the already-run serving cleanup as failed
    pub cascade_error_suppressed: bool,
}

pub async fn create_mcp_catalog(
    req: CreateMcpCatalogRequest,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<CreatedMcpCatalog, DomainError> {
    if req.name.trim().is_empty() {
        return Err(DomainError::invalid("name is required"));
    }
    let catalog = deps
        .mcp
        .create_catalog(&req)
        .await
        .map_err(|e| DomainError::upstream("mcp catalog create", e))?;
    info!(catalog_id = %catalog.id, "MCP catalog created");

    let url = asset_url(AssetKind::McpCatalog, &catalog.id);
    let applied_scope = match deps.scope.set_scope(&url, actor).await {
        Ok(scope) => Some(scope),
        Err(e) => {
            warn!(catalog_id = %catalog.id, error = %e, "Continuing without scope");
            None
        }
    };

    Ok(CreatedMcpCatalog {
        catalog,
        applied_scope,
    })
}

/// Remove the serving instance, then the catalog entry, then its scope row.
pub async fn delete_mcp_catalog(
    catalog_id: &str,
    deps: &ServerDeps,
) -> Result<DeletedMcpCatalog, DomainError> {
    if catalog_id.trim().is_empty() {
        return Err(DomainError::invalid("catalog_id is required"));
    }

    match deps.mcp.delete_serving(catalog_id).await {
        Ok(()) => {}
        Err(e) if e.is_not_found() => {
            info!(catalog_id, "No serving instance to remove");
        }
        Err(e) => return Err(DomainError::upstream("mcp serving delete", e)),
    }

    let cascade_error_suppressed = match deps.mcp.delete_catalog(catalog_id).await {
        Ok(()) => false,
        Err(e) => match cascade_already_applied(catalog_id, e) {
            Ok(resolved) => {
                warn!(catalog_id, error = %resolved, "Ignoring cascade error on catalog delete");
                true
            }
            Err(e) => {
                return Err(DomainError::platform(
                    "mcp catalog delete",
                    &format!("mcp catalog {}", catalog_id),
                    e,
                ))
            }
        },
    };

    if let Err(e) = deps
        .scope
        .forget_asset(&asset_url(AssetKind::McpCatalog, catalog_id))
        .await
    {
        warn!(catalog_id, error = %e, "MCP catalog deleted, scope row left behind");
    }

    info!(catalog_id, cascade_error_suppressed, "MCP catalog deleted");
    Ok(DeletedMcpCatalog {
        id: catalog_id.to_string(),
        cascade_error_suppressed,
    })
}

/// Classify a catalog delete error: the serving-cleanup report becomes
/// recoverable, anything else is handed back unchanged.
pub fn cascade_already_applied(
    catalog_id: &str,
    error: SktaiError,
) -> Result<RecoverableError, SktaiError> {
    let is_cascade_report = error
        .api_message()
        .is_some_and(|message| message.contains(CASCADE_SERVING_DELETE_MARKER));
    if !is_cascade_report {
        return Err(error);
    }
    Ok(RecoverableError::CascadeAlreadyApplied {
        resource_id: catalog_id.to_string(),
        reason: error.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_error_is_recoverable() {
        let err = SktaiError::Api {
            status: 500,
            message: "MCP Serving 삭제 중 오류가 발생했습니다".into(),
        };
        let resolved = cascade_already_applied("mcp-1", err).unwrap();
        assert!(matches!(
            resolved,
            RecoverableError::CascadeAlreadyApplied { ref resource_id, .. } if resource_id == "mcp-1"
        ));
    }

    #[test]
    fn test_other_errors_returned_unchanged() {
        let err = SktaiError::Api {
            status: 409,
            message: "catalog in use by agent".into(),
        };
        let returned = cascade_already_applied("mcp-1", err).unwrap_err();
        assert_eq!(returned.api_message(), Some("catalog in use by agent"));

        let network = SktaiError::Network("MCP Serving 삭제".into());
        assert!(cascade_already_applied("mcp-1", network).is_err());
    }
}
