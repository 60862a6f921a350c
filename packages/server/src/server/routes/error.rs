//! HTTP error mapping for domain failures.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::common::{Actor, DomainError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    /// A platform service failed; the message is the platform's own
    #[error("Upstream error: {0}")]
    BadGateway(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidInput(msg) => ApiError::BadRequest(msg),
            DomainError::NotFound(what) => ApiError::NotFound(what),
            upstream @ DomainError::Upstream { .. } => ApiError::BadGateway(upstream.to_string()),
            other => {
                tracing::error!(error = %other, "Request failed");
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// The authenticated actor, or 401.
pub fn require_actor(actor: Option<Extension<Actor>>) -> Result<Actor, ApiError> {
    actor.map(|Extension(actor)| actor).ok_or(ApiError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sktai_client::SktaiError;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = vec![
            (DomainError::invalid("graph_id is required"), StatusCode::BAD_REQUEST),
            (DomainError::NotFound("graph g-1".into()), StatusCode::NOT_FOUND),
            (
                DomainError::Upstream {
                    operation: "graph save",
                    source: SktaiError::Network("refused".into()),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                DomainError::Storage(anyhow::anyhow!("pool closed")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = ApiError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
