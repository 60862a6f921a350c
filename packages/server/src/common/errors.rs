use sktai_client::SktaiError;
use thiserror::Error;

/// Errors that end a domain operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller sent something unusable (missing graph id, missing payload)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A platform service failed; the original message is kept in `source`
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: SktaiError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    /// Log a platform failure with its operation name and wrap it.
    pub fn upstream(operation: &'static str, source: SktaiError) -> Self {
        tracing::error!(operation, error = %source, "SKTAI call failed");
        DomainError::Upstream { operation, source }
    }

    /// Like [`DomainError::upstream`], but a 404 becomes `NotFound`.
    pub fn platform(operation: &'static str, what: &str, source: SktaiError) -> Self {
        if source.is_not_found() {
            tracing::debug!(operation, what, "Platform resource not found");
            return DomainError::NotFound(what.to_string());
        }
        Self::upstream(operation, source)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        DomainError::InvalidInput(message.into())
    }
}

/// Conditions a best-effort step reports instead of failing.
///
/// Functions that can end this way return `Result<T, RecoverableError>` so the
/// caller's decision to continue is written out at the call site.
#[derive(Debug, Error)]
pub enum RecoverableError {
    /// Policy push failed; the resource reads as public until a later push succeeds
    #[error("scope not applied to {resource_url}: {reason}")]
    ScopeNotApplied { resource_url: String, reason: String },

    /// Either side closed or timed out mid-stream
    #[error("stream interrupted after {bytes_forwarded} bytes: {reason}")]
    StreamInterrupted { bytes_forwarded: u64, reason: String },

    /// The edge list could not be read; the graph is saved with no edges
    #[error("graph edges unreadable: {reason}")]
    EdgesUnparsed { reason: String },

    /// Remote delete reported the cascade step that already ran here
    #[error("cascade already applied for {resource_id}: {reason}")]
    CascadeAlreadyApplied { resource_id: String, reason: String },
}
