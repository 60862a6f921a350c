//! Error types for the SKTAI client.

use thiserror::Error;

/// Result type for SKTAI client operations.
pub type Result<T> = std::result::Result<T, SktaiError>;

/// SKTAI client errors.
#[derive(Debug, Error)]
pub enum SktaiError {
    /// Configuration error (missing base URL, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout before a response arrived)
    #[error("Network error: {0}")]
    Network(String),

    /// The platform answered with a non-2xx status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A chunked response body stopped mid-stream (peer closed, read timed out)
    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),
}

impl SktaiError {
    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            SktaiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message reported by the platform for an `Api` error.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            SktaiError::Api { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for SktaiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SktaiError::Parse(e.to_string())
        } else {
            SktaiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SktaiError {
    fn from(e: serde_json::Error) -> Self {
        SktaiError::Parse(e.to_string())
    }
}

/// Whether an error (or anything in its source chain) is an I/O condition that
/// ends a stream without the producer having failed.
pub fn is_interrupted_io(err: &(dyn std::error::Error + 'static)) -> bool {
    use std::io::ErrorKind;

    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                ErrorKind::Interrupted
                    | ErrorKind::TimedOut
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let err = SktaiError::Api {
            status: 404,
            message: "graph not found".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.api_message(), Some("graph not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_interrupted_io_walks_source_chain() {
        #[derive(Debug, Error)]
        #[error("wrapper")]
        struct Wrapper(#[source] std::io::Error);

        let reset = Wrapper(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset by peer",
        ));
        assert!(is_interrupted_io(&reset));

        let denied = Wrapper(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "nope",
        ));
        assert!(!is_interrupted_io(&denied));
    }
}
