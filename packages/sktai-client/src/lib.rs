//! Pure SKTAI platform REST API client.
//!
//! A thin client for the platform services the admin backend aggregates:
//! the agent Graph Store, the Lineage Store, the Prompt service, the
//! authorization Policy Engine, the MCP Catalog and the agent runtime's
//! chunked execution endpoint. No business logic lives here.
//!
//! # Example
//!
//! ```rust,ignore
//! use sktai_client::{SktaiClient, SktaiClientOptions};
//!
//! let client = SktaiClient::new(
//!     SktaiClientOptions::new("https://aip.sktai.io").with_token("service-token"),
//! )?;
//!
//! let graph = client.get_graph("0b9c...").await?;
//! println!("{} has {} nodes", graph.name, graph.graph.nodes.len());
//! ```

pub mod error;
pub mod types;

mod graphs;
mod lineage;
mod mcp;
mod policy;
mod prompts;
mod runtime;

pub use error::{is_interrupted_io, Result, SktaiError};
pub use runtime::ByteStream;
pub use types::*;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct SktaiClientOptions {
    pub base_url: String,
    /// Service credential sent as a bearer token on every call.
    pub api_token: Option<String>,
    /// Whole-request timeout for request/response calls. Not applied to streams.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl SktaiClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct SktaiClient {
    client: Client,
    /// Separate client without a total timeout: executions run as long as the runtime streams.
    stream_client: Client,
    base_url: String,
    token: Option<String>,
}

impl SktaiClient {
    pub fn new(options: SktaiClientOptions) -> Result<Self> {
        let base_url = options.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SktaiError::Config("base URL must be set".into()));
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| SktaiError::Config(e.to_string()))?;

        let stream_client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| SktaiError::Config(e.to_string()))?;

        Ok(Self {
            client,
            stream_client,
            base_url,
            token: options.api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Request authenticated as the end user instead of the service credential.
    pub(crate) fn request_as(&self, method: Method, path: &str, user_token: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(user_token)
    }

    pub(crate) fn stream_request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.stream_client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let resp = check_status(builder.send().await?).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            SktaiError::Parse(format!(
                "{} (body: {})",
                e,
                String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
            ))
        })
    }

    pub(crate) async fn send_empty(builder: RequestBuilder) -> Result<()> {
        check_status(builder.send().await?).await.map(|_| ())
    }
}

pub(crate) async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body = %body, "SKTAI call failed");
    Err(SktaiError::Api {
        status: status.as_u16(),
        message: error_message(body),
    })
}

/// Platform errors arrive as `{"detail": ...}` or `{"message": ...}`; anything else is kept verbatim.
fn error_message(body: String) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
    parsed
        .as_ref()
        .and_then(|v| v.get("detail").or_else(|| v.get("message")))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail":"MCP Serving 삭제 실패"}"#.into()),
            "MCP Serving 삭제 실패"
        );
        assert_eq!(error_message(r#"{"message":"boom"}"#.into()), "boom");
        assert_eq!(error_message("plain text".into()), "plain text");
    }

    #[test]
    fn test_new_rejects_empty_base_url() {
        let result = SktaiClient::new(SktaiClientOptions::new("/"));
        assert!(matches!(result, Err(SktaiError::Config(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SktaiClient::new(SktaiClientOptions::new("http://localhost:9000/")).unwrap();
        assert_eq!(client.url("/api/v1/x"), "http://localhost:9000/api/v1/x");
    }
}
