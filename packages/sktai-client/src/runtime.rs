//! Agent runtime chunked execution endpoint.

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Method;
use std::pin::Pin;

use crate::error::{is_interrupted_io, Result, SktaiError};
use crate::types::StreamGraphRequest;
use crate::{check_status, SktaiClient};

/// Raw chunks of a runtime response, in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

impl SktaiClient {
    /// Start a graph execution and hand back the response body as it arrives.
    ///
    /// Errors before the first byte (connect failure, non-2xx) are returned
    /// directly. Once streaming, a body read that times out or hits a closed
    /// connection is yielded as [`SktaiError::StreamInterrupted`].
    pub async fn stream_graph(&self, req: &StreamGraphRequest) -> Result<ByteStream> {
        let builder = self
            .stream_request(Method::POST, "/api/v1/agent/agents/graphs/stream")
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(req);

        let resp = check_status(builder.send().await?).await?;
        tracing::debug!(graph_id = %req.graph_id, "Agent runtime stream opened");

        let stream = resp.bytes_stream().map(|chunk| chunk.map_err(classify_body_error));
        Ok(Box::pin(stream))
    }
}

fn classify_body_error(e: reqwest::Error) -> SktaiError {
    if e.is_timeout() || e.is_body() || is_interrupted_io(&e) {
        SktaiError::StreamInterrupted(e.to_string())
    } else {
        SktaiError::Network(e.to_string())
    }
}
