//! Byte relay from the Agent Runtime to the HTTP response.
//!
//! Chunks are passed on as they arrive, nothing is buffered. An interrupted
//! upstream (closed socket, timeout) ends the relay like a normal end of
//! stream. A client that goes away drops the relay, which is logged and not
//! treated as a failure.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::Stream;
use sktai_client::{ByteStream, SktaiError};
use tracing::{debug, info, warn};

use crate::common::RecoverableError;

/// Stream adapter that forwards runtime chunks and absorbs interruptions.
pub struct RelayStream {
    graph_id: String,
    inner: ByteStream,
    bytes_forwarded: u64,
    chunks_forwarded: u64,
    finished: bool,
}

impl RelayStream {
    pub fn new(graph_id: impl Into<String>, inner: ByteStream) -> Self {
        Self {
            graph_id: graph_id.into(),
            inner,
            bytes_forwarded: 0,
            chunks_forwarded: 0,
            finished: false,
        }
    }

    pub fn bytes_forwarded(&self) -> u64 {
        self.bytes_forwarded
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_forwarded += chunk.len() as u64;
                this.chunks_forwarded += 1;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(SktaiError::StreamInterrupted(reason)))) => {
                this.finished = true;
                let interrupted = RecoverableError::StreamInterrupted {
                    bytes_forwarded: this.bytes_forwarded,
                    reason,
                };
                warn!(graph_id = %this.graph_id, error = %interrupted, "Execution stream ended early");
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                warn!(graph_id = %this.graph_id, error = %e, "Execution stream failed");
                Poll::Ready(Some(Err(io::Error::other(e))))
            }
            Poll::Ready(None) => {
                this.finished = true;
                info!(
                    graph_id = %this.graph_id,
                    bytes = this.bytes_forwarded,
                    chunks = this.chunks_forwarded,
                    "Execution stream completed"
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for RelayStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayStream")
            .field("graph_id", &self.graph_id)
            .field("bytes_forwarded", &self.bytes_forwarded)
            .field("chunks_forwarded", &self.chunks_forwarded)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        if !self.finished {
            // The response body was dropped before the runtime finished
            debug!(
                graph_id = %self.graph_id,
                bytes = self.bytes_forwarded,
                "Client left execution stream"
            );
        }
    }
}
