//! The defaulting forwarder: parse, default, serialize, POST.

use crate::document::{apply_defaults, parse_document, to_body};
use crate::downstream::Downstream;
use crate::error::DecoratorError;
use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

/// Normalizes shape documents and forwards them to a downstream service.
///
/// Holds no per-request state; one instance can serve any number of
/// concurrent invocations.
pub struct DefaultingForwarder {
    downstream: Arc<dyn Downstream>,
}

impl DefaultingForwarder {
    /// Create a forwarder sending to `downstream`.
    pub fn new(downstream: Arc<dyn Downstream>) -> Self {
        Self { downstream }
    }

    /// Handle one request body and return the downstream's reply text.
    ///
    /// A body that fails to parse is rejected before any outbound call.
    pub async fn handle(&self, request_body: &[u8]) -> Result<String, DecoratorError> {
        debug!("Received body: {}", String::from_utf8_lossy(request_body));

        let document = apply_defaults(parse_document(request_body)?);
        let body = to_body(&document)?;

        debug!("Forwarding normalized document ({} bytes)", body.len());
        self.downstream.post_json(Bytes::from(body)).await
    }
}
