//! Outbound side: the service that receives normalized documents.

use crate::error::DecoratorError;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tracing::{debug, warn};

/// A service that accepts a JSON document and answers with text.
#[async_trait]
pub trait Downstream: Send + Sync {
    /// POST `body` as `application/json` and return the reply body verbatim.
    async fn post_json(&self, body: Bytes) -> Result<String, DecoratorError>;
}

/// Downstream reached over plain HTTP/1.
pub struct HttpDownstream {
    uri: Uri,
    timeout: Duration,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpDownstream {
    /// Create a client for `url`, bounding each exchange by `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DecoratorError> {
        let uri = parse_http_uri(url)?;
        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self {
            uri,
            timeout,
            client,
        })
    }

    async fn exchange(&self, body: Bytes) -> Result<String, DecoratorError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.uri.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(body))
            .map_err(|e| DecoratorError::Config(e.to_string()))?;

        let response = self.client.request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            warn!("Downstream {} answered with status {}", self.uri, status);
        }

        let text = String::from_utf8_lossy(&bytes).into_owned();
        debug!("Downstream replied: {}", text);
        Ok(text)
    }
}

#[async_trait]
impl Downstream for HttpDownstream {
    async fn post_json(&self, body: Bytes) -> Result<String, DecoratorError> {
        match tokio::time::timeout(self.timeout, self.exchange(body)).await {
            Ok(result) => result,
            Err(_) => Err(DecoratorError::Timeout(self.timeout)),
        }
    }
}

/// Validate a downstream URL. Only `http` is supported by the connector.
pub fn parse_http_uri(url: &str) -> Result<Uri, DecoratorError> {
    let uri: Uri = url
        .parse()
        .map_err(|e| DecoratorError::Config(format!("invalid downstream URL '{}': {}", url, e)))?;

    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => {
            return Err(DecoratorError::Config(format!(
                "unsupported downstream scheme '{}', expected http",
                other
            )))
        }
        None => {
            return Err(DecoratorError::Config(format!(
                "downstream URL '{}' has no scheme",
                url
            )))
        }
    }

    if uri.host().is_none() {
        return Err(DecoratorError::Config(format!(
            "downstream URL '{}' has no host",
            url
        )));
    }

    Ok(uri)
}
