//! Decorator HTTP server.

use crate::downstream::HttpDownstream;
use crate::error::DecoratorError;
use crate::forwarder::DefaultingForwarder;
use crate::http::DecoratorResponse;
use crate::runtime::DecoratorConfig;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::header::CONTENT_LENGTH;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Path answered by the health check.
pub const HEALTH_PATH: &str = "/_health";

/// Hosts a [`DefaultingForwarder`] behind an HTTP/1 listener.
///
/// Every request other than the health check is treated as a shape
/// document, whatever its method or path.
pub struct DecoratorServer {
    config: DecoratorConfig,
    forwarder: Arc<DefaultingForwarder>,
}

impl DecoratorServer {
    /// Create a server forwarding to the configured downstream URL.
    pub fn new(config: DecoratorConfig) -> Result<Self, DecoratorError> {
        config.validate()?;
        let downstream = HttpDownstream::new(&config.downstream_url, config.timeout())?;
        let forwarder = DefaultingForwarder::new(Arc::new(downstream));
        Ok(Self::with_forwarder(config, forwarder))
    }

    /// Create a server around an already built forwarder.
    pub fn with_forwarder(config: DecoratorConfig, forwarder: DefaultingForwarder) -> Self {
        Self {
            config,
            forwarder: Arc::new(forwarder),
        }
    }

    /// Bind the configured address and serve until the listener fails.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Bind the configured `host:port`. The host may be a name or an IP.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.config.bind_addr()).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            "Decorator listening on {}, forwarding to {}",
            listener.local_addr()?,
            self.config.downstream_url
        );

        let forwarder = self.forwarder.clone();
        let config = Arc::new(self.config);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let forwarder = forwarder.clone();
            let config = config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let forwarder = forwarder.clone();
                    let config = config.clone();
                    async move { handle_request(req, forwarder, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    forwarder: Arc<DefaultingForwarder>,
    config: Arc<DecoratorConfig>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let request_id = generate_request_id();

    debug!(
        "Handling request: {} {} from {} [{}]",
        method, path, remote_addr, request_id
    );

    if config.enable_health && path == HEALTH_PATH {
        return Ok(build_response(DecoratorResponse::text("OK")));
    }

    let body = match read_body(req, config.max_body_size).await {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected request body: {} [{}]", e, request_id);
            return Ok(build_response(e.into()));
        }
    };

    match forwarder.handle(&body).await {
        Ok(text) => Ok(build_response(DecoratorResponse::forwarded(text))),
        Err(e) if e.is_client_error() => {
            warn!("Bad request: {} [{}]", e, request_id);
            Ok(build_response(e.into()))
        }
        Err(e) => {
            error!("Forwarding failed: {} [{}]", e, request_id);
            Ok(build_response(e.into()))
        }
    }
}

/// Collect the request body, enforcing the size limit.
///
/// A declared `Content-Length` over the limit is rejected before any of the
/// body is read; otherwise reading stops as soon as the limit is crossed.
async fn read_body<B>(req: Request<B>, limit: usize) -> Result<Bytes, DecoratorError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit as u64) {
        return Err(DecoratorError::BodyTooLarge { limit });
    }

    match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(DecoratorError::BodyTooLarge { limit }),
        Err(e) => Err(DecoratorError::BodyRead(e.to_string())),
    }
}

/// Build a hyper Response from a DecoratorResponse.
fn build_response(response: DecoratorResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut builder = Response::builder().status(status);
    for (name, value) in response.headers {
        builder = builder.header(name, value);
    }

    let body = response.body.unwrap_or_default();
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        error!("Failed to build response: {}", e);
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

/// Generate a unique request ID.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}
