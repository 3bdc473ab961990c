//! Shape decorator server.
//!
//! Reads its configuration from `DECORATOR_*` environment variables and
//! serves until the listener fails.

use shape_decorator::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DecoratorConfig::from_env()?;

    tracing::info!(
        "Starting shape decorator on {} (timeout {}s)",
        config.bind_addr(),
        config.downstream_timeout
    );

    DecoratorServer::new(config)?.run().await
}
