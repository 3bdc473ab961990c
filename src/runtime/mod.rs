//! Hosting layer: configuration and the HTTP server.

mod config;
mod server;

pub use config::{
    DecoratorConfig, ENV_CONFIG_FILE, ENV_DOWNSTREAM_URL, ENV_HOST, ENV_MAX_BODY_SIZE, ENV_PORT,
    ENV_TIMEOUT_SECS,
};
pub use server::{DecoratorServer, HEALTH_PATH};
