//! # Shape Decorator
//!
//! A decorator function that sits in front of a downstream service. It
//! accepts a JSON shape document, fills in the `Name` and `Color` fields
//! when they are missing or null, forwards the normalized document to the
//! downstream service and returns that service's reply verbatim.
//!
//! ## Architecture
//!
//! ```text
//!   caller ──▶ DecoratorServer ──▶ DefaultingForwarder ──▶ Downstream
//!                                   parse ─ default ─ POST   (HTTP/1)
//!   caller ◀── reply text ◀───────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shape_decorator::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = DecoratorConfig::new()
//!         .port(8080)
//!         .downstream_url("http://10.0.0.12:8080/");
//!
//!     DecoratorServer::new(config)?.run().await
//! }
//! ```
//!
//! The defaulting rules are available without any I/O:
//!
//! ```rust
//! use shape_decorator::document::{apply_defaults, parse_document};
//!
//! let doc = apply_defaults(parse_document(br#"{"Name": "Rex"}"#).unwrap());
//! assert_eq!(doc["Color"], "Transparent");
//! ```

pub mod document;
pub mod downstream;
pub mod error;
pub mod forwarder;
pub mod http;
pub mod runtime;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::document::{apply_defaults, parse_document, Document};
    pub use crate::downstream::{Downstream, HttpDownstream};
    pub use crate::error::DecoratorError;
    pub use crate::forwarder::DefaultingForwarder;
    pub use crate::http::{DecoratorResponse, StatusCode};
    pub use crate::runtime::{DecoratorConfig, DecoratorServer};
    pub use async_trait::async_trait;
}

pub use document::{apply_defaults, Document};
pub use error::DecoratorError;
pub use forwarder::DefaultingForwarder;
pub use runtime::{DecoratorConfig, DecoratorServer};
