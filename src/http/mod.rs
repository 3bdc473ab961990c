//! HTTP value types returned by the decorator to its host.

mod response;

pub use response::{DecoratorResponse, StatusCode};
