//! Error type for the decorator function.

use crate::http::{DecoratorResponse, StatusCode};
use std::time::Duration;

/// Failures that can occur while decorating and forwarding a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoratorError {
    /// The request body is not valid JSON.
    Parse(String),
    /// The request body is valid JSON but not an object.
    NotAnObject(&'static str),
    /// The request body exceeds the configured limit.
    BodyTooLarge { limit: usize },
    /// The request body could not be read from the connection.
    BodyRead(String),
    /// The downstream service did not answer in time.
    Timeout(Duration),
    /// Network or protocol error while talking to the downstream service.
    Downstream(String),
    /// Invalid configuration.
    Config(String),
}

impl DecoratorError {
    /// HTTP status code reported to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            DecoratorError::Parse(_) | DecoratorError::NotAnObject(_) => StatusCode::BAD_REQUEST,
            DecoratorError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            DecoratorError::BodyRead(_) => StatusCode::BAD_REQUEST,
            DecoratorError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            DecoratorError::Downstream(_) => StatusCode::BAD_GATEWAY,
            DecoratorError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl std::fmt::Display for DecoratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoratorError::Parse(msg) => write!(f, "invalid JSON body: {}", msg),
            DecoratorError::NotAnObject(kind) => {
                write!(f, "expected a JSON object, got {}", kind)
            }
            DecoratorError::BodyTooLarge { limit } => {
                write!(f, "request body exceeds limit of {} bytes", limit)
            }
            DecoratorError::BodyRead(msg) => write!(f, "failed to read request body: {}", msg),
            DecoratorError::Timeout(after) => {
                write!(f, "downstream did not respond within {:?}", after)
            }
            DecoratorError::Downstream(msg) => write!(f, "downstream request failed: {}", msg),
            DecoratorError::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for DecoratorError {}

impl From<DecoratorError> for DecoratorResponse {
    fn from(err: DecoratorError) -> Self {
        DecoratorResponse::error(err.status(), format!("Error: {}", err))
    }
}

impl From<serde_json::Error> for DecoratorError {
    fn from(err: serde_json::Error) -> Self {
        DecoratorError::Parse(err.to_string())
    }
}

impl From<hyper_util::client::legacy::Error> for DecoratorError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        DecoratorError::Downstream(err.to_string())
    }
}

impl From<hyper::Error> for DecoratorError {
    fn from(err: hyper::Error) -> Self {
        DecoratorError::Downstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(DecoratorError::Parse("eof".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(DecoratorError::NotAnObject("an array").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            DecoratorError::BodyTooLarge { limit: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            DecoratorError::BodyRead("connection reset".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DecoratorError::Timeout(Duration::from_secs(1)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            DecoratorError::Downstream("refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            DecoratorError::Config("bad url".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(DecoratorError::Parse("eof".into()).is_client_error());
        assert!(!DecoratorError::Downstream("refused".into()).is_client_error());
    }

    #[test]
    fn test_body_read_message_is_not_about_json() {
        let message = DecoratorError::BodyRead("connection reset".into()).to_string();

        assert_eq!(message, "failed to read request body: connection reset");
        assert!(!message.contains("JSON"));
    }

    #[test]
    fn test_error_into_response() {
        let response: DecoratorResponse = DecoratorError::Downstream("connection refused".into()).into();

        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.text_body(),
            Some("Error: downstream request failed: connection refused".to_string())
        );
    }
}
