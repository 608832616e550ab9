//! Result and error types for the core library

use std::fmt;

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Message shown for failures the backend did not explain
pub const GENERIC_FAILURE: &str = "Request failed. Please try again.";

/// Error body returned by the backend for a failed call
///
/// The backend has no fixed error shape. The message is taken from `error`,
/// `message` or `msg` (first non-empty string wins); the full body is kept for
/// views that want more detail.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub body: JsonValue,
}

impl ApiError {
    pub fn from_body(status: u16, body: JsonValue) -> Self {
        let message = ["error", "message", "msg"]
            .iter()
            .filter_map(|key| body.get(key).and_then(|v| v.as_str()))
            .find(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        Self {
            status,
            message,
            body,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (HTTP {})", self.message, self.status)
    }
}

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient balance (including fee): need {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    /// The backend answered 401; the session has already been torn down
    #[error("Session expired: {0}")]
    Unauthenticated(ApiError),

    #[error("Backend error: {0}")]
    Api(ApiError),

    #[error("Not logged in. Run 'fpass login' first.")]
    NotLoggedIn,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// True when the session was torn down because of a 401
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }

    /// Backend error body, if the backend produced one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) | Self::Unauthenticated(e) => Some(e),
            _ => None,
        }
    }

    /// Short message suitable for a toast or banner
    ///
    /// Backend messages are surfaced verbatim, transport problems collapse to
    /// a generic failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::InsufficientBalance { .. } => "Insufficient balance (including fee)".to_string(),
            Self::Unauthenticated(_) => "Your session has expired. Please log in again.".to_string(),
            Self::Api(e) => e.message.clone(),
            Self::Transport(_) | Self::Decode(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport("request timed out".to_string())
        } else if e.is_connect() {
            Self::Transport("unable to reach the F-Pass backend".to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_prefers_error_field() {
        let err = ApiError::from_body(400, json!({"error": "Invalid amount", "message": "ignored"}));
        assert_eq!(err.message, "Invalid amount");
        assert_eq!(err.status, 400);
    }

    #[test]
    fn test_api_error_falls_back_to_message() {
        let err = ApiError::from_body(422, json!({"error": "", "message": "Email taken"}));
        assert_eq!(err.message, "Email taken");
    }

    #[test]
    fn test_api_error_without_message() {
        let err = ApiError::from_body(500, json!({"detail": 3}));
        assert_eq!(err.message, "Request failed with status 500");
    }

    #[test]
    fn test_user_message_collapses_transport() {
        let err = Error::Transport("connection reset".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE);

        let err = Error::Api(ApiError::from_body(400, json!({"error": "Receiver not found"})));
        assert_eq!(err.user_message(), "Receiver not found");
    }

    #[test]
    fn test_unauthenticated_exposes_body() {
        let err = Error::Unauthenticated(ApiError::from_body(401, json!({"msg": "Token has expired"})));
        assert!(err.is_unauthenticated());
        assert_eq!(err.api_error().unwrap().message, "Token has expired");
    }
}
