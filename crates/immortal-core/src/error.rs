//! Error types for the Immortal client.
//!
//! A unified error type with explicit variants for transport failures,
//! non-OK API responses, and input validation.

use std::fmt;
use thiserror::Error;

/// The unified error type for Immortal client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout). No HTTP response
    /// was received at all.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-OK HTTP status.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// A request body could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid base URL.
    #[error("invalid API URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
}

impl Error {
    /// Extract a message suitable for display to a person.
    ///
    /// Prefers the server's structured `detail`; anything else (transport
    /// failures, bodies without a usable detail) yields `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api(err) => err.detail().unwrap_or_else(|| fallback.to_string()),
            _ => fallback.to_string(),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Any other HTTP-layer failure.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// A non-OK response from the API.
///
/// Carries the HTTP status and the response body as opaque JSON. The body
/// is whatever the server sent; when the server's body was not JSON the
/// client synthesizes `{"detail": <status text>}` in its place.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Response body, parsed or synthesized.
    pub body: serde_json::Value,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Extract the server's error detail, if the body carries one.
    ///
    /// The service reports errors as `{"detail": "..."}`, or as
    /// `{"detail": [{"loc": ..., "msg": "..."}, ...]}` for validation
    /// failures, in which case the first item's `msg` wins.
    pub fn detail(&self) -> Option<String> {
        match self.body.get("detail") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Array(items)) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(|msg| msg.as_str())
                .map(str::to_string),
            _ => None,
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(detail) = self.detail() {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_from_string() {
        let err = ApiError::new(404, json!({"detail": "Not found"}));
        assert_eq!(err.detail().as_deref(), Some("Not found"));
    }

    #[test]
    fn detail_from_validation_list() {
        let err = ApiError::new(
            422,
            json!({"detail": [{"loc": ["body", "email"], "msg": "Invalid email"}]}),
        );
        assert_eq!(err.detail().as_deref(), Some("Invalid email"));
    }

    #[test]
    fn detail_absent() {
        let err = ApiError::new(500, json!("unparseable"));
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn user_message_prefers_detail() {
        let err = Error::Api(ApiError::new(400, json!({"detail": "Passwords do not match"})));
        assert_eq!(err.user_message("Request failed"), "Passwords do not match");
    }

    #[test]
    fn user_message_falls_back() {
        let err = Error::Api(ApiError::new(502, json!({})));
        assert_eq!(err.user_message("Request failed"), "Request failed");

        let err = Error::Api(ApiError::new(422, json!({"detail": []})));
        assert_eq!(err.user_message("Request failed"), "Request failed");
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::new(401, json!({"detail": "Not authenticated"}));
        assert_eq!(err.to_string(), "HTTP 401: Not authenticated");
        assert!(err.is_unauthorized());
    }
}
