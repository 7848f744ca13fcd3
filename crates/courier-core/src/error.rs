//! Error types for the Courier client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Courier workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. The variants follow the
/// client's error taxonomy: local validation failures are rejected before
/// any network activity, transport failures carry the status code when one
/// was received, and best-effort call failures are logged by callers rather
/// than propagated.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CourierError {
    /// Local validation failure (empty message, oversized file).
    /// Never the result of a network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure or non-success status on a required call.
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status code, if a response was received at all.
        status: Option<u16>,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", "multipart", etc.
        message: String,
    },

    /// IO error (reading a file selected for upload)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CourierError {
    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Transport error without a status code (connection-level failure)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a Transport error carrying the HTTP status that was received
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<std::io::Error> for CourierError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for CourierError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CourierError>`.
pub type Result<T> = std::result::Result<T, CourierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_predicate() {
        let err = CourierError::validation("message cannot be empty");
        assert!(err.is_validation());
        assert!(!err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn transport_carries_status() {
        let err = CourierError::transport_status(503, "service unavailable");
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(503));
    }
}
