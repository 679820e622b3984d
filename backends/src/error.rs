//! Error types for backend adapters.

use thiserror::Error;

use crate::capability::Capability;

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors raised by backend adapters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Network, timeout, auth or non-success status. Never retried here.
    #[error("backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    /// The adapter does not implement the requested operation.
    #[error("backend {backend} does not support {capability}")]
    CapabilityNotSupported {
        backend: String,
        capability: Capability,
    },

    /// The payload did not match the expected structure.
    #[error("malformed response from {backend}: {reason}")]
    MalformedResponse { backend: String, reason: String },
}

impl BackendError {
    pub fn unavailable(backend: &str, reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(backend: &str, capability: Capability) -> Self {
        Self::CapabilityNotSupported {
            backend: backend.to_string(),
            capability,
        }
    }

    pub fn malformed(backend: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify a transport-level failure.
    pub fn transport(backend: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            format!("request failed: {err}")
        };
        Self::unavailable(backend, reason)
    }
}
