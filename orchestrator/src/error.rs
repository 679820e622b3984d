//! Error taxonomy surfaced to orchestrator callers.

use storefront_backends::{BackendError, Capability};
use storefront_retrieval::RetrievalError;
use thiserror::Error;

/// Result type alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, AiError>;

/// Errors returned by the orchestrator.
///
/// Adapter and index errors are re-wrapped into these kinds; callers never
/// see backend-specific error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiError {
    #[error("backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    /// Raised at startup when a route points at an adapter lacking the capability.
    #[error("backend {backend} does not support {capability}")]
    CapabilityNotSupported {
        backend: String,
        capability: Capability,
    },

    #[error("malformed response from {backend}: {reason}")]
    MalformedResponse { backend: String, reason: String },

    #[error("index {backend} unavailable: {reason}")]
    IndexUnavailable { backend: String, reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Incomplete routing table or unknown backend name.
    #[error("routing error: {0}")]
    Routing(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Empty or otherwise unusable task payload.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AiError {
    pub fn malformed(backend: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<BackendError> for AiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::BackendUnavailable { backend, reason } => {
                Self::BackendUnavailable { backend, reason }
            }
            BackendError::CapabilityNotSupported {
                backend,
                capability,
            } => Self::CapabilityNotSupported {
                backend,
                capability,
            },
            BackendError::MalformedResponse { backend, reason } => {
                Self::MalformedResponse { backend, reason }
            }
        }
    }
}

impl From<RetrievalError> for AiError {
    fn from(err: RetrievalError) -> Self {
        match err {
            RetrievalError::IndexUnavailable { backend, reason } => {
                Self::IndexUnavailable { backend, reason }
            }
            RetrievalError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            RetrievalError::InvalidFilter(reason) => Self::InvalidFilter(reason),
            err @ RetrievalError::InvalidVector { .. } => Self::InvalidInput(err.to_string()),
            RetrievalError::InvalidMetadata(reason) => Self::InvalidInput(reason),
            RetrievalError::InvalidIdentifier(id) => {
                Self::InvalidInput(format!("invalid identifier {id:?}"))
            }
            RetrievalError::InvalidTopK => Self::InvalidInput("top_k must be at least 1".to_string()),
            RetrievalError::Config(reason) => Self::Config(reason),
        }
    }
}
