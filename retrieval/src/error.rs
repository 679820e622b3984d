//! Error types for the vector retrieval engine.

use storefront_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    /// The underlying index could not be reached or did not answer in time.
    #[error("index {backend} unavailable: {reason}")]
    IndexUnavailable { backend: String, reason: String },

    /// Vector length differs from the index dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A filter references a field or range the schema does not allow.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A vector component is NaN or infinite.
    #[error("invalid vector: component {index} is {value}")]
    InvalidVector { index: usize, value: f32 },

    /// A declared metadata field carries the wrong scalar kind.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// Entry identifiers must be non-empty.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Queries must ask for at least one candidate.
    #[error("top_k must be at least 1")]
    InvalidTopK,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RetrievalError {
    pub fn unavailable(backend: &str, reason: impl Into<String>) -> Self {
        Self::IndexUnavailable {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<EmbeddingError> for RetrievalError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::DimensionMismatch { expected, actual } => {
                Self::DimensionMismatch { expected, actual }
            }
            EmbeddingError::InvalidIdentifier(id) => Self::InvalidIdentifier(id),
        }
    }
}
