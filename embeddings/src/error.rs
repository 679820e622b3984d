//! Error types for the embeddings primitives.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur when working with embeddings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Entry identifiers must be non-empty.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}
