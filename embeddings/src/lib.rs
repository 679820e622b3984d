//! # Embeddings
//!
//! Vector primitives shared by the storefront retrieval stack.
//!
//! ## Features
//!
//! - **Embedding vectors**: fixed-length dense `f32` vectors
//! - **Scalar metadata**: string/number fields attached to indexed items
//! - **Similarity ranking**: cosine similarity with a total, reproducible order
//! - **In-memory index**: a replace-on-upsert store used by the local index backend
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings Primitives                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Embedding + Metadata ──► IndexEntry ──► SimilarityIndex        │
//! │                                              │                  │
//! │                                              ▼                  │
//! │                                  cosine_similarity / rank_order │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod index;
pub mod metadata;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use index::{IndexEntry, SimilarityIndex};
pub use metadata::{Metadata, MetadataValue};
pub use similarity::{SimilarityResult, cosine_similarity, normalize, rank_order, sort_ranked};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of product embeddings (text-embedding-3-large reduced to 1536).
pub const DEFAULT_DIMENSION: usize = 1536;
