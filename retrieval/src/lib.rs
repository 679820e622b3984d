//! # Retrieval Engine
//!
//! This crate maintains a similarity index of catalog items and answers
//! top-K similarity queries with optional metadata filters.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Vector Retrieval Engine                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   upsert(id, vector, metadata)      query(vector, k, filter)    │
//! │            │                                 │                  │
//! │            ▼                                 ▼                  │
//! │   dimension + schema checks     dimension + filter validation   │
//! │            │                                 │                  │
//! │            └───────────────┬─────────────────┘                  │
//! │                            ▼                                    │
//! │                ┌──────────────────────┐                         │
//! │                │  dyn VectorIndex     │  (bounded by timeout)   │
//! │                │  memory | pinecone   │                         │
//! │                └──────────────────────┘                         │
//! │                            │                                    │
//! │                            ▼                                    │
//! │        re-filter, rank (score desc, id asc), truncate to k      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_retrieval::{IndexConfig, SimilarityFilter, VectorRetrievalEngine};
//!
//! let engine = VectorRetrievalEngine::from_config(IndexConfig::default())?;
//! let filter = SimilarityFilter::new().eq("categoryId", "shoes");
//! let hits = engine.query(&query_vector, 10, Some(&filter)).await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod memory;
pub mod pinecone;
pub mod schema;

pub use config::{IndexBackendConfig, IndexConfig};
pub use engine::VectorRetrievalEngine;
pub use error::{Result, RetrievalError};
pub use filter::{FilterPredicate, SimilarityFilter};
pub use index::{RankedCandidate, VectorIndex};
pub use memory::MemoryIndex;
pub use pinecone::PineconeIndex;
pub use schema::{FieldKind, MetadataSchema};

// Re-export from dependencies for convenience
pub use storefront_embeddings::{Embedding, IndexEntry, Metadata, MetadataValue};
