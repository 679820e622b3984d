//! Configuration for the vector retrieval engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_embeddings::DEFAULT_DIMENSION;

use crate::schema::MetadataSchema;

/// Configuration for the vector retrieval engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Dimensionality every stored and queried vector must have.
    pub dimension: usize,

    /// Namespace all upserts and queries are scoped to.
    pub namespace: String,

    /// Top-K used when the caller does not supply one.
    pub default_top_k: usize,

    /// Upper bound on a single index round trip.
    pub timeout_ms: u64,

    /// Which index implementation to use.
    pub backend: IndexBackendConfig,

    /// Filterable metadata fields.
    pub schema: MetadataSchema,
}

impl IndexConfig {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    pub fn with_backend(mut self, backend: IndexBackendConfig) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            namespace: "products".to_string(),
            default_top_k: 20,
            timeout_ms: 5000,
            backend: IndexBackendConfig::Memory,
            schema: MetadataSchema::products(),
        }
    }
}

/// Index implementation selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndexBackendConfig {
    /// In-process exact search.
    #[default]
    Memory,

    /// Pinecone-compatible HTTP index.
    Pinecone {
        /// Index host, e.g. `https://products-abc123.svc.us-east1-gcp.pinecone.io`.
        host: String,
        /// API key; falls back to `PINECONE_API_KEY` when loaded through the
        /// orchestrator config.
        #[serde(default)]
        api_key: Option<String>,
    },
}
