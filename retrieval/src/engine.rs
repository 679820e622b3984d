//! Vector retrieval engine implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use storefront_embeddings::{Embedding, IndexEntry, Metadata, sort_ranked};
use tracing::{debug, info, warn};

use crate::config::{IndexBackendConfig, IndexConfig};
use crate::error::{Result, RetrievalError};
use crate::filter::SimilarityFilter;
use crate::index::{RankedCandidate, VectorIndex};
use crate::memory::MemoryIndex;
use crate::pinecone::PineconeIndex;
use crate::schema::MetadataSchema;

/// Validates input against the index contract and delegates storage to a
/// [`VectorIndex`].
///
/// The engine owns the query semantics regardless of backend:
/// - vectors must have the configured dimensionality and finite components,
///   checked before any call
/// - filters are equality and inclusive range over declared fields, conjunctive
/// - results are filtered, ordered by score descending then id ascending, and
///   truncated to `top_k`
/// - every index round trip is bounded by a timeout
#[derive(Clone)]
pub struct VectorRetrievalEngine {
    index: Arc<dyn VectorIndex>,
    dimension: usize,
    namespace: String,
    schema: MetadataSchema,
    default_top_k: usize,
    timeout: Duration,
}

impl VectorRetrievalEngine {
    /// Create an engine over an existing index implementation.
    pub fn new(config: &IndexConfig, index: Arc<dyn VectorIndex>) -> Self {
        info!(
            backend = index.name(),
            dimension = config.dimension,
            namespace = %config.namespace,
            "Initialized vector retrieval engine"
        );

        Self {
            index,
            dimension: config.dimension,
            namespace: config.namespace.clone(),
            schema: config.schema.clone(),
            default_top_k: config.default_top_k,
            timeout: config.timeout(),
        }
    }

    /// Build the configured index backend and wrap it.
    pub fn from_config(config: IndexConfig) -> Result<Self> {
        if config.dimension == 0 {
            return Err(RetrievalError::Config("index dimension must be positive".to_string()));
        }
        if config.default_top_k == 0 {
            return Err(RetrievalError::Config("default_top_k must be positive".to_string()));
        }

        let index: Arc<dyn VectorIndex> = match &config.backend {
            IndexBackendConfig::Memory => Arc::new(MemoryIndex::new(config.dimension)),
            IndexBackendConfig::Pinecone { host, api_key } => Arc::new(PineconeIndex::new(
                host.clone(),
                api_key.clone(),
                config.timeout(),
            )?),
        };

        Ok(Self::new(&config, index))
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn schema(&self) -> &MetadataSchema {
        &self.schema
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    pub fn index_name(&self) -> &str {
        self.index.name()
    }

    /// Insert or fully replace the entry for `id`.
    pub async fn upsert(&self, id: &str, vector: Embedding, metadata: Metadata) -> Result<()> {
        if id.is_empty() {
            return Err(RetrievalError::InvalidIdentifier(id.to_string()));
        }
        self.check_vector(&vector)?;
        self.schema.check_metadata(&metadata)?;

        let entry = IndexEntry {
            id: id.to_string(),
            embedding: vector,
            metadata,
        };

        self.bounded(self.timeout, self.index.upsert(&self.namespace, entry))
            .await?;
        debug!("Upserted {id} into {}", self.namespace);
        Ok(())
    }

    /// Top-K similarity query bounded by the configured timeout.
    pub async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&SimilarityFilter>,
    ) -> Result<Vec<RankedCandidate>> {
        self.query_with_timeout(vector, top_k, filter, self.timeout)
            .await
    }

    /// [`Self::query`] with the configured default top-K.
    pub async fn query_default(
        &self,
        vector: &[f32],
        filter: Option<&SimilarityFilter>,
    ) -> Result<Vec<RankedCandidate>> {
        self.query(vector, self.default_top_k, filter).await
    }

    /// Top-K similarity query bounded by a caller-supplied timeout.
    pub async fn query_with_timeout(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&SimilarityFilter>,
        timeout: Duration,
    ) -> Result<Vec<RankedCandidate>> {
        if top_k == 0 {
            return Err(RetrievalError::InvalidTopK);
        }
        self.check_vector(vector)?;
        if let Some(filter) = filter {
            filter.validate(&self.schema)?;
        }

        let mut candidates = self
            .bounded(
                timeout,
                self.index.query(&self.namespace, vector, top_k, filter),
            )
            .await?;

        if let Some(filter) = filter {
            let before = candidates.len();
            candidates.retain(|c| filter.matches(&c.metadata));
            if candidates.len() != before {
                warn!(
                    backend = self.index.name(),
                    dropped = before - candidates.len(),
                    "Index returned candidates outside the filter"
                );
            }
        }
        sort_ranked(&mut candidates);
        candidates.truncate(top_k);

        debug!("Query returned {} candidates", candidates.len());
        Ok(candidates)
    }

    fn check_vector(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if let Some((index, &value)) = vector.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RetrievalError::InvalidVector { index, value });
        }
        Ok(())
    }

    async fn bounded<T>(&self, timeout: Duration, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(RetrievalError::unavailable(
                self.index.name(),
                format!("no response within {}ms", timeout.as_millis()),
            )),
        }
    }
}
