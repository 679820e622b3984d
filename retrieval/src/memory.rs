//! In-process vector index backed by exact cosine search.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use storefront_embeddings::{IndexEntry, SimilarityIndex};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::filter::SimilarityFilter;
use crate::index::{RankedCandidate, VectorIndex};

/// A [`VectorIndex`] that keeps one [`SimilarityIndex`] per namespace in memory.
///
/// Upserts take the write lock, so concurrent writes to the same identifier
/// resolve last-writer-wins and never interleave within one entry.
#[derive(Debug, Clone)]
pub struct MemoryIndex {
    namespaces: Arc<RwLock<HashMap<String, SimilarityIndex>>>,
    dimension: usize,
}

impl MemoryIndex {
    pub const NAME: &'static str = "memory";

    pub fn new(dimension: usize) -> Self {
        Self {
            namespaces: Arc::new(RwLock::new(HashMap::new())),
            dimension,
        }
    }

    /// Number of entries stored in `namespace`.
    pub async fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .await
            .get(namespace)
            .map_or(0, SimilarityIndex::len)
    }

    /// Copy of the entry stored under `id`, if any.
    pub async fn get(&self, namespace: &str, id: &str) -> Option<IndexEntry> {
        self.namespaces
            .read()
            .await
            .get(namespace)
            .and_then(|index| index.get(id).cloned())
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn upsert(&self, namespace: &str, entry: IndexEntry) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        let index = namespaces
            .entry(namespace.to_string())
            .or_insert_with(|| SimilarityIndex::new(self.dimension));
        index.upsert(entry.id, entry.embedding, entry.metadata)?;
        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<&SimilarityFilter>,
    ) -> Result<Vec<RankedCandidate>> {
        let namespaces = self.namespaces.read().await;
        let Some(index) = namespaces.get(namespace) else {
            debug!("Query against empty namespace: {namespace}");
            return Ok(Vec::new());
        };

        let results = index.search(vector, top_k, |metadata| {
            filter.is_none_or(|f| f.matches(metadata))
        })?;
        Ok(results)
    }
}
