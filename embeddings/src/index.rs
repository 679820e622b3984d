//! In-memory similarity index with replace-on-upsert semantics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::metadata::Metadata;
use crate::similarity::{SimilarityResult, cosine_similarity, normalize, sort_ranked};

/// An entry in the similarity index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique identifier.
    pub id: String,

    /// The embedding vector (normalized).
    pub embedding: Embedding,

    /// Associated metadata.
    pub metadata: Metadata,
}

/// A similarity index for exact vector lookups.
///
/// Entries are keyed by id; writing an id again replaces the whole entry,
/// metadata included. Search is an exhaustive cosine scan, so results are
/// exact and ordered by [`crate::rank_order`].
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    /// Stored entries.
    entries: HashMap<String, IndexEntry>,

    /// Expected dimension of embeddings.
    dimension: usize,
}

impl SimilarityIndex {
    /// Create a new similarity index.
    pub fn new(dimension: usize) -> Self {
        Self {
            entries: HashMap::new(),
            dimension,
        }
    }

    /// The configured dimensionality.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Insert or fully replace the entry for `id`.
    ///
    /// Returns the previous entry, if one existed.
    pub fn upsert(
        &mut self,
        id: impl Into<String>,
        mut embedding: Embedding,
        metadata: Metadata,
    ) -> Result<Option<IndexEntry>> {
        let id = id.into();

        if id.is_empty() {
            return Err(EmbeddingError::InvalidIdentifier(id));
        }
        self.check_dimension(&embedding)?;

        normalize(&mut embedding);

        let entry = IndexEntry {
            id: id.clone(),
            embedding,
            metadata,
        };

        let previous = self.entries.insert(id.clone(), entry);
        debug!(replaced = previous.is_some(), "Upserted embedding into index: {id}");

        Ok(previous)
    }

    /// Get an entry by ID.
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// Check if an ID exists in the index.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Search for the `k` most similar entries among those accepted by `eligible`.
    ///
    /// The predicate narrows the candidate pool before ranking, so a filtered
    /// search still returns up to `k` results when enough entries qualify.
    pub fn search<F>(&self, query: &[f32], k: usize, eligible: F) -> Result<Vec<SimilarityResult>>
    where
        F: Fn(&Metadata) -> bool,
    {
        self.check_dimension(query)?;

        let mut results = Vec::new();
        for entry in self.entries.values().filter(|e| eligible(&e.metadata)) {
            let score = cosine_similarity(query, &entry.embedding)?;
            results.push(SimilarityResult::new(
                entry.id.clone(),
                score,
                entry.metadata.clone(),
            ));
        }

        sort_ranked(&mut results);
        results.truncate(k);

        Ok(results)
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}
