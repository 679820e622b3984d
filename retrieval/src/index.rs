//! The storage seam behind the retrieval engine.

use async_trait::async_trait;
use storefront_embeddings::{IndexEntry, SimilarityResult};

use crate::error::Result;
use crate::filter::SimilarityFilter;

/// A ranked query hit: identifier, score (higher is more similar) and the
/// metadata stored with the entry at query time.
pub type RankedCandidate = SimilarityResult;

/// A similarity index the engine can store entries in and query.
///
/// Implementations receive already validated input: the vector has the
/// engine's dimensionality, `top_k` is positive and the filter matches the
/// declared schema. They are expected to honor the filter before top-K
/// selection; the engine still re-checks and re-sorts whatever comes back.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Stable name used in errors and logs.
    fn name(&self) -> &str;

    /// Insert or fully replace `entry` within `namespace`.
    async fn upsert(&self, namespace: &str, entry: IndexEntry) -> Result<()>;

    /// Return up to `top_k` entries of `namespace` most similar to `vector`.
    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<&SimilarityFilter>,
    ) -> Result<Vec<RankedCandidate>>;
}
