//! Text-to-vector conversion through the routed embedding adapter.

use std::sync::Arc;

use storefront_backends::BackendAdapter;
use storefront_embeddings::Embedding;
use tracing::{debug, info};

use crate::error::{AiError, Result};
use crate::router::TaskRouter;
use crate::task::TaskKind;

/// Embeds text with the adapter routed for [`TaskKind::EmbeddingGeneration`].
///
/// The adapter's declared output dimensionality is checked against the
/// index dimensionality once, at construction.
#[derive(Clone)]
pub struct EmbeddingPipeline {
    adapter: Arc<dyn BackendAdapter>,
    dimension: usize,
}

impl EmbeddingPipeline {
    pub fn new(router: &TaskRouter, dimension: usize) -> Result<Self> {
        let adapter = Arc::clone(router.route(TaskKind::EmbeddingGeneration));

        match adapter.embedding_dimension() {
            Some(declared) if declared == dimension => {}
            Some(declared) => {
                return Err(AiError::DimensionMismatch {
                    expected: dimension,
                    actual: declared,
                });
            }
            None => {
                return Err(AiError::Config(format!(
                    "embedding backend {} does not declare an output dimension",
                    adapter.name()
                )));
            }
        }

        info!(backend = adapter.name(), dimension, "Initialized embedding pipeline");
        Ok(Self { adapter, dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn backend(&self) -> &str {
        self.adapter.name()
    }

    pub async fn embed(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(AiError::InvalidInput("cannot embed empty text".to_string()));
        }

        let embedding = self.adapter.embed(text).await?;
        if embedding.len() != self.dimension {
            return Err(AiError::malformed(
                self.adapter.name(),
                format!(
                    "embedding has {} dimensions, declared {}",
                    embedding.len(),
                    self.dimension
                ),
            ));
        }

        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(AiError::malformed(
                self.adapter.name(),
                "embedding contains non-finite components",
            ));
        }

        debug!("Embedded {} chars via {}", text.len(), self.adapter.name());
        Ok(embedding)
    }
}
