//! Scripted in-process backend used by the orchestrator tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use storefront_backends::{BackendAdapter, BackendError, Capability, GenerationOptions, Prompt};
use storefront_embeddings::Embedding;
use storefront_orchestrator::{Orchestrator, RoutingTable, TaskRouter};
use storefront_retrieval::{IndexConfig, VectorRetrievalEngine};

pub type EmbedFn = fn(&str) -> Embedding;

/// A backend whose answers are fixed up front and whose calls are recorded.
pub struct ScriptedAdapter {
    pub name: &'static str,
    pub capabilities: Vec<Capability>,
    pub dimension: Option<usize>,
    pub text: std::result::Result<String, BackendError>,
    pub structured: std::result::Result<Value, BackendError>,
    pub embed: EmbedFn,
    pub calls: Mutex<Vec<(Prompt, GenerationOptions)>>,
}

fn no_embedding(_: &str) -> Embedding {
    Vec::new()
}

impl ScriptedAdapter {
    pub fn openai(dimension: usize) -> Self {
        Self {
            name: "openai",
            capabilities: Capability::ALL.to_vec(),
            dimension: Some(dimension),
            text: Ok(String::new()),
            structured: Ok(Value::Null),
            embed: no_embedding,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn anthropic() -> Self {
        Self {
            name: "anthropic",
            capabilities: vec![Capability::TextGeneration, Capability::StructuredJson],
            dimension: None,
            text: Ok(String::new()),
            structured: Ok(Value::Null),
            embed: no_embedding,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(mut self, text: std::result::Result<String, BackendError>) -> Self {
        self.text = text;
        self
    }

    pub fn with_structured(mut self, value: std::result::Result<Value, BackendError>) -> Self {
        self.structured = value;
        self
    }

    pub fn with_embed(mut self, embed: EmbedFn) -> Self {
        self.embed = embed;
        self
    }

    pub fn calls(&self) -> Vec<(Prompt, GenerationOptions)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, prompt: &Prompt, options: &GenerationOptions) {
        self.calls.lock().unwrap().push((prompt.clone(), options.clone()));
    }
}

#[async_trait]
impl BackendAdapter for ScriptedAdapter {
    fn name(&self) -> &str {
        self.name
    }

    fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    fn embedding_dimension(&self) -> Option<usize> {
        self.dimension
    }

    async fn generate_text(
        &self,
        prompt: &Prompt,
        options: &GenerationOptions,
    ) -> storefront_backends::Result<String> {
        self.record(prompt, options);
        self.text.clone()
    }

    async fn generate_structured(
        &self,
        prompt: &Prompt,
        _schema_hint: &str,
        options: &GenerationOptions,
    ) -> storefront_backends::Result<Value> {
        self.record(prompt, options);
        self.structured.clone()
    }

    async fn embed(&self, text: &str) -> storefront_backends::Result<Embedding> {
        if !self.capabilities.contains(&Capability::Embedding) {
            return Err(BackendError::unsupported(self.name, Capability::Embedding));
        }
        Ok((self.embed)(text))
    }
}

/// Default routing over the two scripted backends and an in-memory index.
pub fn orchestrator(
    openai: &Arc<ScriptedAdapter>,
    anthropic: &Arc<ScriptedAdapter>,
    dimension: usize,
) -> storefront_orchestrator::Result<Orchestrator> {
    let adapters: Vec<Arc<dyn BackendAdapter>> = vec![openai.clone(), anthropic.clone()];
    let router = TaskRouter::new(&RoutingTable::default(), &adapters)?;
    let engine = VectorRetrievalEngine::from_config(IndexConfig::new(dimension))?;
    Orchestrator::new(router, engine)
}
