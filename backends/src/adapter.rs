//! The backend adapter contract.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_embeddings::Embedding;

use crate::capability::Capability;
use crate::error::{BackendError, Result};

/// A templated prompt handed to an adapter.
///
/// Prompts are always built by the caller from typed inputs; adapters only
/// translate them into their wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Optional system/instruction message.
    pub system: Option<String>,

    /// The user message.
    pub user: String,
}

impl Prompt {
    /// Create a prompt with only a user message.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    /// Set the system message.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Per-call generation options. Unset fields fall back to adapter defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model override.
    pub model: Option<String>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,

    /// Request timeout; the adapter's configured timeout applies otherwise.
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A model backend that implements some subset of [`Capability`].
///
/// Adapters are constructed once at startup, own their HTTP client, and are
/// shared behind `Arc` for the process lifetime. Every operation is a single
/// outbound request with no local caching and no retries.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Stable adapter name used by routing tables.
    fn name(&self) -> &str;

    /// The fixed set of capabilities this adapter implements.
    fn capabilities(&self) -> &[Capability];

    /// Whether this adapter implements `capability`.
    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Length of vectors returned by [`BackendAdapter::embed`], if embedding is supported.
    fn embedding_dimension(&self) -> Option<usize> {
        None
    }

    /// Generate free-form text.
    async fn generate_text(&self, _prompt: &Prompt, _options: &GenerationOptions) -> Result<String> {
        Err(BackendError::unsupported(
            self.name(),
            Capability::TextGeneration,
        ))
    }

    /// Generate a response that must parse as JSON.
    ///
    /// `schema_hint` describes the expected JSON shape to the model. Text that
    /// does not parse yields [`BackendError::MalformedResponse`].
    async fn generate_structured(
        &self,
        _prompt: &Prompt,
        _schema_hint: &str,
        _options: &GenerationOptions,
    ) -> Result<serde_json::Value> {
        Err(BackendError::unsupported(
            self.name(),
            Capability::StructuredJson,
        ))
    }

    /// Embed `text` into a vector of [`BackendAdapter::embedding_dimension`] floats.
    async fn embed(&self, _text: &str) -> Result<Embedding> {
        Err(BackendError::unsupported(self.name(), Capability::Embedding))
    }
}
