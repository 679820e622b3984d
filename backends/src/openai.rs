//! OpenAI-compatible adapter: chat completions and embeddings.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_embeddings::{DEFAULT_DIMENSION, Embedding};
use tracing::{debug, info};

use crate::adapter::{BackendAdapter, GenerationOptions, Prompt};
use crate::capability::Capability;
use crate::error::{BackendError, Result};
use crate::json::parse_json_payload;

const CAPABILITIES: &[Capability] = &[
    Capability::TextGeneration,
    Capability::StructuredJson,
    Capability::Embedding,
];

/// Configuration for [`OpenAiAdapter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API base URL, including the version prefix.
    pub base_url: String,

    /// API key. Requests fail with `BackendUnavailable` when unset.
    pub api_key: Option<String>,

    /// Optional organization header.
    pub organization: Option<String>,

    /// Default chat completion model.
    pub chat_model: String,

    /// Embedding model.
    pub embedding_model: String,

    /// Requested (and enforced) embedding dimensionality.
    pub embedding_dimension: usize,

    /// Default request timeout.
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            organization: None,
            chat_model: "gpt-4-turbo-preview".to_string(),
            embedding_model: "text-embedding-3-large".to_string(),
            embedding_dimension: DEFAULT_DIMENSION,
            timeout_secs: 30,
        }
    }
}

/// Adapter for the OpenAI chat completions and embeddings APIs.
pub struct OpenAiAdapter {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiAdapter {
    pub const NAME: &'static str = "openai";

    /// Create a new adapter with its own HTTP client.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::unavailable(Self::NAME, format!("failed to build HTTP client: {e}")))?;

        info!(
            model = %config.chat_model,
            embedding_model = %config.embedding_model,
            dimension = config.embedding_dimension,
            "Initialized OpenAI adapter"
        );

        Ok(Self { config, client })
    }

    fn post(&self, path: &str, timeout: Option<Duration>) -> Result<reqwest::RequestBuilder> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::unavailable(Self::NAME, "API key not configured"))?;

        let mut request = self
            .client
            .post(format!("{}/{path}", self.config.base_url.trim_end_matches('/')))
            .bearer_auth(api_key);

        if let Some(org) = &self.config.organization {
            request = request.header("OpenAI-Organization", org);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        timeout: Option<Duration>,
    ) -> Result<String> {
        let response = self
            .post(path, timeout)?
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::transport(Self::NAME, &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::transport(Self::NAME, &e))?;

        if !status.is_success() {
            return Err(BackendError::unavailable(
                Self::NAME,
                format!("API error ({status}): {text}"),
            ));
        }

        Ok(text)
    }

    async fn chat(&self, prompt: &Prompt, options: &GenerationOptions, json_mode: bool) -> Result<String> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.config.chat_model.clone());

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        let request = ChatRequest {
            model: &model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: json_mode.then_some(ResponseFormat { kind: "json_object" }),
        };

        debug!(model = %model, json_mode, "Requesting chat completion");

        let body = self.send("chat/completions", &request, options.timeout).await?;
        let response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::malformed(Self::NAME, format!("unexpected chat response: {e}")))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::malformed(Self::NAME, "no message content in response"))
    }
}

#[async_trait]
impl BackendAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }

    fn embedding_dimension(&self) -> Option<usize> {
        Some(self.config.embedding_dimension)
    }

    async fn generate_text(&self, prompt: &Prompt, options: &GenerationOptions) -> Result<String> {
        self.chat(prompt, options, false).await
    }

    async fn generate_structured(
        &self,
        prompt: &Prompt,
        schema_hint: &str,
        options: &GenerationOptions,
    ) -> Result<serde_json::Value> {
        // JSON mode requires the word "JSON" somewhere in the messages.
        let system = match &prompt.system {
            Some(system) => format!("{system}\n\nRespond with JSON only, shaped like:\n{schema_hint}"),
            None => format!("Respond with JSON only, shaped like:\n{schema_hint}"),
        };
        let prompt = Prompt {
            system: Some(system),
            user: prompt.user.clone(),
        };

        let text = self.chat(&prompt, options, true).await?;
        parse_json_payload(Self::NAME, &text)
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: text,
            dimensions: self.config.embedding_dimension,
        };

        debug!(model = %self.config.embedding_model, chars = text.len(), "Requesting embedding");

        let body = self.send("embeddings", &request, None).await?;
        let response: EmbeddingResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::malformed(Self::NAME, format!("unexpected embedding response: {e}")))?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| BackendError::malformed(Self::NAME, "no embedding in response"))?;

        if embedding.len() != self.config.embedding_dimension {
            return Err(BackendError::malformed(
                Self::NAME,
                format!(
                    "embedding has {} dimensions, expected {}",
                    embedding.len(),
                    self.config.embedding_dimension
                ),
            ));
        }

        Ok(embedding)
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
