//! Anthropic Messages API adapter (text and structured JSON, no embeddings).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adapter::{BackendAdapter, GenerationOptions, Prompt};
use crate::capability::Capability;
use crate::error::{BackendError, Result};
use crate::json::parse_json_payload;

const CAPABILITIES: &[Capability] = &[Capability::TextGeneration, Capability::StructuredJson];

/// Configuration for [`AnthropicAdapter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Value of the `anthropic-version` header.
    pub api_version: String,
    pub model: String,
    /// Used when the caller does not set `max_tokens`; the API requires one.
    pub default_max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: None,
            api_version: "2023-06-01".to_string(),
            model: "claude-3-sonnet-20240229".to_string(),
            default_max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

/// Adapter for the Anthropic Messages API.
pub struct AnthropicAdapter {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicAdapter {
    pub const NAME: &'static str = "anthropic";

    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::unavailable(Self::NAME, format!("failed to build HTTP client: {e}")))?;

        info!(model = %config.model, "Initialized Anthropic adapter");

        Ok(Self { config, client })
    }

    async fn messages(&self, prompt: &Prompt, options: &GenerationOptions) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::unavailable(Self::NAME, "API key not configured"))?;

        let model = options.model.as_deref().unwrap_or(&self.config.model);
        let request = MessagesRequest {
            model,
            max_tokens: options.max_tokens.unwrap_or(self.config.default_max_tokens),
            temperature: options.temperature,
            system: prompt.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &prompt.user,
            }],
        };

        debug!(model = %model, "Requesting message completion");

        let mut builder = self
            .client
            .post(format!("{}/v1/messages", self.config.base_url.trim_end_matches('/')))
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&request);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::transport(Self::NAME, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::transport(Self::NAME, &e))?;

        if !status.is_success() {
            return Err(BackendError::unavailable(
                Self::NAME,
                format!("API error ({status}): {body}"),
            ));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::malformed(Self::NAME, format!("unexpected messages response: {e}")))?;

        parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| BackendError::malformed(Self::NAME, "no text block in response"))
    }
}

#[async_trait]
impl BackendAdapter for AnthropicAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn capabilities(&self) -> &[Capability] {
        CAPABILITIES
    }

    async fn generate_text(&self, prompt: &Prompt, options: &GenerationOptions) -> Result<String> {
        self.messages(prompt, options).await
    }

    async fn generate_structured(
        &self,
        prompt: &Prompt,
        schema_hint: &str,
        options: &GenerationOptions,
    ) -> Result<serde_json::Value> {
        let prompt = Prompt {
            system: prompt.system.clone(),
            user: format!(
                "{}\n\nProvide the result as JSON only, with no surrounding prose, in this shape:\n{schema_hint}",
                prompt.user
            ),
        };

        let text = self.messages(&prompt, options).await?;
        parse_json_payload(Self::NAME, &text)
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}
