//! Configuration for the AI layer.

use std::path::Path;

use serde::{Deserialize, Serialize};
use storefront_backends::{AnthropicConfig, OpenAiConfig};
use storefront_retrieval::{IndexBackendConfig, IndexConfig};
use tracing::debug;

use crate::error::{AiError, Result};
use crate::router::RoutingTable;

/// Top-level configuration: backends, routing and the vector index.
///
/// Every section is optional in TOML and falls back to its defaults. A
/// `[routing]` section replaces the default table wholesale, so it must
/// route every task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub openai: OpenAiConfig,
    pub anthropic: AnthropicConfig,
    pub routing: RoutingTable,
    pub index: IndexConfig,
}

impl AiConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AiError::Config(format!("invalid config: {e}")))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AiError::Config(format!("failed to read {}: {e}", path.display())))?;
        debug!("Loaded AI config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Fill unset secrets from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Fill unset secrets from `lookup`; explicit config values win.
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.openai.api_key.is_none() {
            self.openai.api_key = lookup("OPENAI_API_KEY");
        }
        if self.openai.organization.is_none() {
            self.openai.organization = lookup("OPENAI_ORG_ID");
        }
        if self.anthropic.api_key.is_none() {
            self.anthropic.api_key = lookup("ANTHROPIC_API_KEY");
        }
        if let IndexBackendConfig::Pinecone { api_key, .. } = &mut self.index.backend {
            if api_key.is_none() {
                *api_key = lookup("PINECONE_API_KEY");
            }
        }
        self
    }
}
