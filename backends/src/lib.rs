//! # Backends
//!
//! Uniform, capability-typed adapters over remote model services.
//!
//! Each adapter declares the [`Capability`] set it supports and implements
//! only the matching operations of [`BackendAdapter`]; the remaining
//! operations fail with [`BackendError::CapabilityNotSupported`]. Request and
//! response shapes of the underlying vendor API never leave the adapter.
//!
//! | Adapter | Text | Structured JSON | Embedding |
//! |---|---|---|---|
//! | [`OpenAiAdapter`] | yes | yes | yes |
//! | [`AnthropicAdapter`] | yes | yes | no |

pub mod adapter;
pub mod anthropic;
pub mod capability;
pub mod error;
pub mod json;
pub mod openai;

pub use adapter::{BackendAdapter, GenerationOptions, Prompt};
pub use anthropic::{AnthropicAdapter, AnthropicConfig};
pub use capability::Capability;
pub use error::{BackendError, Result};
pub use openai::{OpenAiAdapter, OpenAiConfig};
