//! # Orchestrator
//!
//! Provider-agnostic entry point for the storefront's AI tasks.
//!
//! ```text
//! caller ──► Orchestrator ──► TaskRouter ──► dyn BackendAdapter ──► model API
//!                 │
//!                 └──► EmbeddingPipeline ──► VectorRetrievalEngine ──► index
//! ```
//!
//! Routing is a static [`RoutingTable`] validated when the [`TaskRouter`] is
//! built: every [`TaskKind`] must map to a known adapter that declares the
//! task's required capability, and the embedding adapter's dimensionality
//! must match the index. Misconfiguration is therefore a startup error, not
//! a per-call one.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_orchestrator::{AiConfig, Orchestrator, ProductFilters};
//!
//! let config = AiConfig::load("ai.toml")?.with_env_overrides();
//! let ai = Orchestrator::from_config(config)?;
//!
//! let intent = ai.process_natural_language_query("waterproof hiking boots under 150").await?;
//! let hits = ai
//!     .search_similar_products("waterproof hiking boots", &ProductFilters::default(), None)
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod pipeline;
pub mod prompts;
pub mod router;
pub mod task;
pub mod types;

pub use config::AiConfig;
pub use error::{AiError, Result};
pub use facade::Orchestrator;
pub use pipeline::EmbeddingPipeline;
pub use router::{RoutingTable, TaskRouter};
pub use task::TaskKind;
pub use types::{
    BrowsingHistory, PersonalizedRecommendation, Product, ProductComparison, ProductData,
    ProductFilters, ProductMatch, ProsCons, QueryIntent, Recommendation, SearchIntent, Sentiment,
    TestCase, UserProfile,
};
