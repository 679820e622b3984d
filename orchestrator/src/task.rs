//! The closed set of semantic tasks.

use std::fmt;

use serde::{Deserialize, Serialize};
use storefront_backends::Capability;

/// A task the orchestrator knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    DescriptionGeneration,
    NlQueryParsing,
    ProductComparison,
    PersonalizedRecommendation,
    EmbeddingGeneration,
    TestCaseGeneration,
}

impl TaskKind {
    pub const ALL: [TaskKind; 6] = [
        TaskKind::DescriptionGeneration,
        TaskKind::NlQueryParsing,
        TaskKind::ProductComparison,
        TaskKind::PersonalizedRecommendation,
        TaskKind::EmbeddingGeneration,
        TaskKind::TestCaseGeneration,
    ];

    /// The capability an adapter must declare to serve this task.
    pub fn required_capability(self) -> Capability {
        match self {
            TaskKind::DescriptionGeneration => Capability::TextGeneration,
            TaskKind::EmbeddingGeneration => Capability::Embedding,
            TaskKind::NlQueryParsing
            | TaskKind::ProductComparison
            | TaskKind::PersonalizedRecommendation
            | TaskKind::TestCaseGeneration => Capability::StructuredJson,
        }
    }

    /// Position in [`TaskKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::DescriptionGeneration => "description_generation",
            TaskKind::NlQueryParsing => "nl_query_parsing",
            TaskKind::ProductComparison => "product_comparison",
            TaskKind::PersonalizedRecommendation => "personalized_recommendation",
            TaskKind::EmbeddingGeneration => "embedding_generation",
            TaskKind::TestCaseGeneration => "test_case_generation",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
