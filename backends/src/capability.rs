//! Backend capabilities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A category of operation a backend may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Free-form text completion.
    TextGeneration,
    /// Dense vector embeddings.
    Embedding,
    /// Completions that must parse as JSON.
    StructuredJson,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::TextGeneration,
        Capability::Embedding,
        Capability::StructuredJson,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::TextGeneration => "text_generation",
            Capability::Embedding => "embedding",
            Capability::StructuredJson => "structured_json",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serde_names_match_display() {
        for capability in Capability::ALL {
            let json = serde_json::to_value(capability).unwrap();
            assert_eq!(json, serde_json::Value::String(capability.to_string()));
        }
    }
}
