//! Declared schema of filterable metadata fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storefront_embeddings::{Metadata, MetadataValue};

use crate::error::{Result, RetrievalError};

/// Scalar kind of a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    pub fn accepts(self, value: &MetadataValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::String, MetadataValue::String(_)) | (FieldKind::Number, MetadataValue::Number(_))
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
        }
    }
}

/// The set of metadata fields filters may reference, with their kinds.
///
/// Entries may carry additional, undeclared fields (names, descriptions);
/// those are stored and returned but cannot be filtered on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataSchema {
    fields: BTreeMap<String, FieldKind>,
}

impl MetadataSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema of the product catalog: `categoryId` (string) and `price` (number).
    pub fn products() -> Self {
        Self::new()
            .with_field("categoryId", FieldKind::String)
            .with_field("price", FieldKind::Number)
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.fields.get(field).copied()
    }

    /// Reject metadata whose declared fields carry the wrong scalar kind.
    pub fn check_metadata(&self, metadata: &Metadata) -> Result<()> {
        for (field, value) in metadata {
            if let Some(kind) = self.kind_of(field) {
                if !kind.accepts(value) {
                    return Err(RetrievalError::InvalidMetadata(format!(
                        "field {field:?} is declared as {}, got {}",
                        kind.as_str(),
                        value.kind()
                    )));
                }
            }
        }
        Ok(())
    }
}
