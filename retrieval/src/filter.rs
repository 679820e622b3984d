//! Metadata filters for similarity queries.
//!
//! A [`SimilarityFilter`] is a conjunction of predicates over declared metadata
//! fields. Filters are applied before top-K selection: a query returns the K
//! best entries *among those that match*, never a filtered subset of the
//! unfiltered top K.

use serde::{Deserialize, Serialize};
use storefront_embeddings::{Metadata, MetadataValue};

use crate::error::{Result, RetrievalError};
use crate::schema::{FieldKind, MetadataSchema};

/// A single predicate over one metadata field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterPredicate {
    /// Field equals the given scalar.
    Eq { field: String, value: MetadataValue },

    /// Numeric field lies within the inclusive bounds. A missing bound is open.
    Range {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl FilterPredicate {
    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. } | Self::Range { field, .. } => field,
        }
    }

    /// Entries missing the field never match.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        match self {
            Self::Eq { field, value } => metadata.get(field) == Some(value),
            Self::Range { field, min, max } => {
                let Some(actual) = metadata.get(field).and_then(MetadataValue::as_f64) else {
                    return false;
                };
                min.is_none_or(|lo| actual >= lo) && max.is_none_or(|hi| actual <= hi)
            }
        }
    }

    fn validate(&self, schema: &MetadataSchema) -> Result<()> {
        let field = self.field();
        let Some(kind) = schema.kind_of(field) else {
            return Err(RetrievalError::InvalidFilter(format!(
                "field {field:?} is not declared as filterable"
            )));
        };

        match self {
            Self::Eq { value, .. } => {
                if !kind.accepts(value) {
                    return Err(RetrievalError::InvalidFilter(format!(
                        "field {field:?} is {}, cannot compare with {} {value}",
                        kind.as_str(),
                        value.kind()
                    )));
                }
            }
            Self::Range { min, max, .. } => {
                if kind != FieldKind::Number {
                    return Err(RetrievalError::InvalidFilter(format!(
                        "range on non-numeric field {field:?}"
                    )));
                }
                if min.is_none() && max.is_none() {
                    return Err(RetrievalError::InvalidFilter(format!(
                        "range on {field:?} has no bounds"
                    )));
                }
                if min.iter().chain(max.iter()).any(|b| !b.is_finite()) {
                    return Err(RetrievalError::InvalidFilter(format!(
                        "range on {field:?} has a non-finite bound"
                    )));
                }
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(RetrievalError::InvalidFilter(format!(
                            "range on {field:?} has min {lo} greater than max {hi}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Conjunction of [`FilterPredicate`]s. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityFilter {
    pub predicates: Vec<FilterPredicate>,
}

impl SimilarityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.predicates.push(FilterPredicate::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Require `min <= field <= max`, either bound optional.
    pub fn range(mut self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        self.predicates.push(FilterPredicate::Range {
            field: field.into(),
            min,
            max,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.predicates.iter().all(|p| p.matches(metadata))
    }

    /// Check every predicate against the declared schema.
    pub fn validate(&self, schema: &MetadataSchema) -> Result<()> {
        self.predicates.iter().try_for_each(|p| p.validate(schema))
    }
}
