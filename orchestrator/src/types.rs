//! Typed inputs and outputs of orchestrator tasks.
//!
//! Field names serialize in camelCase, the shape models are prompted to
//! produce and web callers send.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storefront_retrieval::{Metadata, MetadataValue, RankedCandidate, SimilarityFilter};

/// Input for product description generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub price: f64,
}

/// What a shopper is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    ProductSearch,
    Comparison,
    Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Structured reading of a natural-language search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIntent {
    pub intent: QueryIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Inclusive `(min, max)`; normalized so `min <= max`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<(f64, f64)>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// A catalog product as seen by the AI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

impl Product {
    /// Text embedded when indexing the product.
    pub fn embedding_text(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => format!("{}\n{description}", self.name),
            _ => self.name.clone(),
        }
    }

    /// Metadata stored next to the product vector.
    pub fn index_metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("productId".to_string(), self.id.clone().into());
        metadata.insert("categoryId".to_string(), self.category_id.clone().into());
        metadata.insert("price".to_string(), self.price.into());
        metadata.insert("name".to_string(), self.name.clone().into());
        metadata.insert(
            "description".to_string(),
            self.description.clone().unwrap_or_default().into(),
        );
        metadata
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProsCons {
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

/// Side-by-side comparison of several products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductComparison {
    pub summary: String,
    /// Label (e.g. "value", "quality") to product name.
    #[serde(default)]
    pub best_for: BTreeMap<String, String>,
    /// Product id to its pros and cons.
    #[serde(default, rename = "pros_cons")]
    pub pros_cons: BTreeMap<String, ProsCons>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age_group: String,
    #[serde(default)]
    pub interests: Vec<String>,
    pub average_purchase_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsingHistory {
    pub product_name: String,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product_id: String,
    #[serde(default)]
    pub reason: String,
    /// Clamped to `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedRecommendation {
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub insights: String,
    #[serde(default)]
    pub next_purchase_prediction: String,
}

/// A generated end-to-end test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub description: String,
    pub instructions: String,
    pub expected_element: String,
}

/// Optional constraints for semantic product search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    /// Inclusive `(min, max)` price bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<(f64, f64)>,
}

impl ProductFilters {
    pub fn to_similarity_filter(&self) -> Option<SimilarityFilter> {
        let mut filter = SimilarityFilter::new();
        if let Some(category) = &self.category_id {
            filter = filter.eq("categoryId", category.as_str());
        }
        if let Some((min, max)) = self.price_range {
            filter = filter.range("price", Some(min), Some(max));
        }
        (!filter.is_empty()).then_some(filter)
    }
}

/// A product returned by semantic search, rebuilt from index metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMatch {
    pub id: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl From<RankedCandidate> for ProductMatch {
    fn from(candidate: RankedCandidate) -> Self {
        let text = |field: &str| {
            candidate
                .metadata
                .get(field)
                .and_then(MetadataValue::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            id: text("productId").unwrap_or_else(|| candidate.id.clone()),
            score: candidate.score,
            name: text("name"),
            description: text("description"),
            price: candidate.metadata.get("price").and_then(MetadataValue::as_f64),
            category_id: text("categoryId"),
        }
    }
}
