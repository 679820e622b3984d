//! Pinecone-compatible remote vector index.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use storefront_embeddings::{IndexEntry, Metadata, MetadataValue, SimilarityResult};
use tracing::{debug, info};

use crate::error::{Result, RetrievalError};
use crate::filter::{FilterPredicate, SimilarityFilter};
use crate::index::{RankedCandidate, VectorIndex};

/// A [`VectorIndex`] speaking the Pinecone data-plane REST API.
pub struct PineconeIndex {
    host: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: [WireVector<'a>; 1],
    namespace: &'a str,
}

#[derive(Serialize)]
struct WireVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a Metadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    namespace: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl PineconeIndex {
    pub const NAME: &'static str = "pinecone";

    /// Create a client for the index served at `host`.
    ///
    /// `timeout` bounds each HTTP round trip; the engine applies its own
    /// bound on top.
    pub fn new(host: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RetrievalError::Config(format!("failed to build HTTP client: {e}")))?;

        let host = host.into().trim_end_matches('/').to_string();
        info!("Initialized Pinecone index client for {host}");

        Ok(Self {
            host,
            api_key,
            client,
        })
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<String> {
        let mut request = self.client.post(format!("{}/{path}", self.host)).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("Api-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RetrievalError::unavailable(Self::NAME, format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RetrievalError::unavailable(Self::NAME, format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(RetrievalError::unavailable(
                Self::NAME,
                format!("API error ({status}): {text}"),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn upsert(&self, namespace: &str, entry: IndexEntry) -> Result<()> {
        let body = UpsertRequest {
            vectors: [WireVector {
                id: &entry.id,
                values: &entry.embedding,
                metadata: &entry.metadata,
            }],
            namespace,
        };
        self.post("vectors/upsert", &body).await?;
        debug!("Upserted {} into Pinecone namespace {namespace}", entry.id);
        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: &[f32],
        top_k: usize,
        filter: Option<&SimilarityFilter>,
    ) -> Result<Vec<RankedCandidate>> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            namespace,
            filter: filter.filter(|f| !f.is_empty()).map(translate_filter),
        };
        let text = self.post("query", &body).await?;

        let response: QueryResponse = serde_json::from_str(&text).map_err(|e| {
            RetrievalError::unavailable(Self::NAME, format!("unexpected query response: {e}"))
        })?;

        debug!("Pinecone returned {} matches", response.matches.len());

        Ok(response
            .matches
            .into_iter()
            .map(|m| SimilarityResult::new(m.id, m.score, scalar_metadata(m.metadata)))
            .collect())
    }
}

/// Translate a filter into Pinecone's metadata filter language.
pub fn translate_filter(filter: &SimilarityFilter) -> Value {
    let mut clauses: Vec<Value> = filter.predicates.iter().map(translate_predicate).collect();
    if clauses.len() == 1 {
        clauses.remove(0)
    } else {
        json!({ "$and": clauses })
    }
}

fn translate_predicate(predicate: &FilterPredicate) -> Value {
    match predicate {
        FilterPredicate::Eq { field, value } => json!({ field: { "$eq": value } }),
        FilterPredicate::Range { field, min, max } => {
            let mut bounds = Map::new();
            if let Some(lo) = min {
                bounds.insert("$gte".to_string(), json!(lo));
            }
            if let Some(hi) = max {
                bounds.insert("$lte".to_string(), json!(hi));
            }
            json!({ field: bounds })
        }
    }
}

// Pinecone also stores booleans and string lists; only scalars are part of our model.
fn scalar_metadata(raw: Map<String, Value>) -> Metadata {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let scalar = match value {
                Value::String(s) => MetadataValue::String(s),
                Value::Number(n) => MetadataValue::Number(n.as_f64()?),
                _ => return None,
            };
            Some((key, scalar))
        })
        .collect()
}
