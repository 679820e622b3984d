//! Wire-level tests for the Pinecone-compatible index against a mock server.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use storefront_retrieval::{
    IndexBackendConfig, IndexConfig, Metadata, MetadataValue, PineconeIndex, RetrievalError, SimilarityFilter,
    VectorRetrievalEngine,
};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> VectorRetrievalEngine {
    let config = IndexConfig::new(3).with_backend(IndexBackendConfig::Pinecone {
        host: server.uri(),
        api_key: Some("pc-test".to_string()),
    });
    VectorRetrievalEngine::from_config(config).unwrap()
}

#[tokio::test]
async fn test_upsert_sends_vector_and_namespace() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vectors/upsert"))
        .and(header("Api-Key", "pc-test"))
        .and(body_json(json!({
            "vectors": [{
                "id": "42",
                "values": [0.5, 0.25, 0.0],
                "metadata": {"categoryId": "shoes", "price": 99.5}
            }],
            "namespace": "products"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"upsertedCount": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let mut metadata = Metadata::new();
    metadata.insert("categoryId".to_string(), "shoes".into());
    metadata.insert("price".to_string(), 99.5.into());

    engine_for(&server)
        .upsert("42", vec![0.5, 0.25, 0.0], metadata)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_translates_filter_and_parses_matches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({
            "vector": [1.0, 0.0, 0.0],
            "topK": 2,
            "includeMetadata": true,
            "namespace": "products",
            "filter": {"$and": [
                {"categoryId": {"$eq": "x"}},
                {"price": {"$gte": 50.0, "$lte": 150.0}}
            ]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [
                {"id": "b", "score": 0.8, "metadata": {"categoryId": "x", "price": 100}},
                {"id": "a", "score": 0.8, "metadata": {"categoryId": "x", "price": 60}}
            ],
            "namespace": "products"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = SimilarityFilter::new()
        .eq("categoryId", "x")
        .range("price", Some(50.0), Some(150.0));
    let hits = engine_for(&server)
        .query(&[1.0, 0.0, 0.0], 2, Some(&filter))
        .await
        .unwrap();

    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(
        hits[1].metadata.get("price").and_then(MetadataValue::as_f64),
        Some(100.0)
    );
}

#[tokio::test]
async fn test_server_error_is_index_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .query(&[1.0, 0.0, 0.0], 5, None)
        .await
        .unwrap_err();

    match err {
        RetrievalError::IndexUnavailable { backend, reason } => {
            assert_eq!(backend, "pinecone");
            assert!(reason.contains("503"), "reason was {reason}");
        }
        other => panic!("expected IndexUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_body_is_index_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = engine_for(&server)
        .query(&[1.0, 0.0, 0.0], 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::IndexUnavailable { .. }));
}

#[tokio::test]
async fn test_slow_index_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"matches": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let index = PineconeIndex::new(server.uri(), None, Duration::from_secs(10)).unwrap();
    let config = IndexConfig::new(3).with_timeout(Duration::from_millis(100));
    let engine = VectorRetrievalEngine::new(&config, Arc::new(index));

    let err = engine.query(&[1.0, 0.0, 0.0], 5, None).await.unwrap_err();
    assert!(matches!(err, RetrievalError::IndexUnavailable { .. }));
}
