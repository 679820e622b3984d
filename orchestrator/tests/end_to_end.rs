//! Orchestrator built from configuration, talking to mocked model APIs.

use pretty_assertions::assert_eq;
use serde_json::json;
use storefront_orchestrator::{AiConfig, AiError, Orchestrator, Product, ProductFilters, TaskKind};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(openai: &MockServer, anthropic: &MockServer) -> AiConfig {
    let text = format!(
        r#"
        [openai]
        base_url = "{}/v1"
        api_key = "sk-test"
        embedding_dimension = 3

        [anthropic]
        base_url = "{}"
        api_key = "sk-ant-test"

        [index]
        dimension = 3
        timeout_ms = 2000
        "#,
        openai.uri(),
        anthropic.uri()
    );
    AiConfig::from_toml_str(&text).unwrap()
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    }))
}

fn claude_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "content": [{"type": "text", "text": text}]
    }))
}

fn product(id: &str, category: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        description: None,
        price: 100.0,
        category_id: category.to_string(),
        average_rating: None,
    }
}

#[tokio::test]
async fn test_from_config_routes_by_default_policy() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    let ai = Orchestrator::from_config(config_for(&openai, &anthropic)).unwrap();

    assert_eq!(ai.router().route(TaskKind::ProductComparison).name(), "anthropic");
    assert_eq!(ai.router().route(TaskKind::EmbeddingGeneration).name(), "openai");
    assert_eq!(ai.pipeline().dimension(), 3);
}

#[tokio::test]
async fn test_from_config_rejects_dimension_mismatch() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    let mut config = config_for(&openai, &anthropic);
    config.openai.embedding_dimension = 1536;

    let err = Orchestrator::from_config(config).unwrap_err();
    assert_eq!(err, AiError::DimensionMismatch { expected: 3, actual: 1536 });
}

#[tokio::test]
async fn test_from_config_rejects_incomplete_routing() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    let mut config = config_for(&openai, &anthropic);
    config.routing = AiConfig::from_toml_str("[routing]\nproduct_comparison = \"anthropic\"")
        .unwrap()
        .routing;

    let err = Orchestrator::from_config(config).unwrap_err();
    assert!(matches!(err, AiError::Routing(_)), "got {err:?}");
}

#[tokio::test]
async fn test_from_config_rejects_embedding_on_chat_only_backend() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    let mut config = config_for(&openai, &anthropic);
    config.routing = config
        .routing
        .clone()
        .with_route(TaskKind::EmbeddingGeneration, "anthropic");

    let err = Orchestrator::from_config(config).unwrap_err();
    assert!(matches!(err, AiError::CapabilityNotSupported { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_prose_from_models_is_malformed_except_for_test_cases() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(claude_reply("Both are lovely products, honestly."))
        .mount(&anthropic)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(chat_reply("Here are some ideas for tests!"))
        .mount(&openai)
        .await;

    let ai = Orchestrator::from_config(config_for(&openai, &anthropic)).unwrap();

    let err = ai
        .compare_products(&[product("a", "x"), product("b", "x")])
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::MalformedResponse { ref backend, .. } if backend == "anthropic"));

    let err = ai
        .generate_personalized_recommendation(
            &storefront_orchestrator::UserProfile {
                age_group: "20s".to_string(),
                interests: vec!["electronics".to_string()],
                average_purchase_amount: 500.0,
            },
            &[],
            &[product("a", "x")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::MalformedResponse { .. }));

    let cases = ai
        .generate_test_cases(&["refresh during payment".to_string()])
        .await
        .unwrap();
    assert!(cases.is_empty());
}

#[tokio::test]
async fn test_index_then_search_through_openai_embeddings() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;

    for (input, vector) in [
        ("Product a", [1.0, 0.0, 0.0]),
        ("Product b", [0.9, 0.1, 0.0]),
        ("Product c", [1.0, 0.0, 0.0]),
        ("fast shoes", [1.0, 0.0, 0.0]),
    ] {
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(body_partial_json(json!({"input": input, "dimensions": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"index": 0, "embedding": vector}]
            })))
            .mount(&openai)
            .await;
    }

    let ai = Orchestrator::from_config(config_for(&openai, &anthropic)).unwrap();
    ai.index_product(&product("a", "x")).await.unwrap();
    ai.index_product(&product("b", "x")).await.unwrap();
    ai.index_product(&product("c", "y")).await.unwrap();

    let filters = ProductFilters {
        category_id: Some("x".to_string()),
        price_range: Some((50.0, 100.0)),
    };
    let hits = ai.search_similar_products("fast shoes", &filters, None).await.unwrap();

    let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() {
    let openai = MockServer::start().await;
    let anthropic = MockServer::start().await;
    let mut config = config_for(&openai, &anthropic);
    config.openai.base_url = "http://127.0.0.1:9/v1".to_string();

    let ai = Orchestrator::from_config(config).unwrap();
    let err = ai.generate_embedding("anything").await.unwrap_err();
    assert!(matches!(err, AiError::BackendUnavailable { .. }), "got {err:?}");
}
