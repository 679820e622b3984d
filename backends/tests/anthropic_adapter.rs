//! Wire-level tests for the Anthropic adapter against a mock server.

use pretty_assertions::assert_eq;
use serde_json::json;
use storefront_backends::{
    AnthropicAdapter, AnthropicConfig, BackendAdapter, BackendError, GenerationOptions, Prompt,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter_for(server: &MockServer) -> AnthropicAdapter {
    AnthropicAdapter::new(AnthropicConfig {
        base_url: server.uri(),
        api_key: Some("sk-ant-test".to_string()),
        ..AnthropicConfig::default()
    })
    .unwrap()
}

fn text_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    }))
}

#[tokio::test]
async fn test_generate_text_uses_messages_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-sonnet-20240229",
            "max_tokens": 1000,
            "temperature": 0.3,
            "messages": [{"role": "user", "content": "hello"}]
        })))
        .respond_with(text_reply("hi there"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let options = GenerationOptions::new().with_temperature(0.3).with_max_tokens(1000);
    let text = adapter.generate_text(&Prompt::new("hello"), &options).await.unwrap();

    assert_eq!(text, "hi there");
}

#[tokio::test]
async fn test_default_max_tokens_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"max_tokens": 1024})))
        .respond_with(text_reply("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    adapter
        .generate_text(&Prompt::new("hello"), &GenerationOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_structured_parses_fenced_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(text_reply("```json\n{\"summary\": \"B is cheaper\"}\n```"))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let value = adapter
        .generate_structured(&Prompt::new("compare"), r#"{"summary": "..."}"#, &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(value, json!({"summary": "B is cheaper"}));
}

#[tokio::test]
async fn test_structured_non_json_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_reply("Both products are great choices!"))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let err = adapter
        .generate_structured(&Prompt::new("compare"), "{}", &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::MalformedResponse { ref backend, .. } if backend == "anthropic"));
}

#[tokio::test]
async fn test_response_without_text_block_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "tool_use", "id": "t1", "name": "x", "input": {}}]
        })))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let err = adapter
        .generate_text(&Prompt::new("hi"), &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let adapter = adapter_for(&server);
    let err = adapter
        .generate_text(&Prompt::new("hi"), &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::BackendUnavailable { .. }));
}
