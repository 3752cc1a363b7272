//! Unit Tests for Gemini Provider HTTP Integration
//!
//! UNIT UNDER TEST: GeminiProvider HTTP request handling
//!
//! BUSINESS RESPONSIBILITY:
//!   - Call `models/{model}:generateContent` with `x-goog-api-key`
//!   - Convert chat messages into Gemini contents and system instructions
//!   - Parse candidates and usage metadata
//!   - Stream via `streamGenerateContent?alt=sse`
//!
//! TEST COVERAGE:
//!   - URL, headers and body shape
//!   - Usage metadata conversion
//!   - Missing candidates and error classification
//!   - Streaming and model switching

mod common;
use common::*;

use futures_util::StreamExt;
use polyglot_llm::providers::gemini::GeminiProvider;
use polyglot_llm::{
    ChatMessage, GenerateOptions, LlmError, LlmProvider, ModelSwitch, StreamingProvider,
    TokenUsage,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn create_provider(mock_server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(gemini_config(&mock_server.uri())).unwrap()
}

// ============================================================================
// Request / Response Tests
// ============================================================================

#[tokio::test]
async fn test_generate_content_request_shape() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Hello"}]}],
            "systemInstruction": {"parts": [{"text": "You are terse."}]},
            "generationConfig": {"temperature": 0.2, "maxOutputTokens": 64}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("Hi")))
        .expect(1)
        .mount(&mock_server)
        .await;
    let provider = create_provider(&mock_server);
    let options = GenerateOptions::new()
        .with_temperature(0.2)
        .with_max_tokens(64);

    // Act
    let response = provider
        .generate_response(&create_test_messages(), Some(&options))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.content, "Hi");
    assert_eq!(response.usage, Some(TokenUsage::new(8, 2)));
}

#[tokio::test]
async fn test_assistant_turns_use_model_role() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user", "parts": [{"text": "Hi"}]},
                {"role": "model", "parts": [{"text": "Hello"}]},
                {"role": "user", "parts": [{"text": "Bye"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("Goodbye")))
        .expect(1)
        .mount(&mock_server)
        .await;
    let provider = create_provider(&mock_server);
    let messages = vec![
        ChatMessage::user("Hi"),
        ChatMessage::assistant("Hello"),
        ChatMessage::user("Bye"),
    ];

    let response = provider.generate_response(&messages, None).await.unwrap();

    assert_eq!(response.content, "Goodbye");
}

#[tokio::test]
async fn test_missing_candidates_is_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&mock_server)
        .await;
    let provider = create_provider(&mock_server);

    let error = provider
        .generate_response(&create_test_messages(), None)
        .await
        .unwrap_err();

    assert_eq!(error.code(), "GEMINI_API_ERROR");
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn test_error_status_classification() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(error_response(403, "API key not valid"))
        .mount(&mock_server)
        .await;
    let provider = create_provider(&mock_server);

    let error = provider
        .generate_response(&create_test_messages(), None)
        .await
        .unwrap_err();

    match error {
        LlmError::ProviderApiError {
            provider,
            status,
            message,
            ..
        } => {
            assert_eq!(provider, "gemini");
            assert_eq!(status, Some(403));
            assert_eq!(message, "HTTP 403: API key not valid");
        }
        other => panic!("expected ProviderApiError, got {other:?}"),
    }
}

// ============================================================================
// Streaming Tests
// ============================================================================

#[tokio::test]
async fn test_streaming_uses_sse_endpoint() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(event_stream(gemini_stream_body(&["The ", "answer ", "is 42"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    let provider = create_provider(&mock_server);

    // Act
    let chunks: Vec<String> = provider
        .generate_streaming_response(&create_test_messages(), None)
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

    // Assert
    assert_eq!(chunks, vec!["The ", "answer ", "is 42"]);
}

#[tokio::test]
async fn test_model_switch_changes_url() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_body("fast")))
        .expect(1)
        .mount(&mock_server)
        .await;
    let provider = create_provider(&mock_server);

    provider.set_model("gemini-1.5-flash").unwrap();
    let response = provider
        .generate_response(&create_test_messages(), None)
        .await
        .unwrap();

    assert_eq!(response.content, "fast");
    assert_eq!(provider.current_model(), "gemini-1.5-flash");
}
