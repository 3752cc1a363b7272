//! Test helper utilities for polyglot-llm integration tests
//!
//! Mock response bodies and configuration builders shared by the wiremock
//! suites.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Functions are used across different test files
#![allow(dead_code)]

use polyglot_llm::{ChatMessage, ModelConfig};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::ResponseTemplate;

pub const TEST_API_KEY: &str = "test-key";

/// Configuration pointing at a mock server endpoint.
pub fn create_test_config(url: String) -> ModelConfig {
    ModelConfig::new(TEST_API_KEY)
        .with_api_url(url)
        .with_request_timeout(Duration::from_secs(5))
}

/// Configuration for a chat-completions adapter mounted at `/v1/chat/completions`.
pub fn chat_completions_config(server_uri: &str) -> ModelConfig {
    create_test_config(format!("{server_uri}/v1/chat/completions"))
}

/// Configuration for the Gemini adapter, whose URL is a base URL.
pub fn gemini_config(server_uri: &str) -> ModelConfig {
    create_test_config(format!("{server_uri}/v1beta"))
}

pub fn create_test_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are terse."),
        ChatMessage::user("Hello"),
    ]
}

// ============================================================================
// Chat-completions bodies
// ============================================================================

pub fn chat_completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

pub fn chat_completion_stream_body(chunks: &[&str]) -> String {
    let mut body = String::from(
        "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n",
    );
    for chunk in chunks {
        let event = json!({"choices": [{"index": 0, "delta": {"content": chunk}}]});
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

// ============================================================================
// Gemini bodies
// ============================================================================

pub fn gemini_body(content: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": content}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 8, "candidatesTokenCount": 2, "totalTokenCount": 10}
    })
}

pub fn gemini_stream_body(chunks: &[&str]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let event = json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": chunk}]}}]
            });
            format!("data: {event}\r\n\r\n")
        })
        .collect()
}

// ============================================================================
// Responses
// ============================================================================

pub fn event_stream(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"message": message, "type": "test_error"}
    }))
}

pub fn rate_limited_response(retry_after: u64) -> ResponseTemplate {
    error_response(429, "Rate limit exceeded").insert_header("retry-after", retry_after.to_string())
}
