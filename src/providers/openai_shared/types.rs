//! Chat-completions wire structures
//!
//! Request/response shapes of the OpenAI-style `/chat/completions` endpoint,
//! which OpenAI, Mistral and Anthropic's compatibility layer all accept.

use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::{GenerateOptions, LlmResponse, TokenUsage};
use serde::{Deserialize, Serialize};

/// Chat completion request
///
/// Generation options are flattened into the top level of the body, so
/// vendor-specific extension keys pass through unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionsRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(flatten)]
    pub options: GenerateOptions,
}

/// Chat completion response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatCompletionsResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionsChoice>,
    #[serde(default)]
    pub usage: Option<ChatCompletionsUsage>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatCompletionsChoice {
    pub message: ChatCompletionsMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatCompletionsMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage as reported in the `usage` object
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct ChatCompletionsUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

impl From<ChatCompletionsUsage> for TokenUsage {
    fn from(usage: ChatCompletionsUsage) -> Self {
        TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage
                .total_tokens
                .unwrap_or(usage.prompt_tokens + usage.completion_tokens),
        }
    }
}

impl ChatCompletionsResponse {
    /// Content of the first choice, or `None` when there are no choices.
    pub fn into_llm_response(self) -> Option<LlmResponse> {
        let choice = self.choices.into_iter().next()?;
        Some(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            usage: self.usage.map(TokenUsage::from),
        })
    }
}
