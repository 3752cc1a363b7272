//! Provider trait and types for LLM abstraction
//!
//! Defines the `LlmProvider` trait that all adapters implement, the optional
//! capabilities an adapter can expose (streaming, model switching), and the
//! option/response types that flow through the orchestrator.

use crate::core_types::messages::ChatMessage;
use crate::error::LlmResult;
use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::pin::Pin;

/// Incremental text chunks produced by a streaming request.
///
/// The HTTP request behind the stream is only sent when the stream is first
/// polled. Transport and decoding failures surface as `Err` items.
pub type TextStream = Pin<Box<dyn Stream<Item = LlmResult<String>> + Send>>;

/// Generation parameters for a request.
///
/// Common parameters have named fields. Anything else a vendor accepts goes in
/// [`GenerateOptions::extra`] and is sent verbatim as a top-level body field.
///
/// ```rust
/// use polyglot_llm::GenerateOptions;
///
/// let options = GenerateOptions::new()
///     .with_temperature(0.2)
///     .with_extra("seed", 42);
/// let json = serde_json::to_value(&options).unwrap();
/// assert_eq!(json["temperature"], 0.2);
/// assert_eq!(json["seed"], 42);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Vendor-specific parameters, passed through unchanged.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn with_presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether no parameter is set at all.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.top_p.is_none()
            && self.frequency_penalty.is_none()
            && self.presence_penalty.is_none()
            && self.extra.is_empty()
    }

    /// Merge these options over `defaults`.
    ///
    /// Named fields set here win; unset ones fall back to `defaults`. Extension
    /// keys are unioned, with keys from `self` overriding.
    pub fn merged_over(&self, defaults: &GenerateOptions) -> GenerateOptions {
        let mut extra = defaults.extra.clone();
        extra.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        GenerateOptions {
            temperature: self.temperature.or(defaults.temperature),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
            top_p: self.top_p.or(defaults.top_p),
            frequency_penalty: self.frequency_penalty.or(defaults.frequency_penalty),
            presence_penalty: self.presence_penalty.or(defaults.presence_penalty),
            extra,
        }
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u64,
    /// Number of tokens in the completion
    pub completion_tokens: u64,
    /// Total tokens reported by the vendor
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Response from a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Primary text content of the response
    pub content: String,
    /// Usage reported by the vendor, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Main trait for LLM providers
///
/// Every adapter can answer a non-streaming request. Optional capabilities are
/// discovered through [`LlmProvider::streaming`] and [`LlmProvider::model_switch`];
/// adapters that support them return `Some(self)`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the conversation and wait for the complete response.
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse>;

    /// Short vendor identifier (`"openai"`, `"anthropic"`, ...).
    fn provider_name(&self) -> &'static str;

    /// Streaming capability, if supported.
    fn streaming(&self) -> Option<&dyn StreamingProvider> {
        None
    }

    /// Model switching capability, if supported.
    fn model_switch(&self) -> Option<&dyn ModelSwitch> {
        None
    }
}

/// Adapters that can stream incremental text.
pub trait StreamingProvider: Send + Sync {
    fn generate_streaming_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> TextStream;
}

/// Adapters whose active model can be changed after construction.
pub trait ModelSwitch: Send + Sync {
    /// Select a new model. Fails with `InvalidModel` for ids outside the
    /// adapter's allow-list.
    fn set_model(&self, model: &str) -> LlmResult<()>;

    fn current_model(&self) -> String;
}
