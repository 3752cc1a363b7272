//! Anthropic provider implementation
//!
//! Claude models are reached through Anthropic's chat-completions compatible
//! endpoint, so request and response handling is shared with OpenAI. Only the
//! authentication headers differ.

use super::catalog::{ModelSelection, ANTHROPIC_MODELS};
use super::http::{api_key_headers, require_api_key};
use super::openai_shared::ChatCompletionsClient;
use crate::config::ModelConfig;
use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::{
    GenerateOptions, LlmProvider, LlmResponse, ModelSwitch, StreamingProvider, TextStream,
};
use crate::error::LlmResult;
use crate::logging::log_debug;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

pub const ANTHROPIC_DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/chat/completions";
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider
#[derive(Debug)]
pub struct AnthropicProvider {
    client: ChatCompletionsClient,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider instance
    ///
    /// # Errors
    ///
    /// Returns [`crate::LlmError::ConfigurationError`] for a missing or malformed
    /// API key and [`crate::LlmError::InvalidModel`] for an unsupported Claude model.
    pub fn new(config: ModelConfig) -> LlmResult<Self> {
        log_debug!(
            provider = "anthropic",
            has_api_url = config.api_url.is_some(),
            model = ?config.model,
            "Creating Anthropic provider"
        );

        require_api_key("Anthropic", &config.api_key)?;
        let models = ModelSelection::new(
            "Claude",
            "anthropic",
            ANTHROPIC_MODELS,
            config.model.as_deref(),
        )?;

        let mut headers = api_key_headers("x-api-key", &config.api_key)?;
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(ANTHROPIC_API_VERSION),
        );

        Ok(Self {
            client: ChatCompletionsClient::new(
                "anthropic",
                ANTHROPIC_DEFAULT_ENDPOINT,
                headers,
                models,
                &config,
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse> {
        self.client.complete(messages, options).await
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn streaming(&self) -> Option<&dyn StreamingProvider> {
        Some(self)
    }

    fn model_switch(&self) -> Option<&dyn ModelSwitch> {
        Some(self)
    }
}

impl StreamingProvider for AnthropicProvider {
    fn generate_streaming_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> TextStream {
        self.client.stream(messages, options)
    }
}

impl ModelSwitch for AnthropicProvider {
    fn set_model(&self, model: &str) -> LlmResult<()> {
        self.client.models().set(model)
    }

    fn current_model(&self) -> String {
        self.client.models().current()
    }
}
