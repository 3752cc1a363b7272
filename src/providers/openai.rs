//! OpenAI provider implementation
//!
//! This provider uses the shared chat-completions client.

use super::catalog::{ModelSelection, OPENAI_MODELS};
use super::http::{bearer_headers, require_api_key};
use super::openai_shared::ChatCompletionsClient;
use crate::config::ModelConfig;
use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::{
    GenerateOptions, LlmProvider, LlmResponse, ModelSwitch, StreamingProvider, TextStream,
};
use crate::error::LlmResult;
use crate::logging::log_debug;

use async_trait::async_trait;

pub const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI provider implementation
#[derive(Debug)]
pub struct OpenAIProvider {
    client: ChatCompletionsClient,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider instance
    ///
    /// # Errors
    ///
    /// Returns [`crate::LlmError::ConfigurationError`] if the API key is empty or
    /// not a valid header value, and [`crate::LlmError::InvalidModel`] if the
    /// configured model is not a supported GPT model.
    pub fn new(config: ModelConfig) -> LlmResult<Self> {
        log_debug!(
            provider = "openai",
            has_api_url = config.api_url.is_some(),
            model = ?config.model,
            "Creating OpenAI provider"
        );

        require_api_key("OpenAI", &config.api_key)?;
        let models = ModelSelection::new("GPT", "openai", OPENAI_MODELS, config.model.as_deref())?;
        let headers = bearer_headers(&config.api_key)?;

        Ok(Self {
            client: ChatCompletionsClient::new(
                "openai",
                OPENAI_DEFAULT_ENDPOINT,
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
impl LlmProvider for OpenAIProvider {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse> {
        self.client.complete(messages, options).await
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn streaming(&self) -> Option<&dyn StreamingProvider> {
        Some(self)
    }

    fn model_switch(&self) -> Option<&dyn ModelSwitch> {
        Some(self)
    }
}

impl StreamingProvider for OpenAIProvider {
    fn generate_streaming_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> TextStream {
        self.client.stream(messages, options)
    }
}

impl ModelSwitch for OpenAIProvider {
    fn set_model(&self, model: &str) -> LlmResult<()> {
        self.client.models().set(model)
    }

    fn current_model(&self) -> String {
        self.client.models().current()
    }
}
