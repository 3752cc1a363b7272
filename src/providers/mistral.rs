//! Mistral provider implementation
//!
//! This provider uses the shared chat-completions client.

use super::catalog::{ModelSelection, MISTRAL_MODELS};
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

pub const MISTRAL_DEFAULT_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

/// Mistral provider implementation
#[derive(Debug)]
pub struct MistralProvider {
    client: ChatCompletionsClient,
}

impl MistralProvider {
    /// Create a new Mistral provider instance
    ///
    /// # Errors
    ///
    /// Returns [`crate::LlmError::ConfigurationError`] if the API key is empty or
    /// not a valid header value, and [`crate::LlmError::InvalidModel`] if the
    /// configured model is not a supported Mistral model.
    pub fn new(config: ModelConfig) -> LlmResult<Self> {
        log_debug!(
            provider = "mistral",
            has_api_url = config.api_url.is_some(),
            model = ?config.model,
            "Creating Mistral provider"
        );

        require_api_key("Mistral", &config.api_key)?;
        let models = ModelSelection::new("Mistral", "mistral", MISTRAL_MODELS, config.model.as_deref())?;
        let headers = bearer_headers(&config.api_key)?;

        Ok(Self {
            client: ChatCompletionsClient::new(
                "mistral",
                MISTRAL_DEFAULT_ENDPOINT,
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
impl LlmProvider for MistralProvider {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse> {
        self.client.complete(messages, options).await
    }

    fn provider_name(&self) -> &'static str {
        "mistral"
    }

    fn streaming(&self) -> Option<&dyn StreamingProvider> {
        Some(self)
    }

    fn model_switch(&self) -> Option<&dyn ModelSwitch> {
        Some(self)
    }
}

impl StreamingProvider for MistralProvider {
    fn generate_streaming_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> TextStream {
        self.client.stream(messages, options)
    }
}

impl ModelSwitch for MistralProvider {
    fn set_model(&self, model: &str) -> LlmResult<()> {
        self.client.models().set(model)
    }

    fn current_model(&self) -> String {
        self.client.models().current()
    }
}
