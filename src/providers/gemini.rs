//! Google Gemini provider implementation
//!
//! Gemini has its own wire format:
//! - roles are `user` and `model` (assistant messages are renamed)
//! - system messages are lifted into `systemInstruction`
//! - generation parameters live under `generationConfig`
//! - the model id is part of the URL, so `api_url` overrides the base URL
//!   (`.../v1beta`) rather than the full endpoint

use super::catalog::{ModelSelection, GEMINI_MODELS};
use super::http::{api_key_headers, require_api_key, ProviderHttpClient};
use super::sse::sse_text_stream;
use crate::config::ModelConfig;
use crate::core_types::messages::{ChatMessage, MessageRole};
use crate::core_types::provider::{
    GenerateOptions, LlmProvider, LlmResponse, ModelSwitch, StreamingProvider, TextStream,
    TokenUsage,
};
use crate::error::{LlmError, LlmResult};
use crate::logging::log_debug;

use async_trait::async_trait;
use futures_util::{stream, TryStreamExt};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `generationConfig`; extension keys from [`GenerateOptions::extra`] are
/// flattened in here (e.g. `topK`, `stopSequences`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiUsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
    #[serde(default)]
    pub total_token_count: Option<u64>,
}

impl From<GeminiUsageMetadata> for TokenUsage {
    fn from(usage: GeminiUsageMetadata) -> Self {
        TokenUsage {
            prompt_tokens: usage.prompt_token_count,
            completion_tokens: usage.candidates_token_count,
            total_tokens: usage
                .total_token_count
                .unwrap_or(usage.prompt_token_count + usage.candidates_token_count),
        }
    }
}

impl GeminiCandidate {
    fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

impl From<&GenerateOptions> for GeminiGenerationConfig {
    fn from(options: &GenerateOptions) -> Self {
        Self {
            temperature: options.temperature,
            max_output_tokens: options.max_tokens,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            extra: options.extra.clone(),
        }
    }
}

/// Convert chat messages into Gemini `contents` plus an optional system instruction.
pub(crate) fn build_gemini_request(
    messages: &[ChatMessage],
    options: &GenerateOptions,
) -> GeminiRequest {
    let mut system_parts = Vec::new();
    let mut contents = Vec::new();

    for message in messages {
        let part = GeminiPart {
            text: Some(message.content().to_string()),
        };
        match message.role() {
            MessageRole::System => system_parts.push(part),
            MessageRole::User => contents.push(GeminiContent {
                role: Some("user".to_string()),
                parts: vec![part],
            }),
            MessageRole::Assistant => contents.push(GeminiContent {
                role: Some("model".to_string()),
                parts: vec![part],
            }),
        }
    }

    GeminiRequest {
        contents,
        system_instruction: (!system_parts.is_empty()).then(|| GeminiContent {
            role: None,
            parts: system_parts,
        }),
        generation_config: (!options.is_empty()).then(|| GeminiGenerationConfig::from(options)),
    }
}

/// Concatenated text of the first candidate in a streamed event.
pub(crate) fn extract_candidate_text(event: &Value) -> Option<String> {
    let response: GeminiResponse = serde_json::from_value(event.clone()).ok()?;
    response.candidates.first().map(GeminiCandidate::text)
}

// ============================================================================
// Provider
// ============================================================================

/// Google Gemini provider
#[derive(Debug)]
pub struct GeminiProvider {
    http: ProviderHttpClient,
    base_url: String,
    headers: HeaderMap,
    models: ModelSelection,
    parameters: GenerateOptions,
    request_timeout: Duration,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] for a missing or malformed API key
    /// and [`LlmError::InvalidModel`] for an unsupported Gemini model.
    pub fn new(config: ModelConfig) -> LlmResult<Self> {
        require_api_key("Gemini", &config.api_key)?;
        let models = ModelSelection::new("Gemini", "gemini", GEMINI_MODELS, config.model.as_deref())?;
        let headers = api_key_headers("x-goog-api-key", &config.api_key)?;
        let base_url = config
            .api_url
            .as_deref()
            .unwrap_or(GEMINI_DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        log_debug!(
            provider = "gemini",
            base_url = %base_url,
            model = %models.current(),
            "Gemini provider initialized"
        );

        Ok(Self {
            http: ProviderHttpClient::new("gemini"),
            base_url,
            headers,
            models,
            parameters: config.parameters,
            request_timeout: config.request_timeout,
        })
    }

    /// Endpoint for a non-streaming request with `model`.
    pub fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Endpoint for a streaming request with `model`.
    pub fn stream_url(&self, model: &str) -> String {
        format!("{}/models/{model}:streamGenerateContent?alt=sse", self.base_url)
    }

    fn merged_options(&self, options: Option<&GenerateOptions>) -> GenerateOptions {
        match options {
            Some(options) => options.merged_over(&self.parameters),
            None => self.parameters.clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse> {
        let model = self.models.current();
        let request = build_gemini_request(messages, &self.merged_options(options));
        log_debug!(
            provider = "gemini",
            model = %model,
            message_count = messages.len(),
            has_system_instruction = request.system_instruction.is_some(),
            "Sending Gemini request"
        );

        let response: GeminiResponse = self
            .http
            .post_json(
                &self.generate_url(&model),
                &self.headers,
                &request,
                &model,
                self.request_timeout,
            )
            .await?;

        let candidate = response.candidates.first().ok_or_else(|| {
            LlmError::provider_api_error("gemini", &model, None, "Response contained no candidates")
        })?;

        Ok(LlmResponse {
            content: candidate.text(),
            usage: response.usage_metadata.map(TokenUsage::from),
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn streaming(&self) -> Option<&dyn StreamingProvider> {
        Some(self)
    }

    fn model_switch(&self) -> Option<&dyn ModelSwitch> {
        Some(self)
    }
}

impl StreamingProvider for GeminiProvider {
    fn generate_streaming_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> TextStream {
        let model = self.models.current();
        let url = self.stream_url(&model);
        let request = build_gemini_request(messages, &self.merged_options(options));
        let http = self.http.clone();
        let headers = self.headers.clone();

        let opened = async move {
            log_debug!(provider = "gemini", model = %model, "Opening Gemini stream");
            let response = http.post_stream(&url, &headers, &request, &model).await?;
            Ok::<TextStream, LlmError>(sse_text_stream(
                "gemini",
                response.bytes_stream(),
                extract_candidate_text,
            ))
        };

        Box::pin(stream::once(opened).try_flatten())
    }
}

impl ModelSwitch for GeminiProvider {
    fn set_model(&self, model: &str) -> LlmResult<()> {
        self.models.set(model)
    }

    fn current_model(&self) -> String {
        self.models.current()
    }
}
