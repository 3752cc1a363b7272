//! HTTP client for chat-completions style providers
//!
//! [`ChatCompletionsClient`] owns everything an OpenAI-compatible adapter needs:
//! the endpoint, auth headers, model selection and default parameters. The
//! vendor adapters are thin wrappers that choose the endpoint, headers and
//! allow-list.

use super::types::{ChatCompletionsRequest, ChatCompletionsResponse};
use crate::config::ModelConfig;
use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::{GenerateOptions, LlmResponse, TextStream};
use crate::error::{LlmError, LlmResult};
use crate::logging::log_debug;
use crate::providers::catalog::ModelSelection;
use crate::providers::http::ProviderHttpClient;
use crate::providers::sse::sse_text_stream;

use futures_util::{stream, TryStreamExt};
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::Duration;

/// Shared client for `/chat/completions` endpoints
#[derive(Debug)]
pub(crate) struct ChatCompletionsClient {
    http: ProviderHttpClient,
    endpoint: String,
    headers: HeaderMap,
    models: ModelSelection,
    parameters: GenerateOptions,
    request_timeout: Duration,
}

impl ChatCompletionsClient {
    pub fn new(
        provider: &'static str,
        default_endpoint: &str,
        headers: HeaderMap,
        models: ModelSelection,
        config: &ModelConfig,
    ) -> Self {
        let endpoint = config
            .api_url
            .clone()
            .unwrap_or_else(|| default_endpoint.to_string());

        log_debug!(
            provider = provider,
            endpoint = %endpoint,
            model = %models.current(),
            request_timeout_secs = config.request_timeout.as_secs(),
            "Chat completions client initialized"
        );

        Self {
            http: ProviderHttpClient::new(provider),
            endpoint,
            headers,
            models,
            parameters: config.parameters.clone(),
            request_timeout: config.request_timeout,
        }
    }

    pub fn provider(&self) -> &'static str {
        self.http.provider()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    /// Build the request body with model defaults merged under `options`.
    pub fn build_request(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
        stream: bool,
    ) -> ChatCompletionsRequest {
        let options = match options {
            Some(options) => options.merged_over(&self.parameters),
            None => self.parameters.clone(),
        };

        ChatCompletionsRequest {
            model: self.models.current(),
            messages: messages.to_vec(),
            stream,
            options,
        }
    }

    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse> {
        let request = self.build_request(messages, options, false);
        log_debug!(
            provider = self.provider(),
            model = %request.model,
            message_count = request.messages.len(),
            "Sending chat completion request"
        );

        let response: ChatCompletionsResponse = self
            .http
            .post_json(
                &self.endpoint,
                &self.headers,
                &request,
                &request.model,
                self.request_timeout,
            )
            .await?;

        response.into_llm_response().ok_or_else(|| {
            LlmError::provider_api_error(
                self.provider(),
                &request.model,
                None,
                "Response contained no choices",
            )
        })
    }

    /// Stream text deltas. The request is sent on first poll.
    pub fn stream(&self, messages: &[ChatMessage], options: Option<&GenerateOptions>) -> TextStream {
        let request = self.build_request(messages, options, true);
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let headers = self.headers.clone();

        let opened = async move {
            log_debug!(
                provider = http.provider(),
                model = %request.model,
                message_count = request.messages.len(),
                "Opening chat completion stream"
            );
            let response = http
                .post_stream(&endpoint, &headers, &request, &request.model)
                .await?;
            Ok::<TextStream, LlmError>(sse_text_stream(
                http.provider(),
                response.bytes_stream(),
                extract_delta_content,
            ))
        };

        Box::pin(stream::once(opened).try_flatten())
    }
}

/// Text of `choices[0].delta.content` in a streamed chunk.
pub(crate) fn extract_delta_content(event: &Value) -> Option<String> {
    event
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}
