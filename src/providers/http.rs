//! HTTP transport shared by all providers.
//!
//! Every outbound call goes through [`ProviderHttpClient`], which is also the
//! single place where HTTP failures are classified:
//!
//! - 429 becomes `RateLimitExceeded` (with `Retry-After` when present)
//! - 5xx becomes `NetworkFault` carrying the status
//! - any other non-2xx status becomes `ProviderApiError`
//! - connection failures and timeouts become `NetworkFault` without a status
//! - bodies that cannot be decoded become `ProviderApiError`

use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_error};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Thin wrapper over `reqwest::Client` tagged with the provider it serves.
#[derive(Debug, Clone)]
pub(crate) struct ProviderHttpClient {
    client: reqwest::Client,
    provider: &'static str,
}

impl ProviderHttpClient {
    pub fn new(provider: &'static str) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider,
        }
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// POST `body` as JSON and decode the JSON response.
    pub async fn post_json<Req, Resp>(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: &Req,
        model: &str,
        timeout: Duration,
    ) -> LlmResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_error_response(self.provider, model, response).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        log_debug!(
            provider = self.provider,
            model = %model,
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis(),
            response_bytes = text.len(),
            "Provider response received"
        );

        serde_json::from_str(&text).map_err(|e| {
            LlmError::provider_api_error(
                self.provider,
                model,
                Some(status.as_u16()),
                format!("Failed to parse response: {e}"),
            )
        })
    }

    /// POST `body` as JSON and hand back the response for body streaming.
    ///
    /// No overall timeout is applied; streams may legitimately run for minutes.
    pub async fn post_stream<Req>(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: &Req,
        model: &str,
    ) -> LlmResult<reqwest::Response>
    where
        Req: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .headers(headers.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        if !response.status().is_success() {
            return Err(classify_error_response(self.provider, model, response).await);
        }

        log_debug!(
            provider = self.provider,
            model = %model,
            status = response.status().as_u16(),
            "Provider stream opened"
        );

        Ok(response)
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> LlmError {
        log_error!(
            provider = self.provider,
            url = %url,
            error = %e,
            is_timeout = e.is_timeout(),
            "HTTP request failed"
        );
        let message = if e.is_timeout() {
            format!("Request timed out: {e}")
        } else {
            format!("Request failed: {e}")
        };
        LlmError::network_fault(self.provider, None, message, Some(Box::new(e)))
    }
}

/// Map a non-success HTTP response onto an [`LlmError`].
pub(crate) async fn classify_error_response(
    provider: &'static str,
    model: &str,
    response: reqwest::Response,
) -> LlmError {
    let status = response.status().as_u16();
    let retry_after_seconds = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    classify_status(provider, model, status, retry_after_seconds, &body)
}

pub(crate) fn classify_status(
    provider: &'static str,
    model: &str,
    status: u16,
    retry_after_seconds: Option<u64>,
    body: &str,
) -> LlmError {
    let message = extract_error_message(body);
    match status {
        429 => LlmError::rate_limit_exceeded(provider, retry_after_seconds),
        500..=599 => LlmError::network_fault(
            provider,
            Some(status),
            format!("Server error {status}: {message}"),
            None,
        ),
        _ => LlmError::provider_api_error(
            provider,
            model,
            Some(status),
            format!("HTTP {status}: {message}"),
        ),
    }
}

/// Pull a readable message out of a vendor error body.
///
/// Understands `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"message": ...}`; anything else is returned as-is.
pub(crate) fn extract_error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    json.pointer("/error/message")
        .or_else(|| json.get("error").filter(|e| e.is_string()))
        .or_else(|| json.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

/// JSON headers with `Authorization: Bearer <key>`.
pub(crate) fn bearer_headers(api_key: &str) -> LlmResult<HeaderMap> {
    let mut headers = json_headers();
    headers.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);
    Ok(headers)
}

/// JSON headers with the key in a vendor-specific header.
pub(crate) fn api_key_headers(header: &'static str, api_key: &str) -> LlmResult<HeaderMap> {
    let mut headers = json_headers();
    headers.insert(HeaderName::from_static(header), header_value(api_key)?);
    Ok(headers)
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn header_value(value: &str) -> LlmResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| LlmError::configuration_error(format!("Invalid API key format: {e}")))
}

/// Reject empty keys before any header is built.
pub(crate) fn require_api_key(provider: &str, api_key: &str) -> LlmResult<()> {
    if api_key.trim().is_empty() {
        return Err(LlmError::configuration_error(format!(
            "{provider} API key is required"
        )));
    }
    Ok(())
}
