//! Error types for LLM operations.
//!
//! Every failure the orchestrator or a provider adapter can produce is a variant
//! of [`LlmError`]. Errors are classified once, where they are created:
//!
//! - HTTP status codes are mapped at the transport layer (429 becomes
//!   [`LlmError::RateLimitExceeded`], 5xx becomes [`LlmError::NetworkFault`],
//!   anything else becomes [`LlmError::ProviderApiError`]).
//! - [`LlmError::is_retryable`] is the only signal the orchestrator uses to decide
//!   between retrying and propagating.
//! - [`LlmError::code`] gives a stable, machine-readable identifier.
//!
//! # Error Handling Example
//!
//! ```rust,no_run
//! use polyglot_llm::{LlmError, Polyglot};
//! use polyglot_llm::error::ErrorCategory;
//!
//! # async fn example(polyglot: &Polyglot) {
//! match polyglot.generate_response("chatgpt", vec![], None, true).await {
//!     Ok(response) => println!("{}", response.content),
//!     Err(err) => {
//!         eprintln!("[{}] {}", err.code(), err);
//!         if matches!(err.category(), ErrorCategory::Transient) {
//!             eprintln!("{}", err.user_message());
//!         }
//!     }
//! }
//! # }
//! ```

use crate::logging::{log_debug, log_error, log_warn};
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// External service failures (provider rejected or failed the request).
    External,

    /// Internal system errors (unclassified failures).
    Internal,

    /// Client errors (unknown provider, invalid model, bad configuration).
    ///
    /// The caller made a mistake that they can fix.
    Client,

    /// Temporary failures that should be retried.
    ///
    /// Rate limits and server faults.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// System is unusable.
    Critical,

    /// Action failed but system is stable.
    Error,

    /// Unexpected but recoverable situation.
    Warning,

    /// Expected failure (e.g., not found).
    Info,
}

// ============================================================================
// LLM Error types
// ============================================================================

/// Convenient result type for LLM operations.
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Errors that can occur during LLM operations.
///
/// # Creating Errors
///
/// Use the constructor methods, which log the error at a level matching its
/// severity:
///
/// ```rust
/// use polyglot_llm::LlmError;
///
/// let err = LlmError::model_not_found("nope");
/// assert_eq!(err.to_string(), "Model \"nope\" not found");
/// assert_eq!(err.code(), "MODEL_NOT_FOUND");
/// ```
///
/// # Error Categories
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `ModelNotFound` | Client | No |
/// | `StreamingNotSupported` | Client | No |
/// | `ModelNotChangeable` | Client | No |
/// | `InvalidModel` | Client | No |
/// | `RateLimitExceeded` | Transient | Yes |
/// | `NetworkFault` | Transient | Yes |
/// | `ProviderApiError` | External | Only for 429/5xx status |
/// | `MaxRetriesExceeded` | External | No |
/// | `ConfigurationError` | Client | No |
/// | `Unknown` | Internal | No |
#[derive(Error, Debug)]
pub enum LlmError {
    /// No provider is registered under the requested name.
    #[error("Model \"{name}\" not found")]
    ModelNotFound {
        /// The provider name that was requested.
        name: String,
    },

    /// The provider is unknown or its adapter cannot stream.
    #[error("Streaming not supported for model \"{name}\"")]
    StreamingNotSupported {
        /// The provider name that was requested.
        name: String,
    },

    /// The provider's adapter does not expose a model switch.
    #[error("Model \"{name}\" does not support changing models")]
    ModelNotChangeable {
        /// The provider name that was requested.
        name: String,
    },

    /// The model id is not in the vendor's allow-list.
    #[error("Invalid {provider} model: {model}")]
    InvalidModel {
        /// Human-readable vendor label (e.g. "GPT", "Claude").
        provider: String,
        /// The rejected model id.
        model: String,
    },

    /// The provider answered with HTTP 429.
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        /// Provider that throttled the request.
        provider: &'static str,
        /// Value of the `Retry-After` header, when present.
        retry_after_seconds: Option<u64>,
    },

    /// Transport failure or server fault (5xx).
    #[error("Network error from {provider}: {message}")]
    NetworkFault {
        /// Provider the request was sent to.
        provider: &'static str,
        /// HTTP status, absent for connection-level failures.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any other failure reported by, or while talking to, a provider.
    #[error("{} API error: {message}", provider_label(provider))]
    ProviderApiError {
        /// Provider that produced the error.
        provider: &'static str,
        /// Model in use when the error occurred.
        model: String,
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },

    /// The retry budget ran out while the last error was still retryable.
    #[error("Max retries reached after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made.
        attempts: u32,
        /// Error returned by the final attempt.
        #[source]
        last_error: Box<LlmError>,
    },

    /// Configuration is invalid or incomplete.
    #[error("Provider configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// Unclassified failure (e.g. raised by a plugin or middleware).
    #[error("An unknown error occurred: {message}")]
    Unknown {
        /// Description of the failure.
        message: String,
    },
}

fn provider_label(provider: &str) -> &str {
    match provider {
        "openai" => "ChatGPT",
        "anthropic" => "Claude",
        "gemini" => "Gemini",
        "mistral" => "Mistral",
        other => other,
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

impl LlmError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            Self::StreamingNotSupported { .. } => "STREAMING_NOT_SUPPORTED",
            Self::ModelNotChangeable { .. } => "MODEL_NOT_CHANGEABLE",
            Self::InvalidModel { .. } => "INVALID_MODEL",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::NetworkFault { .. } => "NETWORK_ERROR",
            Self::ProviderApiError { provider, .. } => match *provider {
                "openai" => "CHATGPT_API_ERROR",
                "anthropic" => "CLAUDE_API_ERROR",
                "gemini" => "GEMINI_API_ERROR",
                "mistral" => "MISTRAL_API_ERROR",
                _ => "PROVIDER_API_ERROR",
            },
            Self::MaxRetriesExceeded { .. } => "MAX_RETRIES",
            Self::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            Self::Unknown { .. } => "UNKNOWN_ERROR",
        }
    }

    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ModelNotFound { .. }
            | Self::StreamingNotSupported { .. }
            | Self::ModelNotChangeable { .. }
            | Self::InvalidModel { .. }
            | Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::RateLimitExceeded { .. } | Self::NetworkFault { .. } => ErrorCategory::Transient,
            Self::ProviderApiError { .. } | Self::MaxRetriesExceeded { .. } => {
                ErrorCategory::External
            }
            Self::Unknown { .. } => ErrorCategory::Internal,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ModelNotFound { .. } => ErrorSeverity::Info,
            Self::StreamingNotSupported { .. } => ErrorSeverity::Info,
            Self::ModelNotChangeable { .. } => ErrorSeverity::Info,
            Self::InvalidModel { .. } => ErrorSeverity::Warning,
            Self::RateLimitExceeded { .. } => ErrorSeverity::Warning,
            Self::NetworkFault { .. } => ErrorSeverity::Warning,
            Self::ProviderApiError { .. } => ErrorSeverity::Error,
            Self::MaxRetriesExceeded { .. } => ErrorSeverity::Error,
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::Unknown { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether this error is transient and should trigger a retry.
    ///
    /// Returns `true` for rate limits, network faults, and provider errors that
    /// carry a 429 or 5xx status.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } | Self::NetworkFault { .. } => true,
            Self::ProviderApiError {
                status: Some(status),
                ..
            } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Convert to a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::ModelNotFound { .. } => "The requested AI model is not configured".to_string(),
            Self::StreamingNotSupported { .. } => {
                "Streaming is not available for this AI model".to_string()
            }
            Self::ModelNotChangeable { .. } | Self::InvalidModel { .. } => {
                "The requested AI model cannot be selected".to_string()
            }
            Self::RateLimitExceeded {
                retry_after_seconds: Some(seconds),
                ..
            } => format!("Service is busy. Please wait {seconds} seconds and try again"),
            Self::RateLimitExceeded { .. } => {
                "Service is busy. Please try again shortly".to_string()
            }
            Self::NetworkFault { .. } => {
                "Unable to communicate with AI service. Please try again".to_string()
            }
            Self::ProviderApiError { .. } => "The AI service rejected the request".to_string(),
            Self::MaxRetriesExceeded { .. } => {
                "The AI service is unavailable. Please try again later".to_string()
            }
            Self::ConfigurationError { .. } => {
                "AI service configuration issue. Please check your settings".to_string()
            }
            Self::Unknown { .. } => "Something went wrong. Please try again later".to_string(),
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn model_not_found(name: impl Into<String>) -> Self {
        let name = name.into();
        log_debug!(
            error_type = "model_not_found",
            model = %name,
            "No provider registered under this name"
        );
        Self::ModelNotFound { name }
    }

    pub fn streaming_not_supported(name: impl Into<String>) -> Self {
        let name = name.into();
        log_debug!(
            error_type = "streaming_not_supported",
            model = %name,
            "Streaming requested from a provider without streaming support"
        );
        Self::StreamingNotSupported { name }
    }

    pub fn model_not_changeable(name: impl Into<String>) -> Self {
        let name = name.into();
        log_debug!(
            error_type = "model_not_changeable",
            model = %name,
            "Model switch requested from a provider without model switching"
        );
        Self::ModelNotChangeable { name }
    }

    pub fn invalid_model(provider: impl Into<String>, model: impl Into<String>) -> Self {
        let provider = provider.into();
        let model = model.into();
        log_warn!(
            error_type = "invalid_model",
            provider = %provider,
            model = %model,
            "Model id is not in the provider allow-list"
        );
        Self::InvalidModel { provider, model }
    }

    pub fn rate_limit_exceeded(provider: &'static str, retry_after_seconds: Option<u64>) -> Self {
        log_warn!(
            error_type = "rate_limit_exceeded",
            provider = provider,
            retry_after_seconds = ?retry_after_seconds,
            "LLM provider rate limit exceeded"
        );
        Self::RateLimitExceeded {
            provider,
            retry_after_seconds,
        }
    }

    pub fn network_fault(
        provider: &'static str,
        status: Option<u16>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "network_fault",
            provider = provider,
            status = ?status,
            message = %message,
            has_source = source.is_some(),
            "LLM provider request failed"
        );
        Self::NetworkFault {
            provider,
            status,
            message,
            source,
        }
    }

    pub fn provider_api_error(
        provider: &'static str,
        model: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let message = message.into();
        log_error!(
            error_type = "provider_api_error",
            provider = provider,
            model = %model,
            status = ?status,
            message = %message,
            "LLM provider returned an error"
        );
        Self::ProviderApiError {
            provider,
            model,
            status,
            message,
        }
    }

    pub fn max_retries_exceeded(attempts: u32, last_error: LlmError) -> Self {
        log_error!(
            error_type = "max_retries_exceeded",
            attempts = attempts,
            last_error = %last_error,
            "Request failed after all retry attempts"
        );
        Self::MaxRetriesExceeded {
            attempts,
            last_error: Box::new(last_error),
        }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "LLM configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "unknown_error",
            message = %message,
            "Unclassified LLM error"
        );
        Self::Unknown { message }
    }
}
