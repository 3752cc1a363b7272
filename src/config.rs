//! Provider configuration.
//!
//! A [`ModelConfig`] holds everything one adapter instance needs: credentials,
//! an optional endpoint override, the model to start with and default
//! generation parameters. [`ProviderKind`] names the supported vendors and maps
//! them to environment variable prefixes.
//!
//! ```rust,no_run
//! use polyglot_llm::{ModelConfig, ProviderKind};
//!
//! # fn example() -> polyglot_llm::LlmResult<()> {
//! // Reads OPENAI_API_KEY, and optionally OPENAI_API_URL / OPENAI_MODEL
//! let config = ModelConfig::from_env(ProviderKind::OpenAI)?;
//!
//! let manual = ModelConfig::new("sk-...").with_model("gpt-4o-mini");
//! # Ok(())
//! # }
//! ```

use crate::core_types::provider::GenerateOptions;
use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, mask_api_key};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default per-request timeout for non-streaming calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

/// Supported vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    Gemini,
    Mistral,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Mistral,
    ];

    /// Short identifier, matching `LlmProvider::provider_name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Mistral => "mistral",
        }
    }

    /// Prefix of the environment variables read by [`ModelConfig::from_env`].
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI",
            Self::Anthropic => "ANTHROPIC",
            Self::Gemini => "GEMINI",
            Self::Mistral => "MISTRAL",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "chatgpt" => Ok(Self::OpenAI),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            "mistral" => Ok(Self::Mistral),
            other => Err(LlmError::configuration_error(format!(
                "Unsupported provider: {other}"
            ))),
        }
    }
}

/// Configuration for a single adapter instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub api_key: String,
    /// Endpoint override; the vendor default is used when absent
    #[serde(default)]
    pub api_url: Option<String>,
    /// Initial model; the first entry of the vendor allow-list when absent
    #[serde(default)]
    pub model: Option<String>,
    /// Default generation parameters, overridden per request
    #[serde(default)]
    pub parameters: GenerateOptions,
    /// Timeout applied to each non-streaming request
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: None,
            model: None,
            parameters: GenerateOptions::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_parameters(mut self, parameters: GenerateOptions) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build a configuration from `{PREFIX}_API_KEY`, `{PREFIX}_API_URL` and
    /// `{PREFIX}_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if the API key variable is
    /// missing or empty.
    pub fn from_env(kind: ProviderKind) -> LlmResult<Self> {
        let prefix = kind.env_prefix();
        let key_var = format!("{prefix}_API_KEY");

        let api_key = read_env(&key_var).ok_or_else(|| {
            LlmError::configuration_error(format!("{key_var} environment variable is required"))
        })?;

        let mut config = Self::new(api_key);
        config.api_url = read_env(&format!("{prefix}_API_URL"));
        config.model = read_env(&format!("{prefix}_MODEL"));

        log_debug!(
            provider = kind.as_str(),
            api_key = %mask_api_key(&config.api_key),
            has_api_url = config.api_url.is_some(),
            model = ?config.model,
            "Loaded provider configuration from environment"
        );

        Ok(config)
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("parameters", &self.parameters)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
