//! Model allow-lists and the mutable model selection of an adapter.

use crate::error::{LlmError, LlmResult};
use crate::logging::log_info;

use std::sync::{PoisonError, RwLock};

pub const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"];

pub const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-sonnet-20240620",
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

pub const GEMINI_MODELS: &[&str] = &["gemini-1.5-pro", "gemini-1.5-flash", "gemini-1.0-pro"];

pub const MISTRAL_MODELS: &[&str] = &[
    "open-mistral-nemo",
    "mistral-small-latest",
    "mistral-medium-latest",
    "mistral-large-latest",
    "codestral-latest",
];

/// The active model of one adapter, restricted to a fixed allow-list.
///
/// The first allow-list entry is the default.
#[derive(Debug)]
pub(crate) struct ModelSelection {
    label: &'static str,
    provider: &'static str,
    allowed: &'static [&'static str],
    current: RwLock<String>,
}

impl ModelSelection {
    /// `label` is the vendor name used in error messages (e.g. "GPT").
    pub fn new(
        label: &'static str,
        provider: &'static str,
        allowed: &'static [&'static str],
        initial: Option<&str>,
    ) -> LlmResult<Self> {
        let initial = match initial {
            Some(model) => model,
            None => allowed
                .first()
                .copied()
                .ok_or_else(|| LlmError::configuration_error(format!("{label} has no models")))?,
        };
        if !allowed.contains(&initial) {
            return Err(LlmError::invalid_model(label, initial));
        }

        Ok(Self {
            label,
            provider,
            allowed,
            current: RwLock::new(initial.to_string()),
        })
    }

    pub fn current(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, model: &str) -> LlmResult<()> {
        if !self.allowed.contains(&model) {
            return Err(LlmError::invalid_model(self.label, model));
        }

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = model.to_string();
        log_info!(provider = self.provider, model = %model, "Switched model");
        Ok(())
    }
}
