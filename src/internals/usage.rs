//! Cumulative token usage accounting.

use crate::core_types::provider::TokenUsage;

use std::sync::atomic::{AtomicU64, Ordering};

/// Running total of prompt plus completion tokens across all providers.
///
/// Only vendor-reported usage is counted; the pre-request estimate used for
/// rate limiting never reaches this tracker.
#[derive(Debug, Default)]
pub struct TokenUsageTracker {
    total: AtomicU64,
}

impl TokenUsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the prompt and completion tokens of `usage`.
    pub fn record(&self, usage: &TokenUsage) {
        self.total.fetch_add(
            usage.prompt_tokens.saturating_add(usage.completion_tokens),
            Ordering::Relaxed,
        );
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
    }
}
