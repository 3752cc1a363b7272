//! Retry logic with fixed backoff
//!
//! The orchestrator wraps each adapter call in a [`RetryExecutor`]:
//! - Only errors reporting [`LlmError::is_retryable`] are retried
//! - Every retry waits the same fixed delay (1s by default)
//! - A retryable failure on the final attempt becomes
//!   [`LlmError::MaxRetriesExceeded`]; anything else propagates unchanged

use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_warn};

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry policy configuration for LLM requests
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// A policy that makes a single attempt.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

/// Retry executor that applies a [`RetryPolicy`] to an async operation
#[derive(Debug, Clone, Default)]
pub(crate) struct RetryExecutor {
    pub(crate) policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create a new retry executor with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// budget is spent.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> LlmResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = LlmResult<T>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            log_debug!(
                attempt = attempt,
                max_attempts = max_attempts,
                "Executing request with retry logic"
            );

            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(error);
            }

            if attempt >= max_attempts {
                return Err(LlmError::max_retries_exceeded(attempt, error));
            }

            log_warn!(
                attempt = attempt,
                max_attempts = max_attempts,
                delay_ms = self.policy.backoff.as_millis(),
                error_code = error.code(),
                error = %error,
                "Request failed, retrying after delay"
            );
            sleep(self.policy.backoff).await;
        }
    }
}
