//! Per-provider rate limiting.
//!
//! The orchestrator holds at most one [`RateLimiter`] per provider name and
//! calls [`RateLimiter::consume`] with the estimated prompt tokens before every
//! adapter call. `consume` suspends until the tokens are available; it never
//! fails.
//!
//! Two implementations ship with the crate:
//!
//! - [`TokenBucketRateLimiter`]: a lazily refilled token bucket
//! - [`GcraRateLimiter`]: a GCRA limiter backed by `governor`

use crate::logging::{log_debug, log_warn};

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Gate that admits a number of tokens, waiting when the budget is exhausted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until `tokens` can be admitted, then deduct them.
    async fn consume(&self, tokens: u64);
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket that refills continuously at a fixed rate.
///
/// The bucket starts full and is refilled lazily on each `consume`; there is no
/// background timer. Consumers are serialised, so concurrent callers never
/// admit more tokens than the bucket held plus what it refilled.
///
/// A request for more tokens than `max_tokens` waits for the shortfall and then
/// leaves the bucket in debt (negative balance). Later callers wait until the
/// debt is refilled.
///
/// Uses the tokio clock, so it honours paused time in tests.
#[derive(Debug)]
pub struct TokenBucketRateLimiter {
    max_tokens: f64,
    refill_rate_per_second: f64,
    state: Mutex<BucketState>,
}

impl TokenBucketRateLimiter {
    /// Create a full bucket holding `max_tokens`, refilling at
    /// `refill_rate_per_second`.
    ///
    /// A non-positive or non-finite refill rate would make waits unbounded, so
    /// it is clamped to a minimum of one token per hour.
    pub fn new(max_tokens: u64, refill_rate_per_second: f64) -> Self {
        let minimum_rate = 1.0 / 3600.0;
        let refill_rate_per_second = if refill_rate_per_second.is_finite() {
            refill_rate_per_second.max(minimum_rate)
        } else {
            log_warn!(
                refill_rate_per_second = refill_rate_per_second,
                "Non-finite refill rate, clamping to minimum"
            );
            minimum_rate
        };

        Self {
            max_tokens: max_tokens as f64,
            refill_rate_per_second,
            state: Mutex::new(BucketState {
                tokens: max_tokens as f64,
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn max_tokens(&self) -> u64 {
        self.max_tokens as u64
    }

    pub fn refill_rate_per_second(&self) -> f64 {
        self.refill_rate_per_second
    }

    /// Current balance after a refill. Negative while the bucket is in debt.
    pub async fn available_tokens(&self) -> f64 {
        let mut state = self.state.lock().await;
        self.refill(&mut state);
        state.tokens
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate_per_second).min(self.max_tokens);
        state.last_refill = now;
    }
}

#[async_trait]
impl RateLimiter for TokenBucketRateLimiter {
    async fn consume(&self, tokens: u64) {
        let requested = tokens as f64;
        let mut state = self.state.lock().await;
        self.refill(&mut state);

        if requested > self.max_tokens {
            log_warn!(
                requested = tokens,
                max_tokens = self.max_tokens,
                "Request exceeds bucket capacity, bucket will go into debt"
            );
        }

        if state.tokens < requested {
            // Waits too long to represent saturate instead of panicking.
            let wait = Duration::try_from_secs_f64(
                (requested - state.tokens) / self.refill_rate_per_second,
            )
            .unwrap_or(Duration::MAX);
            log_debug!(
                requested = tokens,
                available = state.tokens,
                wait_ms = wait.as_millis(),
                "Rate limit reached, waiting for refill"
            );
            sleep(wait).await;
            self.refill(&mut state);
        }

        state.tokens -= requested;
    }
}

/// GCRA rate limiter backed by `governor`.
///
/// Admits up to `burst` tokens at once and replenishes `tokens_per_second`.
/// Requests larger than `burst` can never be admitted by GCRA, so they are
/// clamped to `burst`.
pub struct GcraRateLimiter {
    limiter: DefaultDirectRateLimiter,
    burst: NonZeroU32,
}

impl GcraRateLimiter {
    pub fn new(tokens_per_second: NonZeroU32, burst: NonZeroU32) -> Self {
        let quota = Quota::per_second(tokens_per_second).allow_burst(burst);
        Self {
            limiter: DefaultDirectRateLimiter::direct(quota),
            burst,
        }
    }

    pub fn burst(&self) -> u32 {
        self.burst.get()
    }
}

impl fmt::Debug for GcraRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcraRateLimiter")
            .field("burst", &self.burst)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RateLimiter for GcraRateLimiter {
    async fn consume(&self, tokens: u64) {
        if tokens == 0 {
            return;
        }

        let fits = u32::try_from(tokens)
            .ok()
            .and_then(NonZeroU32::new)
            .filter(|n| *n <= self.burst);
        let requested = match fits {
            Some(n) => n,
            None => {
                log_warn!(
                    requested = tokens,
                    burst = self.burst.get(),
                    "Request clamped to burst size"
                );
                self.burst
            }
        };

        if let Err(e) = self.limiter.until_n_ready(requested).await {
            log_warn!(error = %e, "GCRA limiter rejected request size");
        }
    }
}
