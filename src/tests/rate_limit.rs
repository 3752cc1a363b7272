// Unit Tests for rate limiters
//
// UNIT UNDER TEST: TokenBucketRateLimiter, GcraRateLimiter
//
// BUSINESS RESPONSIBILITY:
//   - Admits tokens immediately while the bucket holds enough
//   - Suspends callers until the refill covers the shortfall
//   - Never lets the balance exceed capacity
//   - Carries debt when a request exceeds capacity
//   - Serialises concurrent consumers
//
// TEST COVERAGE:
//   - Immediate consumption and exact wait times (paused tokio clock)
//   - Capacity cap after long idle periods
//   - Debt behaviour for oversize requests
//   - Conservation under concurrent consumers
//   - GCRA limiter admission and clamping

use crate::internals::rate_limit::{GcraRateLimiter, RateLimiter, TokenBucketRateLimiter};

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    // Fractional waits are rounded to the timer's millisecond resolution
    fn within_a_millisecond(actual: Duration, expected: Duration) -> bool {
        actual >= expected - Duration::from_millis(1) && actual <= expected + Duration::from_millis(1)
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_starts_full_and_consumes_immediately() {
        // Arrange
        let limiter = TokenBucketRateLimiter::new(10, 2.0);
        let started = Instant::now();

        // Act
        limiter.consume(4).await;

        // Assert
        assert_eq!(started.elapsed(), Duration::ZERO, "Should not wait while tokens remain");
        assert_eq!(limiter.available_tokens().await, 6.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_waits_for_shortfall() {
        // Arrange
        let limiter = TokenBucketRateLimiter::new(10, 2.0);
        limiter.consume(4).await;
        let started = Instant::now();

        // Act: 6 available, 10 requested, 4 missing at 2/s
        limiter.consume(10).await;

        // Assert
        assert_eq!(started.elapsed(), Duration::from_secs(2));
        assert_eq!(limiter.available_tokens().await, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_never_exceeds_capacity() {
        // Arrange
        let limiter = TokenBucketRateLimiter::new(10, 2.0);
        limiter.consume(10).await;

        // Act
        tokio::time::advance(Duration::from_secs(3600)).await;

        // Assert
        assert_eq!(limiter.available_tokens().await, 10.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversize_request_leaves_bucket_in_debt() {
        // Arrange
        let limiter = TokenBucketRateLimiter::new(5, 5.0);
        let started = Instant::now();

        // Act: waits for the 3-token shortfall, refill is capped at 5, balance -3
        limiter.consume(8).await;
        let after_oversize = started.elapsed();
        limiter.consume(1).await;

        // Assert
        assert!(
            within_a_millisecond(after_oversize, Duration::from_millis(600)),
            "Oversize request waits for its shortfall, got {after_oversize:?}"
        );
        assert!(
            within_a_millisecond(started.elapsed(), Duration::from_millis(1400)),
            "Next caller waits for debt plus its own token, got {:?}",
            started.elapsed()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_consumers_conserve_tokens() {
        // Arrange
        let limiter = Arc::new(TokenBucketRateLimiter::new(10, 10.0));
        let started = Instant::now();

        // Act: 40 tokens requested, 10 available, the rest refilled at 10/s
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.consume(10).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // Assert
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(limiter.available_tokens().await.abs() < 1e-9);
    }

    #[test]
    fn test_bucket_accessors() {
        let limiter = TokenBucketRateLimiter::new(100, 2.5);
        assert_eq!(limiter.max_tokens(), 100);
        assert_eq!(limiter.refill_rate_per_second(), 2.5);
    }

    #[test]
    fn test_non_positive_refill_rate_is_clamped() {
        let limiter = TokenBucketRateLimiter::new(100, 0.0);
        assert!(limiter.refill_rate_per_second() > 0.0);
    }

    #[tokio::test]
    async fn test_gcra_admits_within_burst() {
        // Arrange
        let limiter = GcraRateLimiter::new(nz(1000), nz(50));

        // Act
        let result = tokio::time::timeout(Duration::from_secs(1), async {
            limiter.consume(0).await;
            limiter.consume(20).await;
            limiter.consume(30).await;
        })
        .await;

        // Assert
        assert!(result.is_ok(), "Burst capacity should admit without waiting");
        assert_eq!(limiter.burst(), 50);
    }

    #[tokio::test]
    async fn test_gcra_clamps_oversize_requests() {
        // Arrange
        let limiter = GcraRateLimiter::new(nz(1000), nz(5));

        // Act
        let result =
            tokio::time::timeout(Duration::from_secs(1), limiter.consume(u64::MAX)).await;

        // Assert
        assert!(result.is_ok(), "Oversize requests are clamped rather than rejected");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_wait_stays_pending() {
        // Arrange: u64::MAX tokens at 1/s is far beyond what a Duration holds
        let limiter = TokenBucketRateLimiter::new(10, 1.0);

        // Act
        let result =
            tokio::time::timeout(Duration::from_secs(3600), limiter.consume(u64::MAX)).await;

        // Assert
        assert!(result.is_err(), "Huge requests should wait, not panic");
    }

    #[tokio::test(start_paused = true)]
    async fn test_minimum_rate_with_large_request_stays_pending() {
        // Arrange: the clamped minimum rate turns a modest request into an enormous wait
        let limiter = TokenBucketRateLimiter::new(1, 0.0);

        // Act
        let result =
            tokio::time::timeout(Duration::from_secs(60), limiter.consume(u64::MAX / 2)).await;

        // Assert
        assert!(result.is_err());
    }
}
