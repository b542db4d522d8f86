//! IP lookup pacing.
//!
//! The free ip-api.com tier allows 45 requests per minute. Every enrichment
//! that resolves an IP takes a permit from one shared [`FixedWindowLimiter`]
//! before calling the provider. Time is read through the [`Clock`] trait so
//! tests can drive the limiter with a [`ManualClock`].

mod clock;
mod limiter;

pub use clock::{Clock, ManualClock, TokioClock};
pub use limiter::FixedWindowLimiter;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn limiter_with(clock: Arc<ManualClock>, max: u32) -> FixedWindowLimiter {
        FixedWindowLimiter::new(max, Duration::from_secs(60), Duration::from_secs(1), clock)
    }

    #[tokio::test]
    async fn test_cap_reached_sleeps_until_rollover_plus_margin() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter_with(Arc::clone(&clock), 45);

        for _ in 0..45 {
            assert_eq!(limiter.acquire().await, Duration::ZERO);
        }
        assert_eq!(limiter.used().await, 45);
        assert_eq!(clock.elapsed(), Duration::ZERO);

        let waited = limiter.acquire().await;
        assert_eq!(waited, Duration::from_secs(61));
        assert_eq!(clock.elapsed(), Duration::from_secs(61));
        assert_eq!(limiter.used().await, 1);
    }

    #[tokio::test]
    async fn test_wait_accounts_for_elapsed_time() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter_with(Arc::clone(&clock), 2);

        limiter.acquire().await;
        clock.advance(Duration::from_secs(20));
        limiter.acquire().await;
        clock.advance(Duration::from_secs(10));

        // 30s into the window: 30s left plus the 1s margin
        assert_eq!(limiter.acquire().await, Duration::from_secs(31));
    }

    #[tokio::test]
    async fn test_window_elapsed_resets_without_sleeping() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter_with(Arc::clone(&clock), 2);

        limiter.acquire().await;
        limiter.acquire().await;
        clock.advance(Duration::from_secs(60));

        assert_eq!(limiter.acquire().await, Duration::ZERO);
        assert_eq!(limiter.used().await, 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_zero_cap_admits_one_per_window() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter_with(Arc::clone(&clock), 0);

        assert_eq!(limiter.acquire().await, Duration::ZERO);
        assert_eq!(limiter.acquire().await, Duration::from_secs(61));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_budget() {
        let clock = Arc::new(ManualClock::new());
        let limiter = Arc::new(limiter_with(Arc::clone(&clock), 3));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();

        let mut waits = Vec::new();
        for handle in handles {
            waits.push(handle.await.unwrap());
        }
        assert_eq!(waits.iter().filter(|w| w.is_zero()).count(), 3);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(61)]);
    }
}
