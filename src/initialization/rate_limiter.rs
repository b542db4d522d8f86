//! Rate limiter initialization.

use std::sync::Arc;

use crate::config::{Config, RATE_LIMIT_SAFETY_MARGIN};
use crate::rate_limiter::{FixedWindowLimiter, TokioClock};

/// Initializes the IP lookup limiter from the run configuration.
///
/// The limiter is the only state shared across domains; it is handed to the
/// orchestrator for every enrichment of the run.
pub fn init_rate_limiter(config: &Config) -> Arc<FixedWindowLimiter> {
    Arc::new(FixedWindowLimiter::new(
        config.ip_lookups_per_window,
        config.window(),
        RATE_LIMIT_SAFETY_MARGIN,
        Arc::new(TokioClock),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_rate_limiter_uses_config() {
        let config = Config {
            ip_lookups_per_window: 7,
            window_seconds: 30,
            ..Default::default()
        };
        let limiter = init_rate_limiter(&config);
        assert_eq!(limiter.max_per_window(), 7);
        assert_eq!(limiter.window(), std::time::Duration::from_secs(30));
    }
}
