//! Fixed-window limiter for IP geolocation calls.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::clock::Clock;

#[derive(Debug, Default)]
struct WindowState {
    window_start: Option<Instant>,
    count: u32,
}

/// Admits at most `max_per_window` calls per window.
///
/// The window opens at the first admitted call. When the cap is reached
/// before the window ends, `acquire` sleeps for the rest of the window plus
/// a safety margin and opens a new window. The state lock is held across
/// that sleep, so concurrent callers queue behind it and share one budget.
pub struct FixedWindowLimiter {
    max_per_window: u32,
    window: Duration,
    margin: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<WindowState>,
}

impl FixedWindowLimiter {
    /// A cap of zero is treated as one call per window.
    pub fn new(
        max_per_window: u32,
        window: Duration,
        margin: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            max_per_window: max_per_window.max(1),
            window,
            margin,
            clock,
            state: Mutex::new(WindowState::default()),
        }
    }

    pub fn max_per_window(&self) -> u32 {
        self.max_per_window
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Waits until a call is admitted. Returns how long the caller slept.
    pub async fn acquire(&self) -> Duration {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let elapsed = match state.window_start {
            Some(start) => now.saturating_duration_since(start),
            None => {
                state.window_start = Some(now);
                Duration::ZERO
            }
        };

        if elapsed >= self.window {
            state.window_start = Some(now);
            state.count = 0;
        }

        let mut waited = Duration::ZERO;
        if state.count >= self.max_per_window {
            waited = self.window.saturating_sub(elapsed) + self.margin;
            log::info!(
                "IP lookup limit of {} per {:?} reached, sleeping {:?}",
                self.max_per_window,
                self.window,
                waited
            );
            self.clock.sleep(waited).await;
            state.window_start = Some(self.clock.now());
            state.count = 0;
        }

        state.count += 1;
        waited
    }

    /// Calls admitted in the current window.
    pub async fn used(&self) -> u32 {
        self.state.lock().await.count
    }
}
