//! Minimum-interval call spacing.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Enforces a minimum gap between successive calls.
///
/// The lock is held across the wait, so overlapping callers on the same
/// throttle queue up and each still observes the full interval.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Create a throttle; a zero interval never waits.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until the interval since the previous call has elapsed, then
    /// record this call. Returns how long the caller was held back.
    pub async fn acquire(&self) -> Duration {
        let mut last_call = self.last_call.lock().await;

        let mut waited = Duration::ZERO;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                waited = self.min_interval - elapsed;
                tokio::time::sleep(waited).await;
            }
        }

        *last_call = Some(Instant::now());
        waited
    }
}
