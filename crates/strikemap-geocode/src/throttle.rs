//! Minimum-interval throttle for sequential requests.

use std::time::Duration;

use tokio::time::Instant;

/// Spaces consecutive calls to [`Throttle::wait`] at least `min_delay` apart.
///
/// The first call returns immediately. Holds no lock; callers drive it from a
/// single task, one request at a time.
#[derive(Debug)]
pub struct Throttle {
    min_delay: Duration,
    last: Option<Instant>,
}

impl Throttle {
    #[must_use]
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last: None,
        }
    }

    #[must_use]
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Sleeps until `min_delay` has passed since the previous call.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            tokio::time::sleep_until(last + self.min_delay).await;
        }
        self.last = Some(Instant::now());
    }
}
