use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces requests evenly to stay under a requests-per-second budget
///
/// Callers reserve slots in lock order; the lock is released before sleeping
/// so later callers can reserve theirs while earlier ones wait.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RateLimiter {
    /// `None` when `requests_per_second` is 0 (unlimited)
    pub fn per_second(requests_per_second: u32) -> Option<Self> {
        if requests_per_second == 0 {
            return None;
        }
        Some(Self {
            interval: Duration::from_secs(1) / requests_per_second,
            next_slot: Mutex::new(Instant::now()),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next request slot
    pub async fn acquire(&self) {
        let slot = self.reserve().await;
        if slot > Instant::now() {
            sleep_until(slot).await;
        }
    }

    async fn reserve(&self) -> Instant {
        let mut next_slot = self.next_slot.lock().await;
        let slot = (*next_slot).max(Instant::now());
        *next_slot = slot + self.interval;
        slot
    }
}
