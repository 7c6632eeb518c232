use super::clock::Clock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// enforces a minimum spacing between permits. callers queue on the permit
/// lock in arrival order, so concurrent callers are released one interval
/// apart.
pub struct Throttle {
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    last_permit: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(clock: Arc<dyn Clock>, min_interval: Duration) -> Throttle {
        Throttle {
            clock,
            min_interval,
            last_permit: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// waits until `min_interval` has passed since the previous permit was
    /// granted. the first permit is granted immediately.
    pub async fn acquire(&self) {
        let mut last_permit = self.last_permit.lock().await;
        if let Some(previous) = *last_permit {
            let ready_at = previous + self.min_interval;
            let now = self.clock.now();
            if now < ready_at {
                let wait = ready_at - now;
                log::debug!("throttle waiting {}ms for next permit", wait.as_millis());
                self.clock.sleep(wait).await;
            }
        }
        *last_permit = Some(self.clock.now());
    }
}
