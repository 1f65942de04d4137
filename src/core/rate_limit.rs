use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Paces outbound requests to at most `rate` per second across all
/// workers. A rate of zero disables pacing entirely.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Option<Duration>,
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new(rate: u32) -> Self {
        let interval = if rate == 0 {
            None
        } else {
            Some(Duration::from_secs_f64(1.0 / rate as f64))
        };

        Self {
            interval,
            // backdated so the first request is never delayed
            last_request: Arc::new(Mutex::new(
                Instant::now() - interval.unwrap_or_default(),
            )),
        }
    }

    pub async fn wait(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < interval {
            tokio::time::sleep(interval - elapsed).await;
        }

        *last = Instant::now();
    }
}
