//! Periodic queue sampling for operator feedback.

use crate::pool::queue::TaskQueue;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// One progress observation over a polling interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSample {
    pub pending: usize,
    /// Tasks per second over the last interval. `None` when no progress
    /// was observed: the rate is unknown, not zero.
    pub rate: Option<f64>,
    pub eta: Option<Duration>,
}

impl fmt::Display for ProgressSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rate, self.eta) {
            (Some(rate), Some(eta)) => write!(
                f,
                "{} tasks left / {:.2} tasks per second / {:.2}h left",
                self.pending,
                rate,
                eta.as_secs_f64() / 3600.0
            ),
            _ => write!(f, "{} tasks left / rate unknown", self.pending),
        }
    }
}

pub struct ProgressMonitor {
    queue: Arc<TaskQueue>,
    interval: Duration,
}

impl ProgressMonitor {
    pub fn new(queue: Arc<TaskQueue>, interval: Duration) -> Self {
        Self { queue, interval }
    }

    /// Sleep one interval and report what changed. `None` once the queue
    /// is drained (or cleared), which ends the feedback loop.
    pub async fn next(&mut self) -> Option<ProgressSample> {
        let before = self.queue.size();
        if before == 0 {
            return None;
        }

        let started = Instant::now();
        tokio::time::sleep(self.interval).await;

        Some(sample(before, self.queue.size(), started.elapsed()))
    }
}

fn sample(before: usize, pending: usize, elapsed: Duration) -> ProgressSample {
    let drained = before.saturating_sub(pending);
    let secs = elapsed.as_secs_f64();

    let rate = if drained > 0 && secs > 0.0 {
        Some(drained as f64 / secs)
    } else {
        None
    };
    let eta = rate.map(|rate| Duration::from_secs_f64(pending as f64 / rate));

    ProgressSample { pending, rate, eta }
}
