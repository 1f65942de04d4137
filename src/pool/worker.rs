//! Fixed-size worker pool draining the shared task queue.

use crate::pool::queue::TaskQueue;
use crate::pool::task::{Control, StopReason, TaskRunner};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub struct WorkerPool;

/// Handle over a started pool: cancel it, or wait for it to wind down.
pub struct PoolHandle {
    workers: Vec<JoinHandle<usize>>,
    queue: Arc<TaskQueue>,
    stop: Arc<AtomicBool>,
}

impl WorkerPool {
    pub fn start(queue: Arc<TaskQueue>, workers: usize, runner: Arc<TaskRunner>) -> PoolHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let handles = (0..workers.max(1))
            .map(|id| {
                let queue = Arc::clone(&queue);
                let runner = Arc::clone(&runner);
                let stop = Arc::clone(&stop);
                tokio::spawn(worker_loop(id, queue, runner, stop))
            })
            .collect();

        PoolHandle {
            workers: handles,
            queue,
            stop,
        }
    }
}

/// Pull and execute tasks until the queue is observed empty or the stop
/// flag is raised. A task signalling a stop condition clears the queue so
/// sibling workers drain to empty on their next iteration.
async fn worker_loop(
    id: usize,
    queue: Arc<TaskQueue>,
    runner: Arc<TaskRunner>,
    stop: Arc<AtomicBool>,
) -> usize {
    let mut completed = 0usize;

    while !stop.load(Ordering::SeqCst) {
        let Some(task) = queue.dequeue() else {
            break;
        };
        let control = runner.run(&task).await;
        completed += 1;

        if let Control::Stop(reason) = control {
            match reason {
                StopReason::ProtectionActive => {
                    error!("protective mechanism detected, abandoning all queued work");
                }
                StopReason::CredentialFound => {
                    info!("credentials found, stopping the run");
                }
            }
            queue.clear();
            stop.store(true, Ordering::SeqCst);
            break;
        }
    }

    debug!("worker {} done after {} tasks", id, completed);
    completed
}

impl PoolHandle {
    /// Abandon pending work; every worker winds down on its next loop
    /// iteration. Safe to call concurrently with ongoing dequeues.
    pub fn cancel(&self) {
        self.queue.clear();
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Wait for every worker to exit; returns how many tasks were
    /// executed in total.
    pub async fn wait(self) -> usize {
        let mut completed = 0;
        for worker in self.workers {
            completed += worker.await.unwrap_or(0);
        }
        completed
    }
}
