//! Fixed-size worker pool for fired callbacks.
//!
//! Workers block on a shared crossbeam channel and exit once every sender is
//! gone. The queue is unbounded so the dispatcher never waits on a callback;
//! a burst of due tasks queues up instead of creating one thread per task.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::core::{Job, SchedulerError, Spawn};

/// Spawner that runs jobs on a fixed set of named worker threads.
///
/// A panicking callback is caught and logged; its worker keeps serving.
pub struct PoolSpawner {
    jobs: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl PoolSpawner {
    /// Start `worker_count` worker threads (at least one).
    ///
    /// # Errors
    ///
    /// `SchedulerError::Spawn` if a worker thread cannot be created. Workers
    /// started before the failure exit when the pool is dropped.
    pub fn new(worker_count: usize) -> Result<Self, SchedulerError> {
        let worker_count = worker_count.max(1);
        let (tx, rx) = unbounded();

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            workers.push(spawn_worker(worker_id, rx.clone())?);
        }

        info!(worker_count, "callback pool started");
        Ok(Self {
            jobs: Mutex::new(Some(tx)),
            workers: Mutex::new(workers),
            worker_count,
        })
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Stop accepting jobs, let workers finish what is queued, and join them.
    ///
    /// A worker calling this on itself is detached instead of joined.
    pub fn shutdown(&self) {
        if self.jobs.lock().take().is_none() {
            return;
        }

        let current = thread::current().id();
        for (worker_id, worker) in self.workers.lock().drain(..).enumerate() {
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                warn!(worker_id, "callback worker panicked");
            }
        }
        info!(worker_count = self.worker_count, "callback pool shut down");
    }
}

impl Spawn for PoolSpawner {
    fn spawn(&self, job: Job) {
        let sent = self
            .jobs
            .lock()
            .as_ref()
            .map(|jobs| jobs.send(job).is_ok());
        if sent != Some(true) {
            warn!("callback pool is shut down; job dropped");
        }
    }
}

impl Drop for PoolSpawner {
    fn drop(&mut self) {
        // workers drain the queue and exit on their own; not joined here
        if self.jobs.lock().take().is_some() {
            debug!("callback pool dropped without explicit shutdown - workers will be detached");
        }
    }
}

fn spawn_worker(
    worker_id: usize,
    jobs: Receiver<Job>,
) -> Result<JoinHandle<()>, SchedulerError> {
    let handle = thread::Builder::new()
        .name(format!("scheduled-task-{worker_id}"))
        .spawn(move || {
            debug!(worker_id, "callback worker started");
            while let Ok(job) = jobs.recv() {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    error!(worker_id, "callback panicked");
                }
            }
            debug!(worker_id, "callback worker exiting");
        })?;
    Ok(handle)
}
