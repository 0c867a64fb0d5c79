//! Scheduler facade shared by both engines, plus statistics and the spawn seam.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::SystemTime;

use super::error::SchedulerError;
use super::task::{TaskArgs, TaskFn};

/// Capability contract satisfied by every engine.
///
/// ```rust,ignore
/// use std::time::{Duration, SystemTime};
/// use delay_scheduler::{create_heap_scheduler, task_fn};
///
/// let scheduler = create_heap_scheduler()?;
/// scheduler.add_task(
///     "report",
///     SystemTime::now() + Duration::from_secs(30),
///     Some(task_fn(|args| println!("firing with {args:?}"))),
///     vec!["daily".into()],
/// )?;
/// scheduler.remove_task("report")?;
/// ```
pub trait TaskScheduler: Send + Sync {
    /// Register `callback` to run with `args` once `at` is reached.
    ///
    /// An empty `key` gets a generated one. A key that is already live is
    /// replaced: the earlier registration never fires.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidCallback` if `callback` is `None`
    /// - `SchedulerError::Stopped` if the engine is not running
    fn add_task(
        &self,
        key: &str,
        at: SystemTime,
        callback: Option<TaskFn>,
        args: TaskArgs,
    ) -> Result<(), SchedulerError>;

    /// Replace the registration under `key`. Same semantics as [`add_task`](Self::add_task).
    ///
    /// # Errors
    ///
    /// Same as [`add_task`](Self::add_task).
    fn update_task(
        &self,
        key: &str,
        at: SystemTime,
        callback: Option<TaskFn>,
        args: TaskArgs,
    ) -> Result<(), SchedulerError>;

    /// Cancel the task under `key`. Empty, unknown, fired or already-cancelled
    /// keys are silently ignored.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Stopped` if the engine is not running.
    fn remove_task(&self, key: &str) -> Result<(), SchedulerError>;

    /// Snapshot of the engine's counters.
    fn stats(&self) -> SchedulerStats;
}

/// A unit of fire-and-forget work handed to a spawner.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Abstraction for running fired callbacks off the dispatcher thread.
pub trait Spawn: Send + Sync + 'static {
    /// Run `job` concurrently. Must not block on its completion.
    fn spawn(&self, job: Job);
}

/// Statistics about scheduler activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Registrations accepted into the mailbox.
    pub submitted_tasks: u64,

    /// Removals that hit a live task.
    pub cancelled_tasks: u64,

    /// Callbacks handed to the spawner.
    pub fired_tasks: u64,

    /// Live tasks waiting to fire, as of the last loop turn.
    pub pending_tasks: usize,
}

/// Internal counters shared between the facade and the dispatcher loop.
#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub submitted_tasks: AtomicU64,
    pub cancelled_tasks: AtomicU64,
    pub fired_tasks: AtomicU64,
    pub pending_tasks: AtomicUsize,
}

impl SchedulerCounters {
    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            submitted_tasks: self.submitted_tasks.load(Ordering::Relaxed),
            cancelled_tasks: self.cancelled_tasks.load(Ordering::Relaxed),
            fired_tasks: self.fired_tasks.load(Ordering::Relaxed),
            pending_tasks: self.pending_tasks.load(Ordering::Relaxed),
        }
    }
}
