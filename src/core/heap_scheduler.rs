//! Heap-ordered delay queue engine.
//!
//! The dispatcher loop sleeps exactly until the earliest pending fire time (or
//! an idle interval when nothing is scheduled) and re-evaluates the heap root
//! after every command. There is no per-task timer.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::config::SchedulerConfig;
use crate::runtime::ThreadSpawner;

use super::dispatcher::{Engine, Runner};
use super::error::SchedulerError;
use super::heap::TaskHeap;
use super::scheduler::{SchedulerStats, Spawn, TaskScheduler};
use super::task::{DueTask, TaskArgs, TaskFn, TaskSpec};

/// Heap state owned by the dispatcher thread.
pub(crate) struct HeapEngine {
    heap: TaskHeap,
    idle_wake: Duration,
    next_wake: Duration,
}

impl Engine for HeapEngine {
    const NAME: &'static str = "heap";

    fn new(config: &SchedulerConfig) -> Self {
        let idle_wake = Duration::from_secs(config.idle_wake_secs);
        Self {
            heap: TaskHeap::new(),
            idle_wake,
            next_wake: idle_wake,
        }
    }

    fn schedule(&mut self, spec: TaskSpec, _due: &mut Vec<DueTask>) {
        self.heap.push(spec.key, spec.at, spec.callback, spec.args);
    }

    fn cancel(&mut self, key: &str) -> bool {
        self.heap.cancel(key)
    }

    fn advance(&mut self, due: &mut Vec<DueTask>) {
        self.next_wake = self
            .heap
            .pop_due(SystemTime::now(), due)
            .unwrap_or(self.idle_wake);
    }

    fn next_wake(&self) -> Duration {
        self.next_wake
    }

    fn pending(&self) -> usize {
        self.heap.len()
    }
}

/// Scheduler backed by a binary min-heap.
///
/// Fires tasks in fire-time order with second granularity and no upper bound on
/// how far ahead a task may be scheduled. Cancelled tasks are reclaimed lazily.
pub struct HeapScheduler {
    runner: Runner<HeapEngine>,
}

impl HeapScheduler {
    /// Create and start a heap scheduler.
    ///
    /// # Errors
    ///
    /// - `SchedulerError::InvalidConfig` if the configuration is invalid
    /// - `SchedulerError::Spawn` if the dispatcher thread cannot be created
    pub fn new(config: SchedulerConfig, spawner: Arc<dyn Spawn>) -> Result<Self, SchedulerError> {
        config.validate().map_err(SchedulerError::InvalidConfig)?;
        let scheduler = Self {
            runner: Runner::new(config, spawner),
        };
        scheduler.start()?;
        Ok(scheduler)
    }

    /// Create and start a heap scheduler with default settings, running
    /// callbacks on their own threads.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Spawn` if the dispatcher thread cannot be created.
    pub fn with_defaults() -> Result<Self, SchedulerError> {
        Self::new(SchedulerConfig::default(), Arc::new(ThreadSpawner::new()))
    }

    /// Start the dispatcher loop with empty state. No-op while running.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Spawn` if the dispatcher thread cannot be created.
    pub fn start(&self) -> Result<(), SchedulerError> {
        self.runner.start()
    }

    /// Stop the dispatcher loop and wait for it to exit. Pending tasks are discarded.
    pub fn stop(&self) {
        self.runner.stop();
    }

    /// Whether the dispatcher loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.runner.is_running()
    }
}

impl TaskScheduler for HeapScheduler {
    fn add_task(
        &self,
        key: &str,
        at: SystemTime,
        callback: Option<TaskFn>,
        args: TaskArgs,
    ) -> Result<(), SchedulerError> {
        self.runner.submit(key, at, callback, args, false)
    }

    fn update_task(
        &self,
        key: &str,
        at: SystemTime,
        callback: Option<TaskFn>,
        args: TaskArgs,
    ) -> Result<(), SchedulerError> {
        self.runner.submit(key, at, callback, args, true)
    }

    fn remove_task(&self, key: &str) -> Result<(), SchedulerError> {
        self.runner.remove(key)
    }

    fn stats(&self) -> SchedulerStats {
        self.runner.stats()
    }
}
