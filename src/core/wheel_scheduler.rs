//! Time-wheel engine.
//!
//! The dispatcher loop wakes on every one-second boundary since the wheel was
//! started and ticks the cursor until it matches elapsed time, so a late wake
//! catches up instead of dropping ticks.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use tracing::trace;

use crate::config::SchedulerConfig;
use crate::runtime::ThreadSpawner;
use crate::util::clock::unix_secs;

use super::dispatcher::{Engine, Runner};
use super::error::SchedulerError;
use super::scheduler::{SchedulerStats, Spawn, TaskScheduler};
use super::task::{DueTask, TaskArgs, TaskFn, TaskSpec};
use super::wheel::TimeWheel;

const TICK: Duration = Duration::from_secs(1);

/// Wheel state owned by the dispatcher thread.
pub(crate) struct WheelEngine {
    wheel: TimeWheel,
    started: Instant,
}

impl Engine for WheelEngine {
    const NAME: &'static str = "time-wheel";

    fn new(config: &SchedulerConfig) -> Self {
        Self {
            wheel: TimeWheel::new(config.wheel_slots, unix_secs(SystemTime::now())),
            started: Instant::now(),
        }
    }

    fn schedule(&mut self, spec: TaskSpec, due: &mut Vec<DueTask>) {
        let placement = self.wheel.place(
            spec.key,
            unix_secs(spec.at),
            spec.callback,
            spec.args,
            due,
        );
        trace!(?placement, cur_index = self.wheel.cur_index(), "task placed on wheel");
    }

    fn cancel(&mut self, key: &str) -> bool {
        self.wheel.remove(key)
    }

    fn advance(&mut self, due: &mut Vec<DueTask>) {
        let elapsed = self.started.elapsed().as_secs();
        let ticks = self.wheel.advance_to(elapsed, due);
        if ticks > 1 {
            trace!(ticks, "wheel caught up after late wake");
        }
    }

    fn next_wake(&self) -> Duration {
        let next_tick = TICK.saturating_mul(
            u32::try_from(self.wheel.cur_index() + 1).unwrap_or(u32::MAX),
        );
        next_tick.saturating_sub(self.started.elapsed())
    }

    fn pending(&self) -> usize {
        self.wheel.len()
    }
}

/// Scheduler backed by a one-second time wheel.
///
/// Each tick costs time proportional to one bucket. Tasks beyond one wheel
/// period wait extra revolutions; sub-second parts of fire times are ignored.
pub struct TimeWheelScheduler {
    runner: Runner<WheelEngine>,
}

impl TimeWheelScheduler {
    /// Create and start a time-wheel scheduler. The wheel's start time is the
    /// moment the dispatcher loop starts.
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

    /// Create and start a one-hour wheel, running callbacks on their own threads.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Spawn` if the dispatcher thread cannot be created.
    pub fn with_defaults() -> Result<Self, SchedulerError> {
        Self::new(SchedulerConfig::default(), Arc::new(ThreadSpawner::new()))
    }

    /// Start the dispatcher loop with an empty wheel and a fresh start time.
    /// No-op while running.
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

impl TaskScheduler for TimeWheelScheduler {
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
