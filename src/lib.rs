//! # Delay Scheduler
//!
//! Run a callback at (or after) a point in wall-clock time, optionally under a
//! key that lets the caller reschedule or cancel it before it fires.
//!
//! Two engines implement the same [`TaskScheduler`] contract:
//!
//! - **[`HeapScheduler`]**: a binary min-heap ordered by fire time. The
//!   dispatcher sleeps until the earliest task is due. Cancellation is lazy:
//!   the record is flagged and discarded when it reaches the root.
//! - **[`TimeWheelScheduler`]**: a circular array of one-second buckets (one
//!   hour by default) with a revolution counter per task. A tick costs time
//!   proportional to one bucket; cancellation removes the entry directly.
//!
//! ## Guarantees
//!
//! - All scheduling state is owned by one dispatcher thread per engine;
//!   callers talk to it through a bounded mailbox, so no locks guard the heap
//!   or wheel. A full mailbox blocks the caller.
//! - At most one pending firing per key. Registering a live key replaces it.
//! - A removal that reaches the dispatcher before the fire time wins.
//! - Tasks with earlier fire times are dispatched first.
//! - Callbacks run fire-and-forget on a [`Spawn`] implementation; a slow or
//!   panicking callback never stalls the dispatcher.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::{Duration, SystemTime};
//! use delay_scheduler::{create_time_wheel_scheduler, task_fn, TaskScheduler};
//!
//! # fn main() -> Result<(), delay_scheduler::SchedulerError> {
//! let scheduler = create_time_wheel_scheduler()?;
//!
//! scheduler.add_task(
//!     "job1",
//!     SystemTime::now() + Duration::from_secs(10),
//!     Some(task_fn(|args| println!("fired with {args:?}"))),
//!     vec!["x".into()],
//! )?;
//!
//! // re-registering the key replaces the first registration
//! scheduler.add_task(
//!     "job1",
//!     SystemTime::now() + Duration::from_secs(2),
//!     Some(task_fn(|_| println!("only this one fires"))),
//!     vec![],
//! )?;
//!
//! scheduler.remove_task("job1")?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Scheduling engines and the facade they share.
pub mod core;
/// Configuration models for engines and runtimes.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters for running fired callbacks.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::config::{EngineKind, RuntimeConfig, SchedulerConfig};
pub use crate::core::{
    task_fn, AppResult, HeapScheduler, SchedulerError, SchedulerStats, Spawn, TaskArgs, TaskFn,
    TaskScheduler, TimeWheelScheduler,
};

/// Create a running heap scheduler with default settings.
///
/// # Errors
///
/// `SchedulerError::Spawn` if the dispatcher thread cannot be created.
pub fn create_heap_scheduler() -> Result<Box<dyn TaskScheduler>, SchedulerError> {
    Ok(Box::new(HeapScheduler::with_defaults()?))
}

/// Create a running time-wheel scheduler with default settings.
///
/// # Errors
///
/// `SchedulerError::Spawn` if the dispatcher thread cannot be created.
pub fn create_time_wheel_scheduler() -> Result<Box<dyn TaskScheduler>, SchedulerError> {
    Ok(Box::new(TimeWheelScheduler::with_defaults()?))
}

/// Create the running scheduler described by `cfg`.
///
/// # Errors
///
/// See [`builders::build_scheduler`].
pub fn create_scheduler(cfg: &SchedulerConfig) -> Result<Box<dyn TaskScheduler>, SchedulerError> {
    builders::build_scheduler(cfg)
}

/// Create the running scheduler described by `SCHEDULER_*` environment
/// variables, loading a `.env` file first if one exists.
///
/// # Errors
///
/// Fails if a variable is malformed, the resulting configuration is invalid,
/// or the scheduler cannot be started.
pub fn create_scheduler_from_env() -> AppResult<Box<dyn TaskScheduler>> {
    use anyhow::Context;

    let cfg = SchedulerConfig::from_env()
        .map_err(anyhow::Error::msg)
        .context("loading scheduler configuration from the environment")?;
    let scheduler = builders::build_scheduler(&cfg)
        .with_context(|| format!("starting {:?} scheduler", cfg.engine))?;
    Ok(scheduler)
}
