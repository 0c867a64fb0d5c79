//! Scheduling engines, their shared dispatcher loop, and the facade they implement.

mod dispatcher;
pub mod error;
pub mod heap;
pub mod heap_scheduler;
pub mod scheduler;
pub mod task;
pub mod wheel;
pub mod wheel_scheduler;

pub use error::{AppResult, SchedulerError};
pub use heap::TaskHeap;
pub use heap_scheduler::HeapScheduler;
pub use scheduler::{Job, SchedulerStats, Spawn, TaskScheduler};
pub use task::{generate_key, task_fn, DueTask, TaskArgs, TaskFn};
pub use wheel::{Placement, TimeWheel, DEFAULT_WHEEL_SLOTS};
pub use wheel_scheduler::TimeWheelScheduler;
