//! Task records, callbacks and the commands carried by an engine mailbox.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use serde_json::Value;

/// Arguments handed to a callback when it fires. The scheduler never inspects them.
pub type TaskArgs = Vec<Value>;

/// Shared callback reference invoked with the task's arguments.
pub type TaskFn = Arc<dyn Fn(TaskArgs) + Send + Sync + 'static>;

/// Wrap a closure as a [`TaskFn`].
pub fn task_fn<F>(f: F) -> TaskFn
where
    F: Fn(TaskArgs) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Generate a fresh key for a task registered without one.
#[must_use]
pub fn generate_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A registration request as it travels through the mailbox.
pub(crate) struct TaskSpec {
    pub key: String,
    pub at: SystemTime,
    pub callback: TaskFn,
    pub args: TaskArgs,
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("key", &self.key)
            .field("at", &self.at)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Requests applied by a dispatcher loop, strictly in arrival order.
#[derive(Debug)]
pub(crate) enum Command {
    /// Register a task, replacing any live task under the same key.
    Add(TaskSpec),
    /// Same shape as `Add`; kept distinct so logs show caller intent.
    Update(TaskSpec),
    /// Cancel the live task registered under the key, if any.
    Cancel(String),
}

/// A task whose fire time has been reached, ready to hand to a spawner.
pub struct DueTask {
    /// Key the task was registered under.
    pub key: String,
    /// Callback to invoke.
    pub callback: TaskFn,
    /// Arguments for the callback.
    pub args: TaskArgs,
}

impl DueTask {
    /// Consume the task and run its callback on the current thread.
    pub fn run(self) {
        (self.callback)(self.args);
    }
}

impl fmt::Debug for DueTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DueTask")
            .field("key", &self.key)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
