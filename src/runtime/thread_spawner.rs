//! OS-thread spawner: one short-lived thread per fired callback.

use std::thread;

use tracing::error;

use crate::core::{Job, Spawn};

/// Spawner that runs every job on its own named OS thread.
///
/// A callback that panics takes down only its own thread. Thread count is
/// unbounded: a burst of tasks due in the same second starts that many
/// threads. Use [`PoolSpawner`](super::PoolSpawner) to cap it.
#[derive(Debug, Clone, Default)]
pub struct ThreadSpawner {
    stack_size: Option<usize>,
}

impl ThreadSpawner {
    /// Create a spawner using the platform's default stack size.
    #[must_use]
    pub const fn new() -> Self {
        Self { stack_size: None }
    }

    /// Create a spawner whose threads get `stack_size` bytes of stack.
    #[must_use]
    pub const fn with_stack_size(stack_size: usize) -> Self {
        Self {
            stack_size: Some(stack_size),
        }
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, job: Job) {
        let mut builder = thread::Builder::new().name("scheduled-task".into());
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        if let Err(e) = builder.spawn(job) {
            error!(error = %e, "failed to spawn callback thread");
        }
    }
}
