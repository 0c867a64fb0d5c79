//! Tokio runtime spawner implementation.

use std::sync::Arc;

use crate::core::{Job, Spawn};

/// Tokio-based spawner that runs callbacks on a runtime's blocking pool.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: Arc<tokio::runtime::Handle>,
}

impl TokioSpawner {
    /// Create a `TokioSpawner` from a tokio runtime handle.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Create a `TokioSpawner` on the runtime the caller is running in.
    ///
    /// # Errors
    ///
    /// Returns the tokio error when called outside a runtime.
    pub fn current() -> Result<Self, tokio::runtime::TryCurrentError> {
        tokio::runtime::Handle::try_current().map(Self::new)
    }
}

impl Spawn for TokioSpawner {
    fn spawn(&self, job: Job) {
        drop(self.handle.spawn_blocking(job));
    }
}
