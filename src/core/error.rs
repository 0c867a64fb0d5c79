//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// No callback was supplied to `add_task`.
    #[error("invalid callback: no callback supplied")]
    InvalidCallback,
    /// The engine is not running; its mailbox is closed.
    #[error("scheduler is stopped")]
    Stopped,
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The dispatcher thread could not be created.
    #[error("failed to spawn dispatcher thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
