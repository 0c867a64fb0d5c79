//! Configuration models for engines, mailboxes, and callback runtimes.

pub mod scheduler;

pub use scheduler::{EngineKind, RuntimeConfig, SchedulerConfig};
