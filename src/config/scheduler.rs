//! Scheduler configuration structures.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::wheel::DEFAULT_WHEEL_SLOTS;

/// Scheduling algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Binary min-heap ordered by fire time.
    #[default]
    Heap,
    /// One-second time wheel with revolution counters.
    TimeWheel,
}

/// Where fired callbacks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeConfig {
    /// A dedicated OS thread per callback.
    #[default]
    Native,
    /// Tokio's blocking pool on the ambient runtime.
    Tokio,
    /// A fixed set of worker threads (`pool_workers`).
    Pool,
}

/// Root scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Engine to build.
    pub engine: EngineKind,
    /// Commands buffered before callers block.
    pub mailbox_capacity: usize,
    /// Heap engine wake interval when nothing is scheduled, in seconds.
    pub idle_wake_secs: u64,
    /// Buckets on the time wheel (one second each).
    pub wheel_slots: usize,
    /// Callback runtime.
    pub runtime: RuntimeConfig,
    /// Worker threads for `RuntimeConfig::Pool`.
    pub pool_workers: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Heap,
            mailbox_capacity: 100,
            idle_wake_secs: 24 * 60 * 60,
            wheel_slots: DEFAULT_WHEEL_SLOTS,
            runtime: RuntimeConfig::Native,
            pool_workers: num_cpus::get(),
        }
    }
}

impl SchedulerConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine kind.
    #[must_use]
    pub const fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Set the mailbox capacity.
    #[must_use]
    pub const fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    /// Set the idle wake interval of the heap engine.
    #[must_use]
    pub const fn with_idle_wake_secs(mut self, secs: u64) -> Self {
        self.idle_wake_secs = secs;
        self
    }

    /// Set the number of wheel buckets.
    #[must_use]
    pub const fn with_wheel_slots(mut self, slots: usize) -> Self {
        self.wheel_slots = slots;
        self
    }

    /// Set the callback runtime.
    #[must_use]
    pub const fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Set the worker count used by `RuntimeConfig::Pool`.
    #[must_use]
    pub const fn with_pool_workers(mut self, workers: usize) -> Self {
        self.pool_workers = workers;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.mailbox_capacity == 0 {
            return Err("mailbox_capacity must be greater than 0".into());
        }
        if self.idle_wake_secs == 0 {
            return Err("idle_wake_secs must be greater than 0".into());
        }
        if self.wheel_slots == 0 {
            return Err("wheel_slots must be greater than 0".into());
        }
        if self.pool_workers == 0 {
            return Err("pool_workers must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `SCHEDULER_*` environment variables, loading a
    /// `.env` file first if one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed variable or validation failure.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();

        let mut cfg = Self::default();
        if let Some(engine) = read_env("SCHEDULER_ENGINE")? {
            cfg.engine = engine;
        }
        if let Some(capacity) = read_env("SCHEDULER_MAILBOX_CAPACITY")? {
            cfg.mailbox_capacity = capacity;
        }
        if let Some(secs) = read_env("SCHEDULER_IDLE_WAKE_SECS")? {
            cfg.idle_wake_secs = secs;
        }
        if let Some(slots) = read_env("SCHEDULER_WHEEL_SLOTS")? {
            cfg.wheel_slots = slots;
        }
        if let Some(runtime) = read_env("SCHEDULER_RUNTIME")? {
            cfg.runtime = runtime;
        }
        if let Some(workers) = read_env("SCHEDULER_POOL_WORKERS")? {
            cfg.pool_workers = workers;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heap" => Ok(Self::Heap),
            "time_wheel" | "wheel" => Ok(Self::TimeWheel),
            other => Err(format!("unknown engine `{other}`")),
        }
    }
}

impl FromStr for RuntimeConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "thread" => Ok(Self::Native),
            "tokio" => Ok(Self::Tokio),
            "pool" => Ok(Self::Pool),
            other => Err(format!("unknown runtime `{other}`")),
        }
    }
}

fn read_env<T>(name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("{name}: {e}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(format!("{name}: {e}")),
    }
}
