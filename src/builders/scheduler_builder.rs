//! Builders to construct engines and spawners from configuration.

use std::sync::Arc;

use crate::config::{EngineKind, RuntimeConfig, SchedulerConfig};
use crate::core::{HeapScheduler, SchedulerError, Spawn, TaskScheduler, TimeWheelScheduler};
use crate::runtime::{PoolSpawner, ThreadSpawner};

/// Build the spawner selected by `cfg.runtime`.
///
/// # Errors
///
/// - `SchedulerError::InvalidConfig` when the tokio runtime is requested but
///   unavailable (feature disabled, or not called from within a runtime)
/// - `SchedulerError::Spawn` if a pool worker thread cannot be created
pub fn build_spawner(cfg: &SchedulerConfig) -> Result<Arc<dyn Spawn>, SchedulerError> {
    match cfg.runtime {
        RuntimeConfig::Native => Ok(Arc::new(ThreadSpawner::new())),
        RuntimeConfig::Pool => Ok(Arc::new(PoolSpawner::new(cfg.pool_workers)?)),
        #[cfg(feature = "tokio-runtime")]
        RuntimeConfig::Tokio => crate::runtime::TokioSpawner::current()
            .map(|spawner| Arc::new(spawner) as Arc<dyn Spawn>)
            .map_err(|e| SchedulerError::InvalidConfig(format!("tokio runtime unavailable: {e}"))),
        #[cfg(not(feature = "tokio-runtime"))]
        RuntimeConfig::Tokio => Err(SchedulerError::InvalidConfig(
            "tokio runtime requested but the `tokio-runtime` feature is disabled".into(),
        )),
    }
}

/// Validate `cfg` and start the engine it selects.
///
/// # Errors
///
/// - `SchedulerError::InvalidConfig` if validation fails or the runtime is unavailable
/// - `SchedulerError::Spawn` if the dispatcher thread cannot be created
pub fn build_scheduler(cfg: &SchedulerConfig) -> Result<Box<dyn TaskScheduler>, SchedulerError> {
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;
    let spawner = build_spawner(cfg)?;

    let scheduler: Box<dyn TaskScheduler> = match cfg.engine {
        EngineKind::Heap => Box::new(HeapScheduler::new(cfg.clone(), spawner)?),
        EngineKind::TimeWheel => Box::new(TimeWheelScheduler::new(cfg.clone(), spawner)?),
    };
    Ok(scheduler)
}
