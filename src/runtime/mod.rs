//! Runtime adapters that run fired callbacks off the dispatcher thread.

pub mod pool_spawner;
pub mod thread_spawner;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;

pub use pool_spawner::PoolSpawner;
pub use thread_spawner::ThreadSpawner;
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
