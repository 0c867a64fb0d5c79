//! Tests for callback spawners

use std::sync::mpsc;
use std::time::Duration;

use delay_scheduler::core::Spawn;
use delay_scheduler::runtime::ThreadSpawner;

#[test]
fn test_thread_spawner_runs_job_on_named_thread() {
    let spawner = ThreadSpawner::new();
    let (tx, rx) = mpsc::channel();
    spawner.spawn(Box::new(move || {
        let name = std::thread::current().name().map(str::to_owned);
        tx.send(name).unwrap();
    }));
    let name = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(name.as_deref(), Some("scheduled-task"));
}

#[test]
fn test_thread_spawner_with_stack_size() {
    let spawner = ThreadSpawner::with_stack_size(256 * 1024);
    let (tx, rx) = mpsc::channel();
    spawner.spawn(Box::new(move || tx.send(123).unwrap()));
    assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), 123);
}

#[cfg(feature = "tokio-runtime")]
mod tokio_runtime {
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use delay_scheduler::config::{EngineKind, RuntimeConfig, SchedulerConfig};
    use delay_scheduler::core::{HeapScheduler, Spawn, TaskScheduler};
    use delay_scheduler::runtime::TokioSpawner;
    use delay_scheduler::{create_scheduler, task_fn};

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_tokio_spawner_spawn() {
        let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

        let (tx, rx) = tokio::sync::oneshot::channel();
        spawner.spawn(Box::new(move || {
            tx.send(123).unwrap();
        }));

        let result = rx.await.expect("oneshot result");
        assert_eq!(result, 123);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_heap_scheduler_on_tokio_blocking_pool() {
        let spawner = Arc::new(TokioSpawner::current().unwrap());
        let scheduler = HeapScheduler::new(SchedulerConfig::new(), spawner).unwrap();

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        scheduler
            .add_task(
                "tokio-job",
                SystemTime::now() + Duration::from_secs(1),
                Some(task_fn(move |args| {
                    let _ = tx.send(args);
                })),
                vec![serde_json::json!(1)],
            )
            .unwrap();

        let args = tokio::time::timeout(Duration::from_secs(3), rx.recv())
            .await
            .expect("callback did not run")
            .unwrap();
        assert_eq!(args, vec![serde_json::json!(1)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_configured_tokio_runtime_builds() {
        let cfg = SchedulerConfig::new()
            .with_engine(EngineKind::TimeWheel)
            .with_runtime(RuntimeConfig::Tokio);
        let scheduler = create_scheduler(&cfg).unwrap();
        assert!(scheduler.remove_task("absent").is_ok());
    }
}
