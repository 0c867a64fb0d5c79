//! Tests for builder modules

use std::sync::mpsc;
use std::time::{Duration, SystemTime};

use delay_scheduler::builders::{build_scheduler, build_spawner};
use delay_scheduler::config::{EngineKind, RuntimeConfig, SchedulerConfig};
use delay_scheduler::{create_scheduler, task_fn, SchedulerError};

#[test]
fn test_build_spawner_native() {
    let spawner = build_spawner(&SchedulerConfig::default()).unwrap();
    let (tx, rx) = mpsc::channel();
    spawner.spawn(Box::new(move || tx.send(7).unwrap()));
    assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), 7);
}

#[test]
fn test_build_spawner_tokio_outside_runtime_fails() {
    let cfg = SchedulerConfig::new().with_runtime(RuntimeConfig::Tokio);
    let err = build_spawner(&cfg).err().unwrap();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig::new().with_mailbox_capacity(0);
    let err = build_scheduler(&cfg).err().unwrap();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_build_scheduler_for_each_engine() {
    for engine in [EngineKind::Heap, EngineKind::TimeWheel] {
        let scheduler = create_scheduler(&SchedulerConfig::new().with_engine(engine)).unwrap();
        let (tx, rx) = mpsc::channel();
        scheduler
            .add_task(
                "",
                SystemTime::now(),
                Some(task_fn(move |_| {
                    let _ = tx.send(());
                })),
                vec![],
            )
            .unwrap();
        assert!(
            rx.recv_timeout(Duration::from_secs(2)).is_ok(),
            "{engine:?} did not fire a due task"
        );
    }
}

#[test]
fn test_build_scheduler_on_worker_pool() {
    let cfg = SchedulerConfig::new()
        .with_runtime(RuntimeConfig::Pool)
        .with_pool_workers(2);
    let scheduler = build_scheduler(&cfg).unwrap();

    let (tx, rx) = mpsc::channel();
    for i in 0..20 {
        let tx = tx.clone();
        scheduler
            .add_task(
                &format!("burst-{i}"),
                SystemTime::now(),
                Some(task_fn(move |_| {
                    let _ = tx.send(std::thread::current().name().map(str::to_owned));
                })),
                vec![],
            )
            .unwrap();
    }

    let mut names = Vec::new();
    for _ in 0..20 {
        names.push(rx.recv_timeout(Duration::from_secs(2)).unwrap());
    }
    names.sort();
    names.dedup();
    assert!(names.len() <= 2, "more threads than workers: {names:?}");
}
