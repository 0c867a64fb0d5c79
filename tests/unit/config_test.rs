//! Tests for configuration validation and parsing

use delay_scheduler::config::{EngineKind, RuntimeConfig, SchedulerConfig};

#[test]
fn test_scheduler_config_defaults() {
    let cfg = SchedulerConfig::default();
    assert_eq!(cfg.engine, EngineKind::Heap);
    assert_eq!(cfg.mailbox_capacity, 100);
    assert_eq!(cfg.idle_wake_secs, 86_400);
    assert_eq!(cfg.wheel_slots, 3600);
    assert_eq!(cfg.runtime, RuntimeConfig::Native);
    assert!(cfg.pool_workers >= 1);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_scheduler_config_invalid_mailbox_capacity() {
    let invalid = SchedulerConfig::new().with_mailbox_capacity(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_idle_wake() {
    let invalid = SchedulerConfig::new().with_idle_wake_secs(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_wheel_slots() {
    let invalid = SchedulerConfig::new().with_wheel_slots(0);
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("wheel_slots"));
}

#[test]
fn test_scheduler_config_invalid_pool_workers() {
    let invalid = SchedulerConfig::new().with_pool_workers(0);
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("pool_workers"));
}

#[test]
fn test_scheduler_config_pool_runtime_from_json() {
    let cfg = SchedulerConfig::from_json_str(r#"{ "runtime": "pool", "pool_workers": 3 }"#).unwrap();
    assert_eq!(cfg.runtime, RuntimeConfig::Pool);
    assert_eq!(cfg.pool_workers, 3);
}

#[test]
fn test_scheduler_config_from_json_partial() {
    let cfg = SchedulerConfig::from_json_str(
        r#"{ "engine": "time_wheel", "wheel_slots": 60, "runtime": "tokio" }"#,
    )
    .unwrap();
    assert_eq!(cfg.engine, EngineKind::TimeWheel);
    assert_eq!(cfg.wheel_slots, 60);
    assert_eq!(cfg.runtime, RuntimeConfig::Tokio);
    // unspecified fields keep defaults
    assert_eq!(cfg.mailbox_capacity, 100);
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{ "mailbox_capacity": 0 }"#).is_err());
    assert!(SchedulerConfig::from_json_str(r#"{ "engine": "skiplist" }"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_scheduler_config_json_roundtrip() {
    let cfg = SchedulerConfig::new()
        .with_engine(EngineKind::TimeWheel)
        .with_mailbox_capacity(8);
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"time_wheel\""));
    assert_eq!(SchedulerConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn test_engine_kind_from_str() {
    assert_eq!("heap".parse::<EngineKind>().unwrap(), EngineKind::Heap);
    assert_eq!(" Time_Wheel ".parse::<EngineKind>().unwrap(), EngineKind::TimeWheel);
    assert_eq!("wheel".parse::<EngineKind>().unwrap(), EngineKind::TimeWheel);
    assert!("fifo".parse::<EngineKind>().is_err());
}

#[test]
fn test_runtime_config_from_str() {
    assert_eq!("native".parse::<RuntimeConfig>().unwrap(), RuntimeConfig::Native);
    assert_eq!("thread".parse::<RuntimeConfig>().unwrap(), RuntimeConfig::Native);
    assert_eq!("TOKIO".parse::<RuntimeConfig>().unwrap(), RuntimeConfig::Tokio);
    assert_eq!("pool".parse::<RuntimeConfig>().unwrap(), RuntimeConfig::Pool);
    assert!("wasm".parse::<RuntimeConfig>().is_err());
}

#[test]
fn test_scheduler_config_from_env() {
    // the only test touching these variables
    std::env::set_var("SCHEDULER_ENGINE", "time_wheel");
    std::env::set_var("SCHEDULER_WHEEL_SLOTS", "120");
    let cfg = SchedulerConfig::from_env().unwrap();
    assert_eq!(cfg.engine, EngineKind::TimeWheel);
    assert_eq!(cfg.wheel_slots, 120);

    std::env::set_var("SCHEDULER_WHEEL_SLOTS", "many");
    let err = SchedulerConfig::from_env().unwrap_err();
    assert!(err.contains("SCHEDULER_WHEEL_SLOTS"));

    std::env::remove_var("SCHEDULER_ENGINE");
    std::env::remove_var("SCHEDULER_WHEEL_SLOTS");
}
