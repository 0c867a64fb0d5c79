//! Tests for error types

use delay_scheduler::core::{AppResult, SchedulerError};

#[test]
fn test_invalid_callback_error() {
    let err = SchedulerError::InvalidCallback;
    assert_eq!(format!("{}", err), "invalid callback: no callback supplied");
}

#[test]
fn test_stopped_error() {
    let err = SchedulerError::Stopped;
    assert_eq!(format!("{}", err), "scheduler is stopped");
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("wheel_slots must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: wheel_slots must be greater than 0"
    );
}

#[test]
fn test_spawn_error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
    let err: SchedulerError = io.into();
    assert!(matches!(err, SchedulerError::Spawn(_)));
    assert_eq!(format!("{}", err), "failed to spawn dispatcher thread: no threads left");
}

#[test]
fn test_app_result_wraps_scheduler_error() {
    fn fails() -> AppResult<()> {
        Err::<(), _>(SchedulerError::Stopped)?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err.downcast_ref::<SchedulerError>(), Some(SchedulerError::Stopped)));
}
