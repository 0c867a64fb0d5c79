//! Tests for utility functions

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use delay_scheduler::util::{init_tracing, unix_secs, DEFAULT_LOG_DIRECTIVE};

#[test]
fn test_unix_secs_matches_epoch_offset() {
    let at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    assert_eq!(unix_secs(at), 1_700_000_000);
}

#[test]
fn test_unix_secs_ignores_sub_second_part() {
    let base = UNIX_EPOCH + Duration::from_secs(42);
    assert_eq!(unix_secs(base + Duration::from_millis(999)), 42);
}

#[test]
fn test_unix_secs_tracks_system_time() {
    let expected = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let secs = unix_secs(SystemTime::now());
    assert!(secs - i64::try_from(expected).unwrap() <= 1);
}

#[test]
fn test_init_tracing_is_idempotent() {
    assert!(DEFAULT_LOG_DIRECTIVE.starts_with("delay_scheduler"));
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialised twice without panicking");
}
