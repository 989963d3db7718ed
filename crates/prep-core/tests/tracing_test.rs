//! Tests for prep tracing setup.

use std::sync::Mutex;

use prep_core::tracing::setup::{init_tracing, LOG_ENV};

/// Serializes tests that touch `PREP_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_prep_log_debug() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var(LOG_ENV, "prep_analysis=debug");
    init_tracing();
    std::env::remove_var(LOG_ENV);
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    tracing::info!(target: "prep_core", "still initialized once");
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var(LOG_ENV, "=[not a filter");
    init_tracing();
    std::env::remove_var(LOG_ENV);
}
