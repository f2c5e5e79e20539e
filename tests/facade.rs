//! 公開マクロを外部クレートとして使う統合テスト

use sitelog::backend::MemoryBackends;
use sitelog::report::Resolution;
use sitelog::{
    debug, error, info, logger, report, trace, warn, Config, ErrorTypeRegistry, Level, LogContext,
    Marker,
};
use std::io;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("入力が不正です: {0}")]
struct ValidationError(&'static str);

fn context(config: Config, backends: &MemoryBackends) -> LogContext {
    let registry = ErrorTypeRegistry::new().register::<ValidationError>("ValidationError");
    LogContext::new(&config, Arc::new(backends.clone()), Arc::new(registry))
}

fn suppressing() -> Config {
    Config {
        suppressible_error: Some("ValidationError".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_level_macros_decorate_with_call_site() {
    let backends = MemoryBackends::new();
    let ctx = context(Config::default(), &backends);

    let line = line!() + 1;
    info!(ctx, "user {} logged in", "alice");

    let records = backends.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].logger, "facade");
    assert_eq!(records[0].level, Level::Info);
    assert!(records[0].message.ends_with(&format!(
        "]-[facade.test_level_macros_decorate_with_call_site({})]-user alice logged in",
        line
    )));
}

#[test]
fn test_all_levels_respect_threshold() {
    let backends = MemoryBackends::new().with_threshold(Level::Info);
    let ctx = context(Config::default(), &backends);

    trace!(ctx, "trace");
    debug!(ctx, "debug");
    info!(ctx, "info");
    warn!(ctx, "warn");
    error!(ctx, "error");

    let levels: Vec<Level> = backends.records().iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![Level::Info, Level::Warn, Level::Error]);
}

#[test]
fn test_marker_and_error_prefixes() {
    let backends = MemoryBackends::new();
    let ctx = context(Config::default(), &backends);
    let marker = Marker::new("AUDIT");
    let err = io::Error::new(io::ErrorKind::Other, "disk full");

    warn!(ctx, marker: &marker, "quota {}%", 95);
    error!(ctx, marker: &marker, err: &err, "write failed");

    let records = backends.records();
    assert_eq!(records[0].marker.as_deref(), Some("AUDIT"));
    assert!(records[0].message.ends_with("-quota 95%"));
    assert_eq!(records[1].level, Level::Error);
    assert_eq!(records[1].error.as_deref(), Some("disk full"));
}

#[test]
fn test_error_macro_demotes_suppressible_error() {
    let backends = MemoryBackends::new();
    let ctx = context(suppressing(), &backends);
    let err = ValidationError("email");

    error!(ctx, err: &err, "failed op");

    assert!(backends.records_at(Level::Error).is_empty());
    let infos = backends.records_at(Level::Info);
    assert_eq!(infos.len(), 1);
    assert!(infos[0]
        .message
        .ends_with("-failed op : facade::ValidationError: 入力が不正です: email"));
    assert!(infos[0].error.is_none());
}

#[test]
fn test_report_macro_without_suppressible_type() {
    let backends = MemoryBackends::new();
    let ctx = context(Config::default(), &backends);
    let err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");

    report!(ctx, &err, "failed op");

    let errors = backends.records_at(Level::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.ends_with("-failed op"));
    assert_eq!(errors[0].error.as_deref(), Some("pipe closed"));
    assert!(backends.records_at(Level::Info).is_empty());
    assert_eq!(ctx.reporter().resolution(), Resolution::Absent);
}

#[test]
fn test_logger_macro_is_cached_per_module() {
    let backends = MemoryBackends::new();
    let ctx = context(Config::default(), &backends);

    let first = logger!(ctx);
    let second = logger!(ctx);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(backends.created(), 1);

    info!(first, "direct");
    assert!(backends.records()[0].message.ends_with("-direct"));
}

#[test]
fn test_line_breaks_removed_when_configured() {
    let backends = MemoryBackends::new();
    let config = Config {
        remove_line_breaks: true,
        ..Default::default()
    };
    let ctx = context(config, &backends);

    info!(ctx, "first\nsecond");

    assert!(backends.records()[0].message.ends_with("-first second"));
}

#[test]
fn test_location_aware_backend_gets_plain_message() {
    let backends = MemoryBackends::new().location_aware(true);
    let ctx = context(Config::default(), &backends);

    info!(ctx, "plain {}", 1);

    let records = backends.records();
    assert_eq!(records[0].message, "plain 1");
    assert_eq!(
        records[0].caller.as_deref(),
        Some("sitelog::context::LogContext")
    );
    let location = records[0].location.unwrap();
    assert_eq!(location.module, "facade");
    assert_eq!(location.function, "test_location_aware_backend_gets_plain_message");
}
