use crate::caller_info::NoCaller;
use crate::config::LoggerConfig;
use crate::log_event::LogArg;
use crate::log_sink::{ConsoleMethod, LogLevel, MemoryConsole, Role};
use crate::logger::{LogBridge, Logger};
use crate::relay::HttpRelay;
use crate::{log_debug, log_info};
use log::Log;
use serde_json::json;
use std::sync::Arc;

fn config_at(level: LogLevel) -> LoggerConfig {
    LoggerConfig {
        log_level: level,
        show_timestamp: false,
        use_colors: false,
        ..Default::default()
    }
}

fn server(level: LogLevel) -> (Logger, MemoryConsole) {
    let console = MemoryConsole::new();
    let logger = Logger::server(config_at(level))
        .with_console(Arc::new(console.clone()))
        .with_caller_source(Arc::new(NoCaller));
    (logger, console)
}

fn emit_all(logger: &Logger) {
    logger.error("e", &[]);
    logger.warn("w", &[]);
    logger.info("i", &[]);
    logger.log("l", &[]);
    logger.debug("d", &[]);
}

#[test]
fn test_error_minimum_only_shows_errors() {
    let (logger, console) = server(LogLevel::Error);
    emit_all(&logger);

    let calls = console.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, ConsoleMethod::Error);
    assert_eq!(calls[0].message, "e");
}

#[test]
fn test_each_minimum_admits_levels_at_or_above_it() {
    for (minimum, expected) in [
        (LogLevel::Error, 1),
        (LogLevel::Warn, 2),
        (LogLevel::Info, 3),
        (LogLevel::Log, 4),
        (LogLevel::Debug, 5),
    ] {
        let (logger, console) = server(minimum);
        emit_all(&logger);
        assert_eq!(console.len(), expected, "minimum {minimum}");
    }
}

#[test]
fn test_server_line_is_tagged_and_keeps_args() {
    let (logger, console) = server(LogLevel::Log);
    logger.info(
        "user created",
        &[LogArg::from(json!({"id": 7})), LogArg::from("via signup")],
    );

    let call = &console.calls()[0];
    assert_eq!(call.method, ConsoleMethod::Info);
    assert_eq!(call.format, "[SERVER/INFO] \n→ user created");
    assert_eq!(call.args, vec![json!({"id": 7}), json!("via signup")]);
    assert_eq!(call.render(), "[SERVER/INFO] \n→ user created {\"id\":7} via signup");
}

#[test]
fn test_debug_is_prefixed_and_written_as_log() {
    let (logger, console) = server(LogLevel::Debug);
    log_debug!(logger, "cache miss", 3);

    let call = &console.calls()[0];
    assert_eq!(call.method, ConsoleMethod::Log);
    assert_eq!(call.message, "[DEBUG] cache miss");
    assert_eq!(call.args, vec![json!(3)]);
}

#[test]
fn test_tracked_caller_points_at_the_call_site() {
    let console = MemoryConsole::new();
    let logger = Logger::server(config_at(LogLevel::Log)).with_console(Arc::new(console.clone()));
    log_info!(logger, "here");

    let call = &console.calls()[0];
    assert!(
        call.format.starts_with("[SERVER/INFO] src/tests/logger.rs:"),
        "got {}",
        call.format
    );
}

#[test]
fn test_update_config_applies_to_later_calls() {
    let (logger, console) = server(LogLevel::Log);
    logger.info("before", &[]);
    logger.update_config(config_at(LogLevel::Error));
    logger.info("after", &[]);

    assert_eq!(console.len(), 1);
    assert_eq!(logger.config().log_level, LogLevel::Error);
}

#[test]
fn test_client_without_detail_writes_plain_call() {
    let console = MemoryConsole::new();
    let config = LoggerConfig {
        show_detail_in_browser: false,
        ..config_at(LogLevel::Debug)
    };
    let logger = Logger::client_local(config).with_console(Arc::new(console.clone()));
    assert_eq!(logger.role(), Role::Client);

    logger.warn("careful", &[LogArg::from(1), LogArg::function("onClick")]);
    logger.debug("tick", &[]);

    let calls = console.calls();
    assert_eq!(calls[0].format, "careful");
    assert_eq!(calls[0].args, vec![json!(1), json!("[Function: onClick]")]);
    assert!(calls[0].styles.is_empty());
    assert_eq!(calls[1].format, "%c[DEBUG]%c tick");
}

#[test]
fn test_client_with_detail_uses_browser_format() {
    let console = MemoryConsole::new();
    let logger = Logger::client_local(config_at(LogLevel::Log))
        .with_console(Arc::new(console.clone()))
        .with_caller_source(Arc::new(NoCaller));
    logger.error("boom", &[]);

    assert_eq!(console.calls()[0].format, "[CLIENT/ERROR] → boom");
}

#[test]
fn test_relay_without_runtime_falls_back_locally() {
    let console = MemoryConsole::new();
    let logger = Logger::client(config_at(LogLevel::Log), HttpRelay::new("http://127.0.0.1:9"))
        .with_console(Arc::new(console.clone()))
        .with_caller_source(Arc::new(NoCaller));
    logger.info("offline", &[LogArg::from(json!({"k": "v"}))]);

    let calls = console.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1].method, ConsoleMethod::Error);
    assert_eq!(calls[1].format, "Failed to send log to server:");
    assert_eq!(
        calls[1].args,
        vec![json!("No async runtime available to relay log")]
    );
    assert_eq!(calls[2].method, ConsoleMethod::Info);
    assert_eq!(calls[2].format, "offline");
    assert_eq!(calls[2].args, vec![json!({"k": "v"})]);
}

#[test]
fn test_gated_call_is_not_relayed() {
    let console = MemoryConsole::new();
    let logger = Logger::client(config_at(LogLevel::Error), HttpRelay::new("http://127.0.0.1:9"))
        .with_console(Arc::new(console.clone()));
    logger.info("dropped", &[]);
    assert!(console.is_empty());
}

#[test]
fn test_bridge_drops_transport_and_own_records() {
    let (logger, console) = server(LogLevel::Debug);
    let bridge = LogBridge(Arc::new(logger));

    let meta = |target: &'static str| {
        log::Metadata::builder()
            .target(target)
            .level(log::Level::Debug)
            .build()
    };
    assert!(!bridge.enabled(&meta("reqwest::connect")));
    assert!(!bridge.enabled(&meta("hyper_util::client::legacy::pool")));
    assert!(!bridge.enabled(&meta("log_terminal::relay")));
    assert!(bridge.enabled(&meta("hyperlane::router")));
    assert!(bridge.enabled(&meta("my_app::handlers")));

    bridge.log(
        &log::Record::builder()
            .args(format_args!("starting new connection"))
            .target("reqwest::connect")
            .level(log::Level::Debug)
            .build(),
    );
    assert!(console.is_empty());

    bridge.log(
        &log::Record::builder()
            .args(format_args!("order placed"))
            .target("my_app::orders")
            .level(log::Level::Info)
            .build(),
    );
    assert_eq!(console.len(), 1);
    assert_eq!(console.calls()[0].message, "order placed");
}
