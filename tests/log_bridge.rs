//! Records from the `log` facade go through the unified logger

use std::sync::Arc;

use log_terminal::{
    logger::LogBridge, ConsoleMethod, LogLevel, Logger, LoggerConfig, MemoryConsole,
};

#[test]
fn facade_records_are_gated_and_formatted() {
    let console = MemoryConsole::new();
    let config = LoggerConfig {
        log_level: LogLevel::Info,
        show_timestamp: false,
        use_colors: false,
        ..Default::default()
    };
    let logger = Arc::new(Logger::server(config).with_console(Arc::new(console.clone())));
    LogBridge::install(Arc::clone(&logger)).expect("bridge installs once");

    log::warn!("queue depth {}", 12);
    log::info!("started");
    log::debug!("hidden at info");
    log::trace!("hidden too");

    let calls = console.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, ConsoleMethod::Warn);
    assert_eq!(calls[0].message, "queue depth 12");
    assert!(calls[0].format.starts_with("[SERVER/WARN] "));
    assert!(calls[0].format.contains("log_bridge.rs:"));
    assert_eq!(calls[1].method, ConsoleMethod::Info);

    logger.update_config(LoggerConfig {
        log_level: LogLevel::Debug,
        ..(*logger.config()).clone()
    });
    log::debug!("now visible");

    let calls = console.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].method, ConsoleMethod::Log);
    assert_eq!(calls[2].message, "[DEBUG] now visible");
}
