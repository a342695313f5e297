//! The unified logger
//!
//! A [`Logger`] has a [`Role`]. A server logger formats and writes directly
//! to its console. A client logger writes locally first, then relays the
//! event to the server on a spawned task, falling back to local output if the
//! relay fails. Level gating happens once, before either.

use crate::caller_info::{CallerInfo, CallerInfoSource, TrackedCaller};
use crate::config::LoggerConfig;
use crate::config_loader::load_config;
use crate::errors::LogTerminalError;
use crate::formatter::{
    display_timestamp, format_browser, format_browser_debug_tag, format_terminal, LogLine,
};
use crate::log_event::{wire_args, LogArg, LogEvent, LogMetadata};
use crate::log_sink::{Console, ConsoleCall, LogLevel, Role, TerminalConsole};
use crate::relay::{write_fallback, HttpRelay};
use std::panic::Location;
use std::sync::{Arc, Mutex, RwLock};
use tokio::task::JoinHandle;

pub struct Logger {
    role: Role,
    config: RwLock<Arc<LoggerConfig>>,
    console: Arc<dyn Console>,
    caller_source: Arc<dyn CallerInfoSource>,
    relay: Option<Arc<HttpRelay>>,
    pathname: Option<String>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("role", &self.role)
            .field("config", &self.config())
            .field("relay", &self.relay)
            .field("pathname", &self.pathname)
            .finish()
    }
}

impl Logger {
    fn new(role: Role, config: LoggerConfig, relay: Option<HttpRelay>) -> Self {
        Self {
            role,
            config: RwLock::new(Arc::new(config)),
            console: Arc::new(TerminalConsole),
            caller_source: Arc::new(TrackedCaller),
            relay: relay.map(Arc::new),
            pathname: None,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// A logger that writes decorated lines straight to its console.
    pub fn server(config: LoggerConfig) -> Self {
        Self::new(Role::Server, config, None)
    }

    /// A logger that writes locally and relays every event through `relay`.
    pub fn client(config: LoggerConfig, relay: HttpRelay) -> Self {
        Self::new(Role::Client, config, Some(relay))
    }

    /// A client logger with no relay; output stays local.
    pub fn client_local(config: LoggerConfig) -> Self {
        Self::new(Role::Client, config, None)
    }

    /// Server logger configured from the standard file and the process environment.
    pub fn server_from_env() -> Self {
        Self::server(load_config())
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn with_caller_source(mut self, source: Arc<dyn CallerInfoSource>) -> Self {
        self.caller_source = source;
        self
    }

    /// The page or route the client is on, sent as `metadata.pathname`.
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<LoggerConfig> {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the configuration wholesale. Calls already in progress keep
    /// the snapshot they started with.
    pub fn update_config(&self, config: LoggerConfig) {
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(config);
    }

    #[track_caller]
    pub fn log(&self, message: &str, args: &[LogArg]) {
        self.emit_at(LogLevel::Log, message, args, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: &str, args: &[LogArg]) {
        self.emit_at(LogLevel::Info, message, args, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: &str, args: &[LogArg]) {
        self.emit_at(LogLevel::Warn, message, args, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str, args: &[LogArg]) {
        self.emit_at(LogLevel::Error, message, args, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: &str, args: &[LogArg]) {
        self.emit_at(LogLevel::Debug, message, args, Location::caller());
    }

    #[track_caller]
    pub fn at_level(&self, level: LogLevel, message: &str, args: &[LogArg]) {
        self.emit_at(level, message, args, Location::caller());
    }

    fn emit_at(
        &self,
        level: LogLevel,
        message: &str,
        args: &[LogArg],
        location: &'static Location<'static>,
    ) {
        let config = self.config();
        if !config.should_log(level) {
            return;
        }
        let caller = self.caller_source.caller_info(location);
        self.emit(&config, level, message, args, caller);
    }

    /// Write (and for clients, relay) one event that already passed gating.
    fn emit(
        &self,
        config: &LoggerConfig,
        level: LogLevel,
        message: &str,
        args: &[LogArg],
        caller: CallerInfo,
    ) {
        let method = level.console_method();
        let shown_message = match level {
            LogLevel::Debug => format!("[DEBUG] {message}"),
            _ => message.to_string(),
        };
        let wire = wire_args(args);
        let timestamp = display_timestamp();

        let line = LogLine {
            role: self.role,
            method,
            message: &shown_message,
            args: &wire,
            caller: &caller,
            timestamp: Some(&timestamp),
            editor_link: None,
        };

        let call = match self.role {
            Role::Server => format_terminal(&line, config),
            Role::Client if config.show_detail_in_browser => format_browser(&line, config),
            Role::Client if level == LogLevel::Debug => format_browser_debug_tag(message, &wire),
            Role::Client => ConsoleCall::plain(method, message, wire.clone()),
        };
        self.console.write(&call);

        if self.role == Role::Client {
            let mut metadata = LogMetadata::new(timestamp.clone(), &caller);
            metadata.pathname = self.pathname.clone();
            let event = LogEvent {
                level: method,
                message: shown_message.clone(),
                args: wire,
                metadata,
            };
            self.relay(config, event);
        }
    }

    fn relay(&self, config: &LoggerConfig, event: LogEvent) {
        let Some(relay) = self.relay.clone() else {
            return;
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                write_fallback(self.console.as_ref(), &event, &LogTerminalError::NoRuntime);
                return;
            }
        };

        let console = Arc::clone(&self.console);
        let endpoint = config.api_endpoint.clone();
        let task = handle.spawn(async move {
            if let Err(e) = relay.send(&endpoint, &event).await {
                write_fallback(console.as_ref(), &event, &e);
            }
        });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.retain(|t| !t.is_finished());
        in_flight.push(task);
    }

    /// Wait for every relay started so far to finish (successfully or via fallback).
    pub async fn flush(&self) {
        let pending: Vec<JoinHandle<()>> = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *in_flight)
        };
        for task in pending {
            if let Err(e) = task.await {
                tracing::warn!("log relay task failed: {e}");
            }
        }
    }
}

/// Routes records from the `log` facade through a [`Logger`].
///
/// Records from the relay transport and from this crate are dropped: relaying
/// them would emit more of them on every send.
pub struct LogBridge(pub Arc<Logger>);

/// Crates whose `log` records are never bridged.
pub const BRIDGE_EXCLUDED_TARGETS: &[&str] = &[
    "log_terminal",
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "http",
    "tokio",
    "mio",
    "want",
    "tower",
    "rustls",
];

fn is_excluded_target(target: &str) -> bool {
    let krate = target.split("::").next().unwrap_or(target);
    BRIDGE_EXCLUDED_TARGETS.contains(&krate)
}

fn level_from_facade(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug | log::Level::Trace => LogLevel::Debug,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        !is_excluded_target(metadata.target())
            && self.0.config().should_log(level_from_facade(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if is_excluded_target(record.target()) {
            return;
        }
        let level = level_from_facade(record.level());
        let config = self.0.config();
        if !config.should_log(level) {
            return;
        }

        let caller = match record.file() {
            Some(file) => {
                let (file_name, full_path) = crate::caller_info::normalize_path(file);
                CallerInfo {
                    file_name: Some(file_name),
                    line_number: record.line(),
                    column_number: None,
                    function_name: None,
                    full_path: Some(full_path),
                }
            }
            None => CallerInfo::default(),
        };

        let message = record.args().to_string();
        self.0.emit(&config, level, &message, &[], caller);
    }

    fn flush(&self) {}
}

impl LogBridge {
    /// Install as the global `log` logger.
    pub fn install(logger: Arc<Logger>) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(LogBridge(logger)))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}
