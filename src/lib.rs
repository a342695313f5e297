//! Library root for the `log_terminal` crate
//! Client/server logging with caller info, terminal/browser formatting and a log relay

// Core error handling
pub mod api_errors;
pub mod errors;

// Configuration & CLI
pub mod cli;
pub mod config;
pub mod config_loader;

// Caller info & formatting
pub mod caller_info;
pub mod editor_link;
pub mod formatter;

// Events, sinks & the logger
pub mod log_event;
pub mod log_sink;
pub mod logger;
pub mod macros;

// Relay transport & web server interface
pub mod app_state;
pub mod log_capture;
pub mod logweb;
pub mod relay;


pub use caller_info::{extract_caller_info, CallerInfo, CallerInfoSource};
pub use config::{LoggerConfig, PartialConfig};
pub use config_loader::{load_config, ConfigLoader};
pub use log_event::{LogArg, LogEvent, LogMetadata};
pub use log_sink::{Console, ConsoleCall, ConsoleMethod, LogLevel, MemoryConsole, Role, TerminalConsole};
pub use logger::Logger;
