//! Convenience macros for logging with variadic auxiliary values.
//!
//! Each value goes through `LogArg::from`, so JSON values, strings, numbers
//! and bools can be passed directly:
//!
//! ```no_run
//! use log_terminal::{log_info, logger::Logger, config::LoggerConfig};
//! use serde_json::json;
//!
//! let logger = Logger::server(LoggerConfig::default());
//! log_info!(logger, "user created", json!({"id": 7}), "via signup");
//! ```

#[macro_export]
macro_rules! log_line {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($msg, &[$($crate::log_event::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.info($msg, &[$($crate::log_event::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.warn($msg, &[$($crate::log_event::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.error($msg, &[$($crate::log_event::LogArg::from($arg)),*])
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.debug($msg, &[$($crate::log_event::LogArg::from($arg)),*])
    };
}
