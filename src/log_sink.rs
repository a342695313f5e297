// log_sink.rs
// Purpose: Level ordering, console call representation and the sinks that receive them

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// LogLevel classifies the severity of log output.
///
/// Declaration order is the filter order: `Error < Warn < Info < Log < Debug`.
/// A message at level `L` passes a configured minimum `M` when `L <= M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Log,
    Debug,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Log,
        LogLevel::Debug,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Whether a message at this level passes the configured minimum.
    pub fn passes(self, minimum: LogLevel) -> bool {
        self.rank() <= minimum.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Log => "log",
            LogLevel::Debug => "debug",
        }
    }

    /// The console method this level is written through.
    pub fn console_method(self) -> ConsoleMethod {
        match self {
            LogLevel::Error => ConsoleMethod::Error,
            LogLevel::Warn => ConsoleMethod::Warn,
            LogLevel::Info => ConsoleMethod::Info,
            LogLevel::Log | LogLevel::Debug => ConsoleMethod::Log,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "log" => Ok(LogLevel::Log),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// The four console methods a log line can be written through.
/// This is also the set of levels accepted on the relay wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Info,
    Warn,
    Error,
}

impl ConsoleMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Info => "info",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
        }
    }

    pub fn level(self) -> LogLevel {
        match self {
            ConsoleMethod::Log => LogLevel::Log,
            ConsoleMethod::Info => LogLevel::Info,
            ConsoleMethod::Warn => LogLevel::Warn,
            ConsoleMethod::Error => LogLevel::Error,
        }
    }
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log" => Ok(ConsoleMethod::Log),
            "info" => Ok(ConsoleMethod::Info),
            "warn" => Ok(ConsoleMethod::Warn),
            "error" => Ok(ConsoleMethod::Error),
            other => Err(format!("unknown console method '{other}'")),
        }
    }
}

/// Which side of the relay produced a line. Shown as `[SERVER/..]` or `[CLIENT/..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    Client,
}

impl Role {
    pub fn tag(self) -> &'static str {
        match self {
            Role::Server => "SERVER",
            Role::Client => "CLIENT",
        }
    }
}

/// A single console invocation: the method, the leading format string and
/// the values that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleCall {
    pub method: ConsoleMethod,
    /// The message exactly as the caller passed it.
    pub message: String,
    /// First console argument. May contain `%c` placeholders consumed by `styles`.
    pub format: String,
    pub styles: Vec<String>,
    /// Auxiliary values, passed through unmodified.
    pub args: Vec<Value>,
    pub trailer: Option<String>,
}

impl ConsoleCall {
    /// A bare call: the message followed by the args, no decoration.
    pub fn plain(method: ConsoleMethod, message: impl Into<String>, args: Vec<Value>) -> Self {
        let message = message.into();
        Self {
            method,
            format: message.clone(),
            message,
            styles: Vec::new(),
            args,
            trailer: None,
        }
    }

    /// Render as a single line of text the way a console joins its arguments.
    /// The leading `%c` placeholders that `styles` pairs with are dropped,
    /// since a byte stream cannot apply CSS. Any other `%c` is message text.
    pub fn render(&self) -> String {
        let mut out = self.format.replacen("%c", "", self.styles.len());
        for arg in &self.args {
            out.push(' ');
            match arg {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        if let Some(trailer) = &self.trailer {
            out.push_str(trailer);
        }
        out
    }
}

/// Destination for console calls.
pub trait Console: Send + Sync {
    fn write(&self, call: &ConsoleCall);
}

/// Writes to the process streams: `log`/`info` to stdout, `warn`/`error` to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn write(&self, call: &ConsoleCall) {
        let line = call.render();
        // A closed stream must not take the application down with it.
        let _ = match call.method {
            ConsoleMethod::Warn | ConsoleMethod::Error => writeln!(io::stderr().lock(), "{line}"),
            ConsoleMethod::Log | ConsoleMethod::Info => writeln!(io::stdout().lock(), "{line}"),
        };
    }
}

/// Records every call in order. Cloning shares the underlying record.
#[derive(Debug, Default, Clone)]
pub struct MemoryConsole {
    calls: Arc<Mutex<Vec<ConsoleCall>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ConsoleCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn calls_for(&self, method: ConsoleMethod) -> Vec<ConsoleCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Console for MemoryConsole {
    fn write(&self, call: &ConsoleCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call.clone());
    }
}
