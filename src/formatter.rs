// formatter.rs
// Purpose: Render decorated console calls for terminal streams and browser-style consoles

use crate::caller_info::CallerInfo;
use crate::config::LoggerConfig;
use crate::log_sink::{ConsoleCall, ConsoleMethod, Role};
use chrono::Local;
use serde_json::Value;

pub const ANSI_RESET: &str = "\x1b[0m";
pub const ANSI_META: &str = "\x1b[90m";

pub const CSS_META: &str = "color: #9ca3af; font-weight: bold;";
pub const CSS_DEBUG_TAG: &str = "color: #6b7280; font-weight: bold;";
pub const CSS_INHERIT: &str = "color: inherit;";

pub const ARROW: &str = "→";

pub fn ansi_color(method: ConsoleMethod) -> &'static str {
    match method {
        ConsoleMethod::Log => "\x1b[37m",
        ConsoleMethod::Info => "\x1b[36m",
        ConsoleMethod::Warn => "\x1b[33m",
        ConsoleMethod::Error => "\x1b[31m",
    }
}

pub fn css_color(method: ConsoleMethod) -> &'static str {
    match method {
        ConsoleMethod::Log => "#6b7280",
        ConsoleMethod::Info => "#3b82f6",
        ConsoleMethod::Warn => "#f59e0b",
        ConsoleMethod::Error => "#ef4444",
    }
}

/// Wall-clock display timestamp, `HH:MM:SS.mmm` in local time.
pub fn display_timestamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Everything the formatter needs to know about one line.
#[derive(Debug, Clone)]
pub struct LogLine<'a> {
    pub role: Role,
    pub method: ConsoleMethod,
    pub message: &'a str,
    pub args: &'a [Value],
    pub caller: &'a CallerInfo,
    pub timestamp: Option<&'a str>,
    pub editor_link: Option<&'a str>,
}

/// The uncolored metadata prefix: `[time] [ROLE/LEVEL] file:line:col in fn()`.
pub fn meta_prefix(line: &LogLine<'_>, config: &LoggerConfig) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    if config.show_timestamp {
        if let Some(timestamp) = line.timestamp {
            parts.push(format!("[{timestamp}]"));
        }
    }

    parts.push(format!(
        "[{}/{}]",
        line.role.tag(),
        line.method.as_str().to_uppercase()
    ));

    if config.show_file_name {
        if let Some(file_name) = line.caller.file_name.as_deref().filter(|f| !f.is_empty()) {
            let mut file_part = file_name.to_string();
            if config.show_line_number {
                if let Some(line_number) = line.caller.line_number.filter(|n| *n > 0) {
                    file_part.push_str(&format!(":{line_number}"));
                    if let Some(column) = line.caller.column_number.filter(|n| *n > 0) {
                        file_part.push_str(&format!(":{column}"));
                    }
                }
            }
            parts.push(file_part);
        }
    }

    if config.show_function_name {
        if let Some(function_name) = line.caller.function_name.as_deref() {
            parts.push(format!("in {function_name}()"));
        }
    }

    parts.join(" ")
}

/// Terminal rendering: gray prefix, then a level-colored arrow and the message.
pub fn format_terminal(line: &LogLine<'_>, config: &LoggerConfig) -> ConsoleCall {
    let meta = meta_prefix(line, config);

    let (level_color, meta_color, reset) = if config.use_colors {
        (ansi_color(line.method), ANSI_META, ANSI_RESET)
    } else {
        ("", "", "")
    };

    let format = format!(
        "{meta_color}{meta}{reset} \n{level_color}{ARROW}{reset} {}",
        line.message
    );

    let trailer = line
        .editor_link
        .map(|link| format!("\n{meta_color}📁 {link}{reset}"));

    ConsoleCall {
        method: line.method,
        message: line.message.to_string(),
        format,
        styles: Vec::new(),
        args: line.args.to_vec(),
        trailer,
    }
}

/// Browser-console rendering: `%c` placeholders with CSS styles when colors are on.
pub fn format_browser(line: &LogLine<'_>, config: &LoggerConfig) -> ConsoleCall {
    let meta = meta_prefix(line, config);

    let (format, styles) = if config.use_colors {
        (
            format!("%c{meta}%c {ARROW} {}", line.message),
            vec![
                CSS_META.to_string(),
                format!("color: {}; font-weight: normal;", css_color(line.method)),
            ],
        )
    } else {
        (format!("{meta} {ARROW} {}", line.message), Vec::new())
    };

    ConsoleCall {
        method: line.method,
        message: line.message.to_string(),
        format,
        styles,
        args: line.args.to_vec(),
        trailer: line.editor_link.map(|link| format!("\n📁 {link}")),
    }
}

/// Undecorated client-side debug call: a styled `[DEBUG]` tag in front of the message.
pub fn format_browser_debug_tag(message: &str, args: &[Value]) -> ConsoleCall {
    ConsoleCall {
        method: ConsoleMethod::Log,
        message: message.to_string(),
        format: format!("%c[DEBUG]%c {message}"),
        styles: vec![CSS_DEBUG_TAG.to_string(), CSS_INHERIT.to_string()],
        args: args.to_vec(),
        trailer: None,
    }
}
