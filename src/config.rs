// config.rs
// Purpose: The flat logger configuration record, its override layer and the
// declared environment surface

use crate::log_sink::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_API_ENDPOINT: &str = "/api/log-terminal";
pub const DEFAULT_EDITOR: &str = "code";

/// Fully resolved logger configuration. Every field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    pub show_timestamp: bool,
    pub show_file_name: bool,
    pub show_line_number: bool,
    pub show_function_name: bool,
    pub use_colors: bool,
    pub show_detail_in_browser: bool,
    pub enable_file_click: bool,
    pub log_level: LogLevel,
    pub api_endpoint: String,
    pub editor: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            show_timestamp: true,
            show_file_name: true,
            show_line_number: true,
            show_function_name: false,
            use_colors: true,
            show_detail_in_browser: true,
            enable_file_click: true,
            log_level: LogLevel::Log,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Whether a message at `level` should be displayed and relayed.
    pub fn should_log(&self, level: LogLevel) -> bool {
        level.passes(self.log_level)
    }
}

/// One override layer. `None` means "keep the value from the layer below".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_timestamp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_file_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_line_number: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_function_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_colors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_detail_in_browser: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_file_click: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl PartialConfig {
    pub fn is_empty(&self) -> bool {
        *self == PartialConfig::default()
    }

    /// Apply this layer on top of `base`.
    pub fn apply_to(&self, base: &LoggerConfig) -> LoggerConfig {
        LoggerConfig {
            show_timestamp: self.show_timestamp.unwrap_or(base.show_timestamp),
            show_file_name: self.show_file_name.unwrap_or(base.show_file_name),
            show_line_number: self.show_line_number.unwrap_or(base.show_line_number),
            show_function_name: self.show_function_name.unwrap_or(base.show_function_name),
            use_colors: self.use_colors.unwrap_or(base.use_colors),
            show_detail_in_browser: self
                .show_detail_in_browser
                .unwrap_or(base.show_detail_in_browser),
            enable_file_click: self.enable_file_click.unwrap_or(base.enable_file_click),
            log_level: self.log_level.unwrap_or(base.log_level),
            api_endpoint: self
                .api_endpoint
                .clone()
                .unwrap_or_else(|| base.api_endpoint.clone()),
            editor: self.editor.clone().unwrap_or_else(|| base.editor.clone()),
        }
    }
}

/// Which field an environment variable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvField {
    ShowTimestamp,
    ShowFileName,
    ShowLineNumber,
    ShowFunctionName,
    UseColors,
    ShowDetailInBrowser,
    EnableFileClick,
    LogLevel,
    ApiEndpoint,
    Editor,
}

/// A declared environment option.
#[derive(Debug, Clone, Copy)]
pub struct EnvOption {
    pub vars: &'static [&'static str],
    pub field: EnvField,
    pub default: &'static str,
    pub effect: &'static str,
}

pub const ENV_OPTIONS: &[EnvOption] = &[
    EnvOption {
        vars: &["LOG_TERMINAL_TIMESTAMP"],
        field: EnvField::ShowTimestamp,
        default: "true",
        effect: "prefix each line with [HH:MM:SS.mmm]",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_FILENAME"],
        field: EnvField::ShowFileName,
        default: "true",
        effect: "show the caller's file name",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_LINENUMBER"],
        field: EnvField::ShowLineNumber,
        default: "true",
        effect: "append :line:col to the file name",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_FUNCTION"],
        field: EnvField::ShowFunctionName,
        default: "false",
        effect: "append `in name()` when the caller's function is known",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_COLORS"],
        field: EnvField::UseColors,
        default: "true",
        effect: "colorize output (ANSI on terminals, CSS in browser consoles)",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_DETAIL_IN_BROWSER"],
        field: EnvField::ShowDetailInBrowser,
        default: "true",
        effect: "decorate client-side console output with the full prefix",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_ENABLE_FILE_CLICK"],
        field: EnvField::EnableFileClick,
        default: "true",
        effect: "append an editor deep link to relayed lines",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_LEVEL"],
        field: EnvField::LogLevel,
        default: "log",
        effect: "minimum level: error, warn, info, log or debug",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_API_ENDPOINT"],
        field: EnvField::ApiEndpoint,
        default: DEFAULT_API_ENDPOINT,
        effect: "relay endpoint path or URL",
    },
    EnvOption {
        vars: &["LOG_TERMINAL_EDITOR", "REACT_EDITOR"],
        field: EnvField::Editor,
        default: DEFAULT_EDITOR,
        effect: "editor used for file deep links",
    },
];

/// Read access to environment variables.
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}

/// `"false"` disables, any other non-empty value enables, empty/unset is absent.
fn parse_toggle(raw: &str) -> Option<bool> {
    match raw {
        "" => None,
        "false" => Some(false),
        _ => Some(true),
    }
}

impl PartialConfig {
    /// Build the environment layer from the declared options.
    pub fn from_env<E: EnvSource + ?Sized>(env: &E) -> Self {
        let mut layer = PartialConfig::default();

        for option in ENV_OPTIONS {
            let Some(raw) = option
                .vars
                .iter()
                .filter_map(|name| env.var(name))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
            else {
                continue;
            };

            match option.field {
                EnvField::ShowTimestamp => layer.show_timestamp = parse_toggle(&raw),
                EnvField::ShowFileName => layer.show_file_name = parse_toggle(&raw),
                EnvField::ShowLineNumber => layer.show_line_number = parse_toggle(&raw),
                EnvField::ShowFunctionName => layer.show_function_name = parse_toggle(&raw),
                EnvField::UseColors => layer.use_colors = parse_toggle(&raw),
                EnvField::ShowDetailInBrowser => {
                    layer.show_detail_in_browser = parse_toggle(&raw)
                }
                EnvField::EnableFileClick => layer.enable_file_click = parse_toggle(&raw),
                EnvField::LogLevel => match raw.parse::<LogLevel>() {
                    Ok(level) => layer.log_level = Some(level),
                    Err(e) => tracing::warn!("ignoring {}: {e}", option.vars[0]),
                },
                EnvField::ApiEndpoint => layer.api_endpoint = Some(raw),
                EnvField::Editor => layer.editor = Some(raw),
            }
        }

        layer
    }
}
