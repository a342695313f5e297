//! Log events and the relay wire format
//!
//! A [`LogEvent`] is what travels from a client to the server:
//!
//! ```json
//! { "level": "info", "message": "hello", "args": [{"a": 1}],
//!   "metadata": { "timestamp": "12:00:00.000", "fileName": "src/foo.rs",
//!                 "lineNumber": 12, "columnNumber": 5 } }
//! ```

use crate::caller_info::CallerInfo;
use crate::errors::{LogTerminalError, LogTerminalResult};
use crate::log_sink::ConsoleMethod;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// An auxiliary log value, classified by what it actually is.
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    /// Plain data, sent as-is.
    Value(Value),
    /// A callable. Sent as `"[Function: name]"`.
    Function { name: Option<String> },
    /// Anything without a data representation, carried as its debug text.
    Opaque(String),
}

impl LogArg {
    pub fn function(name: impl Into<String>) -> Self {
        let name = name.into();
        LogArg::Function {
            name: (!name.is_empty()).then_some(name),
        }
    }

    pub fn anonymous_function() -> Self {
        LogArg::Function { name: None }
    }

    pub fn debug<T: Debug + ?Sized>(value: &T) -> Self {
        LogArg::Opaque(format!("{value:?}"))
    }

    /// Serialize any value; values serde rejects are kept as debug text.
    pub fn serialize<T: Serialize + Debug + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => LogArg::Value(v),
            Err(_) => LogArg::debug(value),
        }
    }

    /// Lower to the JSON value that goes on the wire and to the console.
    pub fn to_wire(&self) -> Value {
        match self {
            LogArg::Value(v) => v.clone(),
            LogArg::Function { name } => Value::String(format!(
                "[Function: {}]",
                name.as_deref().unwrap_or("anonymous")
            )),
            LogArg::Opaque(text) => Value::String(text.clone()),
        }
    }
}

impl From<Value> for LogArg {
    fn from(v: Value) -> Self {
        LogArg::Value(v)
    }
}

impl From<&str> for LogArg {
    fn from(v: &str) -> Self {
        LogArg::Value(Value::String(v.to_string()))
    }
}

impl From<String> for LogArg {
    fn from(v: String) -> Self {
        LogArg::Value(Value::String(v))
    }
}

macro_rules! log_arg_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for LogArg {
            fn from(v: $t) -> Self {
                LogArg::Value(Value::from(v))
            }
        })*
    };
}

log_arg_from_number!(i32, i64, u32, u64, usize, f64, bool);

/// Lower a list of args for the wire.
pub fn wire_args(args: &[LogArg]) -> Vec<Value> {
    args.iter().map(LogArg::to_wire).collect()
}

/// Call-site and request metadata attached to a relayed event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pathname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl LogMetadata {
    pub fn new(timestamp: impl Into<String>, caller: &CallerInfo) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            file_name: caller.file_name.clone(),
            line_number: caller.line_number,
            column_number: caller.column_number,
            function_name: caller.function_name.clone(),
            pathname: None,
            full_path: caller.full_path.clone(),
            user_agent: None,
        }
    }

    pub fn caller(&self) -> CallerInfo {
        CallerInfo {
            file_name: self.file_name.clone(),
            line_number: self.line_number,
            column_number: self.column_number,
            function_name: self.function_name.clone(),
            full_path: self.full_path.clone(),
        }
    }

    /// Decode each field on its own; a malformed field becomes absent.
    pub fn from_value_lenient(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            timestamp: string_field(obj, "timestamp"),
            file_name: string_field(obj, "fileName"),
            line_number: number_field(obj, "lineNumber"),
            column_number: number_field(obj, "columnNumber"),
            function_name: string_field(obj, "functionName"),
            pathname: string_field(obj, "pathname"),
            full_path: string_field(obj, "fullPath"),
            user_agent: string_field(obj, "userAgent"),
        }
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<u32> {
    match obj.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A relayed log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: ConsoleMethod,
    pub message: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub metadata: LogMetadata,
}

impl LogEvent {
    /// Decode a relay request body.
    ///
    /// `level` and `message` are required; `args` defaults to empty;
    /// `metadata` degrades field by field.
    pub fn from_json(body: &str) -> LogTerminalResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| LogTerminalError::serialization("relay body", e))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> LogTerminalResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| LogTerminalError::payload("body", "expected a JSON object"))?;

        let level = obj
            .get("level")
            .and_then(Value::as_str)
            .ok_or_else(|| LogTerminalError::payload("level", "missing"))?
            .parse::<ConsoleMethod>()
            .map_err(|e| LogTerminalError::payload("level", e))?;

        let message = match obj.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => {
                return Err(LogTerminalError::payload("message", "missing"));
            }
            Some(other) => other.to_string(),
        };

        let args = match obj.get("args") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(_) => return Err(LogTerminalError::payload("args", "expected an array")),
        };

        let metadata = obj
            .get("metadata")
            .map(LogMetadata::from_value_lenient)
            .unwrap_or_default();

        Ok(Self {
            level,
            message,
            args,
            metadata,
        })
    }
}
