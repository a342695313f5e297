//! Caller-info extraction
//!
//! Recovers the source location of a logging call, either from a compile-time
//! [`Location`] or by parsing a textual call stack. Stack parsing is a
//! heuristic: it tolerates V8-style frames (`at name (file:line:col)` and
//! `at file:line:col`) and Rust backtrace frames (`N: symbol` followed by
//! `at file:line:col`). Every field of the result is optional and nothing in
//! here panics on unexpected input.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::panic::Location;

/// Leading frames that belong to the logging machinery itself.
pub const FRAME_SKIP: usize = 3;

/// Display paths longer than this collapse to their final segment.
pub const MAX_DISPLAY_PATH: usize = 50;

/// Frames containing any of these are never reported as the caller.
pub const NOISE_MARKERS: &[&str] = &[
    "webpack-internal:",
    "unified-logger",
    "log_terminal",
    "node_modules",
    "/.cargo/registry/",
    "/rustc/",
    "std::backtrace",
];

lazy_static! {
    static ref FRAME_NAMED: Regex =
        Regex::new(r"at\s+([^(\s]+)\s+\((.+?):(\d+):(\d+)\)").expect("FRAME_NAMED regex is valid");
    static ref FRAME_SPACED: Regex =
        Regex::new(r"at\s+(.+?)\s+\((.+?):(\d+):(\d+)\)").expect("FRAME_SPACED regex is valid");
    static ref FRAME_BARE: Regex =
        Regex::new(r"at\s+(.+?):(\d+):(\d+)").expect("FRAME_BARE regex is valid");
    static ref HAS_LOCATION: Regex =
        Regex::new(r":\d+:\d+\)?\s*$").expect("HAS_LOCATION regex is valid");
    static ref RUST_FRAME_INDEX: Regex =
        Regex::new(r"^\s*\d+:\s+(.+?)\s*$").expect("RUST_FRAME_INDEX regex is valid");
    static ref RUST_SYMBOL_HASH: Regex =
        Regex::new(r"::h[0-9a-f]{16}$").expect("RUST_SYMBOL_HASH regex is valid");
    static ref WEBPACK_APP_PATH: Regex =
        Regex::new(r"/\./(app/.+)$").expect("WEBPACK_APP_PATH regex is valid");
    static ref URL_LAST_SEGMENT: Regex =
        Regex::new(r"/([^/]+)$").expect("URL_LAST_SEGMENT regex is valid");
    static ref PATH_PREFIXES: Vec<(Regex, &'static str)> = [
        (r"^.*/node_modules/", ""),
        (r"^.*/\.next/", ""),
        (r"^.*/target/", ""),
        (r"^.*/src/", "src/"),
        (r"^.*/app/", "app/"),
        (r"^.*/pages/", "pages/"),
        (r"^.*/components/", "components/"),
        (r"^.*/lib/", "lib/"),
        (r"^.*/utils/", "utils/"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("path prefix regex is valid"),
            replacement,
        )
    })
    .collect();
}

/// Source location of a logging call. Absence of any field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
}

impl CallerInfo {
    pub fn is_empty(&self) -> bool {
        *self == CallerInfo::default()
    }

    /// Caller info for a compile-time location, normalized like a parsed frame.
    pub fn from_location(location: &Location<'_>) -> Self {
        let (file_name, full_path) = normalize_path(location.file());
        Self {
            file_name: Some(file_name),
            line_number: Some(location.line()),
            column_number: Some(location.column()),
            function_name: None,
            full_path: Some(full_path),
        }
    }
}

/// Capability for obtaining caller info at a log call site.
pub trait CallerInfoSource: Send + Sync {
    fn caller_info(&self, location: &'static Location<'static>) -> CallerInfo;
}

/// Uses the `#[track_caller]` location of the log call.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackedCaller;

impl CallerInfoSource for TrackedCaller {
    fn caller_info(&self, location: &'static Location<'static>) -> CallerInfo {
        CallerInfo::from_location(location)
    }
}

/// Captures and parses a runtime backtrace, which also yields the function
/// name. Falls back to the tracked location when the backtrace has no usable
/// frame (e.g. builds without debug info).
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktraceCaller;

impl CallerInfoSource for BacktraceCaller {
    fn caller_info(&self, location: &'static Location<'static>) -> CallerInfo {
        let trace = Backtrace::force_capture().to_string();
        let info = extract_caller_info(&trace);
        if info.is_empty() {
            CallerInfo::from_location(location)
        } else {
            info
        }
    }
}

/// Reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCaller;

impl CallerInfoSource for NoCaller {
    fn caller_info(&self, _location: &'static Location<'static>) -> CallerInfo {
        CallerInfo::default()
    }
}

/// Extract the caller's location from a newline-delimited stack trace.
pub fn extract_caller_info(stack: &str) -> CallerInfo {
    let frames = group_frames(stack);

    let fallback = frames
        .get(FRAME_SKIP + 1)
        .or_else(|| frames.get(FRAME_SKIP))
        .map(String::as_str)
        .unwrap_or("");

    let caller = frames
        .iter()
        .skip(FRAME_SKIP)
        .map(String::as_str)
        .find(|frame| HAS_LOCATION.is_match(frame) && !is_noise(frame))
        .unwrap_or(fallback);

    extract_from_frame(caller)
}

/// Parse a single frame, trying the patterns from most to least specific.
pub fn extract_from_frame(frame: &str) -> CallerInfo {
    let (function_name, file_path, line, column) =
        if let Some(caps) = FRAME_NAMED.captures(frame).or_else(|| FRAME_SPACED.captures(frame)) {
            (
                Some(caps[1].to_string()),
                caps[2].to_string(),
                caps[3].to_string(),
                caps[4].to_string(),
            )
        } else if let Some(caps) = FRAME_BARE.captures(frame) {
            (
                None,
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].to_string(),
            )
        } else {
            return CallerInfo::default();
        };

    let (file_name, full_path) = normalize_path(&file_path);

    CallerInfo {
        file_name: Some(file_name),
        line_number: line.parse().ok(),
        column_number: column.parse().ok(),
        function_name: function_name.map(|name| clean_function_name(&name)),
        full_path: Some(full_path),
    }
}

/// Returns `(display_name, full_path)` for an extracted file path.
pub fn normalize_path(file_path: &str) -> (String, String) {
    if file_path.contains("webpack-internal:") {
        return match WEBPACK_APP_PATH.captures(file_path) {
            Some(caps) => (caps[1].to_string(), caps[1].to_string()),
            None => (file_path.to_string(), file_path.to_string()),
        };
    }

    if file_path.contains("http://") || file_path.contains("https://") {
        let name = URL_LAST_SEGMENT
            .captures(file_path)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| file_path.to_string());
        return (name, file_path.to_string());
    }

    (shorten_file_path(file_path), file_path.to_string())
}

/// Strip well-known root prefixes to a short relative display path.
pub fn shorten_file_path(file_path: &str) -> String {
    let mut clean = file_path.to_string();
    for (pattern, replacement) in PATH_PREFIXES.iter() {
        clean = pattern.replace(&clean, *replacement).into_owned();
    }

    if clean.chars().count() > MAX_DISPLAY_PATH {
        if let Some(last) = clean.rsplit('/').next() {
            return last.to_string();
        }
    }

    clean
}

fn is_noise(frame: &str) -> bool {
    NOISE_MARKERS.iter().any(|marker| frame.contains(marker))
}

fn clean_function_name(name: &str) -> String {
    RUST_SYMBOL_HASH.replace(name, "").into_owned()
}

/// Split stack text into frames. A Rust backtrace `N: symbol` line followed
/// by an `at file:line:col` line becomes one `at symbol (file:line:col)` frame;
/// every other line is a frame on its own.
fn group_frames(stack: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    let mut pending_symbol: Option<String> = None;

    for line in stack.lines() {
        let trimmed = line.trim();

        if let Some(symbol) = pending_symbol.take() {
            if let Some(location) = trimmed.strip_prefix("at ") {
                frames.push(format!("at {symbol} ({})", location.trim()));
                continue;
            }
            frames.push(symbol);
        }

        match RUST_FRAME_INDEX.captures(line) {
            Some(caps) if !trimmed.starts_with("at ") => {
                pending_symbol = Some(caps[1].to_string());
            }
            _ => frames.push(trimmed.to_string()),
        }
    }

    if let Some(symbol) = pending_symbol {
        frames.push(symbol);
    }

    frames
}
