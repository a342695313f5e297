// relay.rs
// Purpose: Both halves of the log relay: the client-side JSON POST with local fallback,
// and the server-side reprint of a relayed event

use crate::config::LoggerConfig;
use crate::editor_link::editor_url;
use crate::errors::{LogTerminalError, LogTerminalResult};
use crate::formatter::{format_terminal, LogLine};
use crate::log_event::LogEvent;
use crate::log_sink::{Console, ConsoleCall, ConsoleMethod, Role};
use serde_json::Value;

/// Posts log events to the server's relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRelay {
    /// `base_url` is the server origin that relative endpoints are joined to,
    /// e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint. Absolute `http(s)://` endpoints are used as-is.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Send one event. Any non-2xx status is an error; the body is ignored.
    pub async fn send(&self, endpoint: &str, event: &LogEvent) -> LogTerminalResult<()> {
        let url = self.endpoint_url(endpoint);
        let response = self
            .client
            .post(&url)
            .json(event)
            .send()
            .await
            .map_err(|e| LogTerminalError::relay(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LogTerminalError::RelayStatus {
                status: status.as_u16(),
            });
        }

        tracing::trace!("relayed {} log to {url}", event.level);
        Ok(())
    }
}

/// Local fallback after a failed relay: report the failure once, then show
/// the original message so it is never silently dropped.
pub fn write_fallback(console: &dyn Console, event: &LogEvent, err: &LogTerminalError) {
    if err.is_transport() {
        tracing::debug!("log relay failed: {err}");
    } else {
        tracing::warn!("log relay failed: {err}");
    }
    console.write(&ConsoleCall::plain(
        ConsoleMethod::Error,
        "Failed to send log to server:",
        vec![Value::String(err.to_string())],
    ));
    console.write(&ConsoleCall::plain(
        event.level,
        event.message.clone(),
        event.args.clone(),
    ));
}

/// Server side: print a relayed event to the terminal, tagged with the
/// client's role. `config` is the server's own configuration.
pub fn display_relayed(event: &LogEvent, config: &LoggerConfig, console: &dyn Console) -> ConsoleCall {
    let caller = event.metadata.caller();

    let editor_link = match (&event.metadata.full_path, event.metadata.line_number) {
        (Some(path), Some(line)) if config.enable_file_click => {
            Some(editor_url(&config.editor, path, line))
        }
        _ => None,
    };

    let line = LogLine {
        role: Role::Client,
        method: event.level,
        message: &event.message,
        args: &event.args,
        caller: &caller,
        timestamp: event.metadata.timestamp.as_deref(),
        editor_link: editor_link.as_deref(),
    };

    let call = format_terminal(&line, config);
    console.write(&call);
    call
}
