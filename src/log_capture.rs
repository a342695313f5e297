//! In-memory capture of relayed log events for end-to-end tests
//!
//! Nothing here is persisted. The buffer grows without bound while capture is
//! on; `start` and `clear` reset it.

use crate::log_event::LogEvent;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

/// One captured event, stamped with the time it was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedLog {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    pub args: Vec<Value>,
    pub metadata: Value,
}

impl CapturedLog {
    pub fn from_event(event: &LogEvent) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            level: event.level.as_str().to_string(),
            message: event.message.clone(),
            args: event.args.clone(),
            metadata: serde_json::to_value(&event.metadata).unwrap_or(Value::Null),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshot {
    pub logs: Vec<CapturedLog>,
    pub is_capturing: bool,
    pub count: usize,
}

#[derive(Debug, Default)]
struct CaptureState {
    logs: Vec<CapturedLog>,
    capturing: bool,
}

/// Ordered capture buffer plus a capturing flag.
#[derive(Debug, Default)]
pub struct CaptureBuffer {
    state: RwLock<CaptureState>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn capture on and drop anything captured before.
    pub async fn start(&self) {
        let mut state = self.state.write().await;
        state.capturing = true;
        state.logs.clear();
    }

    /// Turn capture off and return what was captured.
    pub async fn stop(&self) -> Vec<CapturedLog> {
        let mut state = self.state.write().await;
        state.capturing = false;
        state.logs.clone()
    }

    /// Append an entry if capture is on. Returns whether it was kept.
    pub async fn add(&self, entry: CapturedLog) -> bool {
        let mut state = self.state.write().await;
        if state.capturing {
            state.logs.push(entry);
            true
        } else {
            false
        }
    }

    pub async fn clear(&self) {
        self.state.write().await.logs.clear();
    }

    pub async fn snapshot(&self) -> CaptureSnapshot {
        let state = self.state.read().await;
        CaptureSnapshot {
            logs: state.logs.clone(),
            is_capturing: state.capturing,
            count: state.logs.len(),
        }
    }

    pub async fn is_capturing(&self) -> bool {
        self.state.read().await.capturing
    }
}
