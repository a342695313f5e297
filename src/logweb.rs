use crate::api_errors::AppError;
use crate::app_state::AppState;
use crate::log_capture::{CaptureBuffer, CapturedLog};
use crate::log_event::LogEvent;
use crate::relay::display_relayed;
use axum::{
    extract::State,
    http::{header::USER_AGENT, HeaderMap},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const TEST_LOGS_ROUTE: &str = "/api/test-logs";

#[derive(Debug, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    pub action: String,
    #[serde(default)]
    pub log_data: Option<Value>,
}

/// Build the router: the relay endpoint, health check and, when the state
/// carries a capture buffer, the test-log capture endpoint.
pub fn build_relay_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(&state.endpoint, post(relay_log))
        .route("/healthz", get(healthz));

    if state.capture.is_some() {
        router = router.route(TEST_LOGS_ROUTE, get(test_logs_status).post(test_logs_action));
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}

#[axum::debug_handler]
async fn relay_log(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<RelayResponse>, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::bad_request("Empty request body"));
    }

    let mut event = LogEvent::from_json(&body)?;

    if event.metadata.user_agent.is_none() {
        event.metadata.user_agent = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }

    let config = state.resolve_config();
    display_relayed(&event, &config, state.console.as_ref());

    if let Some(capture) = &state.capture {
        capture.add(CapturedLog::from_event(&event)).await;
    }

    Ok(Json(RelayResponse { success: true }))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn capture_buffer(state: &AppState) -> Result<&Arc<CaptureBuffer>, AppError> {
    state
        .capture
        .as_ref()
        .ok_or_else(|| AppError::internal("Log capture is not enabled"))
}

async fn test_logs_status(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let snapshot = capture_buffer(&state)?.snapshot().await;
    serde_json::to_value(snapshot)
        .map(Json)
        .map_err(|e| AppError::internal(format!("Failed to encode captured logs: {e}")))
}

async fn test_logs_action(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Value>, AppError> {
    let capture = capture_buffer(&state)?;
    let req: CaptureRequest =
        serde_json::from_str(&body).map_err(|_| AppError::bad_request("Invalid request body"))?;

    match req.action.as_str() {
        "start" => {
            capture.start().await;
            Ok(Json(json!({ "success": true, "message": "Log capture started" })))
        }
        "stop" => {
            let logs = capture.stop().await;
            Ok(Json(json!({
                "success": true,
                "message": "Log capture stopped",
                "capturedLogs": logs,
            })))
        }
        "add" => {
            if let Some(event) = req.log_data.as_ref().and_then(|v| LogEvent::from_value(v).ok()) {
                capture.add(CapturedLog::from_event(&event)).await;
            }
            Ok(Json(json!({ "success": true })))
        }
        "clear" => {
            capture.clear().await;
            Ok(Json(json!({ "success": true, "message": "Logs cleared" })))
        }
        _ => Err(AppError::bad_request("Invalid action")),
    }
}
