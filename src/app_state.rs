use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    config::{EnvSource, LoggerConfig, ProcessEnv, DEFAULT_API_ENDPOINT},
    config_loader::ConfigLoader,
    log_capture::CaptureBuffer,
    log_sink::{Console, TerminalConsole},
};

/// Environment lookup that can be shared across request handlers.
pub type SharedEnv = Arc<dyn EnvSource + Send + Sync>;

pub struct AppState {
    /// Path the relay endpoint is mounted on.
    pub endpoint: String,
    pub config_loader: ConfigLoader,
    pub env: SharedEnv,
    pub console: Arc<dyn Console>,
    /// Present only when the test-capture endpoint is enabled.
    pub capture: Option<Arc<CaptureBuffer>>,
}

impl AppState {
    pub fn new(config_loader: ConfigLoader, env: SharedEnv, console: Arc<dyn Console>) -> Self {
        let endpoint = config_loader.resolve_with(env.as_ref()).api_endpoint;
        Self {
            endpoint: normalize_route(&endpoint),
            config_loader,
            env,
            console,
            capture: None,
        }
    }

    /// State for a server reading the process environment and writing to the terminal.
    pub fn from_process_env(config_loader: ConfigLoader) -> Self {
        Self::new(config_loader, Arc::new(ProcessEnv), Arc::new(TerminalConsole))
    }

    /// State with a fixed environment, for tests and embedding.
    pub fn with_env_map(
        config_loader: ConfigLoader,
        env: HashMap<String, String>,
        console: Arc<dyn Console>,
    ) -> Self {
        Self::new(config_loader, Arc::new(env), console)
    }

    pub fn with_capture(mut self, capture: Arc<CaptureBuffer>) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Re-resolve the server's configuration. Called per relayed event.
    pub fn resolve_config(&self) -> LoggerConfig {
        self.config_loader.resolve_with(self.env.as_ref())
    }
}

/// Routes are mounted on a path; a full URL endpoint contributes only its path.
fn normalize_route(endpoint: &str) -> String {
    let path = match endpoint.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or("/"),
        None => endpoint,
    };
    let path = path.trim();
    if path.is_empty() || path == "/" {
        DEFAULT_API_ENDPOINT.to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
