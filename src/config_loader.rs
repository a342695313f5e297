use crate::config::{EnvSource, LoggerConfig, PartialConfig, ProcessEnv};
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "log-terminal.toml";
pub const CONFIG_PATH_VAR: &str = "LOG_TERMINAL_CONFIG";

/// Resolves a [`LoggerConfig`] from defaults, injected overrides and the environment.
///
/// Layers, lowest priority first:
/// 1. compiled-in defaults
/// 2. the TOML file, when one is configured and present
/// 3. programmatic overrides
/// 4. environment variables
///
/// Resolution cannot fail. A layer that does not extract cleanly is dropped
/// and the remaining layers still apply.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    overrides: PartialConfig,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader for the usual locations: `$LOG_TERMINAL_CONFIG`, else `./log-terminal.toml`.
    pub fn discover<E: EnvSource + ?Sized>(env: &E) -> Self {
        let file = env
            .var(CONFIG_PATH_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::new().with_file(file)
    }

    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_overrides(mut self, overrides: PartialConfig) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn overrides(&self) -> &PartialConfig {
        &self.overrides
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> LoggerConfig {
        self.resolve_with(&ProcessEnv)
    }

    pub fn resolve_with<E: EnvSource + ?Sized>(&self, env: &E) -> LoggerConfig {
        let env_layer = PartialConfig::from_env(env);

        let mut figment = Figment::from(Serialized::defaults(LoggerConfig::default()));
        if let Some(path) = &self.file {
            figment = figment.merge(Toml::file(path));
        }
        let figment = figment
            .merge(Serialized::globals(&self.overrides))
            .merge(Serialized::globals(&env_layer));

        match figment.extract::<LoggerConfig>() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "logger config file {:?} ignored: {e}",
                    self.file.as_deref().unwrap_or(Path::new("<none>"))
                );
                env_layer.apply_to(&self.overrides.apply_to(&LoggerConfig::default()))
            }
        }
    }
}

/// Resolve the logger configuration from the standard locations and the process environment.
pub fn load_config() -> LoggerConfig {
    ConfigLoader::discover(&ProcessEnv).resolve()
}
