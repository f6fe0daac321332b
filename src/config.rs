//! Server configuration.

use crate::session::{
    DEFAULT_GAME_ID_LENGTH, ExclusivityScope, MAX_GAME_ID_LENGTH, RandomGameIds, SessionManager,
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ServerConfig::host`].
pub const HOST_VAR: &str = "XO_HOST";
/// Environment variable overriding [`ServerConfig::port`].
pub const PORT_VAR: &str = "XO_PORT";

/// Configuration for the HTTP server and its session manager.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Characters per generated game id.
    #[serde(default = "default_game_id_length")]
    game_id_length: usize,

    /// Whether the one-game rule applies per chat or across chats.
    #[serde(default)]
    exclusivity: ExclusivityScope,

    /// Idle sweeper settings. No sweeper runs when absent.
    #[serde(default)]
    sweep: Option<SweepConfig>,
}

/// Idle sweeper settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Seconds without activity before an entry is dropped.
    max_idle_secs: u64,

    /// Seconds between sweeps.
    #[serde(default = "default_sweep_interval")]
    interval_secs: u64,
}

impl SweepConfig {
    /// Idle threshold.
    pub fn max_idle(&self) -> Duration {
        Duration::from_secs(self.max_idle_secs)
    }

    /// Sweep period, at least one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_game_id_length() -> usize {
    DEFAULT_GAME_ID_LENGTH
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            game_id_length: default_game_id_length(),
            exclusivity: ExclusivityScope::default(),
            sweep: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if !(1..=MAX_GAME_ID_LENGTH).contains(&config.game_id_length) {
            return Err(ConfigError::new(format!(
                "game_id_length must be between 1 and {}, got {}",
                MAX_GAME_ID_LENGTH, config.game_id_length
            )));
        }

        info!(
            host = %config.host,
            port = config.port,
            exclusivity = ?config.exclusivity,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Applies `XO_HOST` and `XO_PORT` from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies `XO_HOST` and `XO_PORT` as reported by `lookup`.
    #[instrument(skip(self, lookup))]
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup(HOST_VAR) {
            debug!(host = %host, "Host overridden from environment");
            self.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}={:?}: {}", PORT_VAR, port, e)))?;
            debug!(port = self.port, "Port overridden from environment");
        }
        Ok(self)
    }

    /// Applies command-line overrides.
    pub fn with_cli_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Session manager configured with this id length and exclusivity.
    pub fn session_manager(&self) -> SessionManager {
        SessionManager::scoped(RandomGameIds::new(self.game_id_length), self.exclusivity)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::default()
            .with_overrides_from(env(&[("XO_HOST", "0.0.0.0"), ("XO_PORT", " 8080 ")]))
            .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_bad_port_is_reported() {
        let err = ServerConfig::default()
            .with_overrides_from(env(&[("XO_PORT", "eighty")]))
            .unwrap_err();
        assert!(err.message.contains("XO_PORT"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_cli_beats_env() {
        let config = ServerConfig::default()
            .with_overrides_from(env(&[("XO_PORT", "8080")]))
            .unwrap()
            .with_cli_overrides(None, Some(9090));
        assert_eq!(*config.port(), 9090);
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_from_file_with_defaults() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("xo.toml");
        std::fs::write(
            &path,
            "port = 4000\nexclusivity = \"global\"\n\n[sweep]\nmax_idle_secs = 900\n",
        )
        .expect("Failed to write config");

        let config = ServerConfig::from_file(&path).expect("Failed to load");
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 4000);
        assert_eq!(*config.game_id_length(), DEFAULT_GAME_ID_LENGTH);
        assert_eq!(*config.exclusivity(), ExclusivityScope::Global);
        let sweep = config.sweep().as_ref().expect("sweep section");
        assert_eq!(*sweep.interval_secs(), 60);
        assert_eq!(
            config.session_manager().exclusivity(),
            ExclusivityScope::Global
        );
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        assert!(ServerConfig::from_file(dir.path().join("missing.toml")).is_err());

        let path = dir.path().join("zero.toml");
        std::fs::write(&path, "game_id_length = 0\n").expect("Failed to write config");
        let err = ServerConfig::from_file(&path).unwrap_err();
        assert!(err.message.contains("game_id_length"));

        let path = dir.path().join("huge.toml");
        std::fs::write(&path, "game_id_length = 1000000\n").expect("Failed to write config");
        let err = ServerConfig::from_file(&path).unwrap_err();
        assert!(err.message.contains("between 1 and 32"));
    }

    #[test]
    fn test_sweep_interval_floor() {
        let sweep: SweepConfig =
            toml::from_str("max_idle_secs = 10\ninterval_secs = 0").unwrap();
        assert_eq!(sweep.interval(), Duration::from_secs(1));
        assert_eq!(sweep.max_idle(), Duration::from_secs(10));
    }
}
