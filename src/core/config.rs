//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.parley/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub pacing_delay_ms: Option<u64>,
    pub show_timestamps: Option<bool>,
    pub lockout: Option<bool>,
    pub placeholder: Option<String>,
    pub waiting_placeholder: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_ENDPOINT: &str = "/get";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PACING_DELAY_MS: u64 = 800;
pub const DEFAULT_PLACEHOLDER: &str = "Type your message...";
pub const DEFAULT_WAITING_PLACEHOLDER: &str = "Waiting for response...";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub pacing_delay: Duration,
    pub show_timestamps: bool,
    pub lockout: bool,
    pub placeholder: String,
    pub waiting_placeholder: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with_env(&ParleyConfig::default(), &CliOverrides::default(), None)
    }
}

/// Values given on the command line. `None`/`false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub pacing_delay_ms: Option<u64>,
    pub no_lockout: bool,
    pub no_timestamps: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.parley/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".parley").join("config.toml"))
}

/// Load config from `~/.parley/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ParleyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ParleyConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ParleyConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ParleyConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ParleyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Parley Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://127.0.0.1:5000"   # Or set PARLEY_BASE_URL env var
# endpoint = "/get"
# timeout_secs = 30

# [ui]
# pacing_delay_ms = 800                 # Pause before the request is sent
# show_timestamps = true
# lockout = true                        # Disable input while waiting for a reply
# placeholder = "Type your message..."
# waiting_placeholder = "Waiting for response..."
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ParleyConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, std::env::var("PARLEY_BASE_URL").ok())
}

fn resolve_with_env(
    config: &ParleyConfig,
    cli: &CliOverrides,
    env_base_url: Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or(env_base_url)
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let pacing_delay_ms = cli
        .pacing_delay_ms
        .or(config.ui.pacing_delay_ms)
        .unwrap_or(DEFAULT_PACING_DELAY_MS);

    ResolvedConfig {
        base_url,
        endpoint: config
            .backend
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        timeout: Duration::from_secs(
            config.backend.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        pacing_delay: Duration::from_millis(pacing_delay_ms),
        show_timestamps: !cli.no_timestamps && config.ui.show_timestamps.unwrap_or(true),
        lockout: !cli.no_lockout && config.ui.lockout.unwrap_or(true),
        placeholder: config
            .ui
            .placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        waiting_placeholder: config
            .ui
            .waiting_placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_WAITING_PLACEHOLDER.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&ParleyConfig::default(), &CliOverrides::default(), None);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.endpoint, "/get");
        assert_eq!(resolved.pacing_delay, Duration::from_millis(800));
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert!(resolved.lockout);
        assert!(resolved.show_timestamps);
        assert_eq!(resolved.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ParleyConfig {
            backend: BackendConfig {
                base_url: Some("http://chat.local:8080".to_string()),
                endpoint: Some("/api/chat".to_string()),
                timeout_secs: Some(5),
            },
            ui: UiConfig {
                pacing_delay_ms: Some(0),
                show_timestamps: Some(false),
                lockout: Some(false),
                placeholder: Some("Say something".to_string()),
                waiting_placeholder: Some("...".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), None);
        assert_eq!(resolved.base_url, "http://chat.local:8080");
        assert_eq!(resolved.endpoint, "/api/chat");
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert_eq!(resolved.pacing_delay, Duration::ZERO);
        assert!(!resolved.show_timestamps);
        assert!(!resolved.lockout);
        assert_eq!(resolved.placeholder, "Say something");
        assert_eq!(resolved.waiting_placeholder, "...");
    }

    #[test]
    fn test_env_beats_config_file() {
        let config = ParleyConfig {
            backend: BackendConfig {
                base_url: Some("http://from-file".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(
            &config,
            &CliOverrides::default(),
            Some("http://from-env".to_string()),
        );
        assert_eq!(resolved.base_url, "http://from-env");
    }

    #[test]
    fn test_resolve_cli_wins() {
        let cli = CliOverrides {
            base_url: Some("http://from-cli".to_string()),
            pacing_delay_ms: Some(10),
            no_lockout: true,
            no_timestamps: true,
        };
        let resolved = resolve_with_env(
            &ParleyConfig::default(),
            &cli,
            Some("http://from-env".to_string()),
        );
        assert_eq!(resolved.base_url, "http://from-cli");
        assert_eq!(resolved.pacing_delay, Duration::from_millis(10));
        assert!(!resolved.lockout);
        assert!(!resolved.show_timestamps);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[ui]
pacing_delay_ms = 250
"#;
        let config: ParleyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ui.pacing_delay_ms, Some(250));
        assert!(config.ui.lockout.is_none());
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[backend]
base_url = "http://127.0.0.1:5000"
endpoint = "/get"
timeout_secs = 10

[ui]
show_timestamps = false
lockout = true
placeholder = "Ask me anything"
"#;
        let config: ParleyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.timeout_secs, Some(10));
        assert_eq!(config.ui.show_timestamps, Some(false));
        assert_eq!(config.ui.placeholder.as_deref(), Some("Ask me anything"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("parley-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[ui\npacing_delay_ms = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("parley-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.backend.base_url.is_none());
        let generated = fs::read_to_string(&path).unwrap();
        assert!(generated.contains("# [backend]"));
        // Everything is commented out, so it parses to defaults
        let reparsed: ParleyConfig = toml::from_str(&generated).unwrap();
        assert!(reparsed.ui.lockout.is_none());
        let _ = fs::remove_dir_all(&dir);
    }
}
