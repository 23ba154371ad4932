//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument or environment variable (parsed by the binary)
//! 2. TOML config file
//! 3. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Playlist table file used when nothing else is configured
pub const DEFAULT_PLAYLISTS_FILE: &str = "playlists.json";

/// Listen address used when nothing else is configured
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Folder served under `/static` when nothing else is configured
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Log level used when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging section of the TOML config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Contents of `config.toml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TomlConfig {
    pub playlists_path: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub static_assets: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub playlists_path: Option<PathBuf>,
    pub bind_addr: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub playlists_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
    pub log_level: String,
    /// TOML file the settings were read from, if any
    pub config_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Resolve configuration from overrides, the TOML file, and compiled defaults
    ///
    /// An explicitly named config file must exist. When none is named, the
    /// platform default location is tried and silently skipped if absent.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let config_file = overrides.config_file.clone().or_else(default_config_file);
        let toml_config = match &config_file {
            Some(path) => TomlConfig::load(path)?,
            None => TomlConfig::default(),
        };

        let mut config = Self::merge(overrides, toml_config)?;
        config.config_file = config_file;
        Ok(config)
    }

    /// Apply the priority order to already-loaded sources
    pub fn merge(overrides: ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let playlists_path = overrides
            .playlists_path
            .or(toml_config.playlists_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAYLISTS_FILE));

        let bind_str = overrides
            .bind_addr
            .or(toml_config.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_str
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind_str, e)))?;

        let static_dir = overrides
            .static_dir
            .or(toml_config.static_assets)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            playlists_path,
            bind_addr,
            static_dir,
            log_level: toml_config.logging.level,
            config_file: None,
        })
    }
}

/// Locate the default config file for the platform, if one exists
///
/// Linux checks `~/.config/moodplay/config.toml`, then `/etc/moodplay/config.toml`.
/// Other platforms check only the user config directory.
pub fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("moodplay").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/moodplay/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
