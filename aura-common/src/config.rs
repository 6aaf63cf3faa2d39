//! Configuration loading and resolution
//!
//! Settings resolve with the priority order:
//! 1. Environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// YouTube Data API v3 key; absent means the scraping backend is used
    pub youtube_api_key: Option<String>,
    /// Public base URL of this application (embed `origin` parameter)
    pub base_url: String,
}

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<String>,
    pub youtube_api_key: Option<String>,
    pub base_url: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config file, returning defaults when the file is absent
    pub fn load(path: Option<&std::path::Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_file() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

impl Config {
    /// Resolve configuration from environment, TOML file and defaults
    pub fn load() -> Result<Self> {
        let toml_config = TomlConfig::load(None)?;
        Ok(Self::resolve(&toml_config))
    }

    /// Apply the ENV → TOML → default priority to each setting
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let host = std::env::var("AURA_HOST")
            .ok()
            .or_else(|| toml_config.host.clone())
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let port = std::env::var("AURA_PORT")
            .ok()
            .and_then(|v| match v.parse::<u16>() {
                Ok(p) => Some(p),
                Err(_) => {
                    warn!("Ignoring invalid AURA_PORT value: {}", v);
                    None
                }
            })
            .or(toml_config.port)
            .unwrap_or(8000);

        let data_dir = std::env::var("AURA_DATA_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| toml_config.data_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let youtube_api_key = resolve_youtube_api_key(toml_config);

        let base_url = std::env::var("AURA_BASE_URL")
            .ok()
            .or_else(|| toml_config.base_url.clone())
            .unwrap_or_else(|| "http://localhost:8000".to_string());

        Self {
            host,
            port,
            data_dir,
            youtube_api_key,
            base_url,
        }
    }

    /// Path of the SQLite database inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("aura.db")
    }
}

/// Resolve the YouTube API key from ENV → TOML
///
/// Empty and whitespace-only values count as absent. A key present in both
/// sources logs a warning and the environment wins.
fn resolve_youtube_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var("YOUTUBE_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let toml_key = toml_config
        .youtube_api_key
        .clone()
        .filter(|k| !k.trim().is_empty());

    if env_key.is_some() && toml_key.is_some() {
        warn!("YouTube API key found in both environment and TOML config. Using environment.");
    }

    env_key.or(toml_key)
}

/// Default configuration file path for the platform
fn default_config_file() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        let user_config = dirs::config_dir().map(|d| d.join("aura").join("config.toml"));
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc/aura/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        user_config
    } else {
        dirs::config_dir().map(|d| d.join("aura").join("config.toml"))
    }
}

/// OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("aura"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}
