use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `catalog.api_key`
pub const API_KEY_ENV: &str = "BOOKIFY_API_KEY";

/// Application configuration loaded from ~/.config/bookify/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Configuration for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. "127.0.0.1:5000"
    #[serde(default = "default_bind")]
    pub bind: String,
}

/// Configuration for the remote book catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Search endpoint (Google Books volumes API shape)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,

    /// Result-count limit sent as `maxResults`
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Value of the `printType` parameter
    #[serde(default = "default_print_type")]
    pub print_type: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Configuration for browser sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Sessions unused for this long are discarded (default: 7 days)
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// How often expired sessions are purged
    #[serde(default = "default_purge_interval")]
    pub purge_interval_secs: u64,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/books/v1/volumes".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_print_type() -> String {
    "books".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cookie_name() -> String {
    "bookify_session".to_string()
}

fn default_idle_timeout() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

fn default_purge_interval() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            max_results: default_max_results(),
            print_type: default_print_type(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_secs: default_idle_timeout(),
            purge_interval_secs: default_purge_interval(),
        }
    }
}

impl Config {
    /// Load configuration from `path` if given, otherwise from the default path,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load_from(&Self::config_path()?)?,
        };
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        let mut config: Self =
            toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;
        config.catalog.api_key = config.catalog.api_key.filter(|k| !k.trim().is_empty());
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("bookify").join("config.toml"))
    }

    /// Override the API key from the environment, ignoring blank values
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.catalog.api_key = Some(key);
        }
    }

    /// Get the bind address, with CLI override taking precedence
    pub fn bind(&self, cli_override: Option<&str>) -> String {
        cli_override
            .map(String::from)
            .unwrap_or_else(|| self.server.bind.clone())
    }
}
