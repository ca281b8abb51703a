//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend endpoint, request timeout, default headers,
//! the token storage backend and the last used email.
//!
//! Configuration is stored at `~/.config/ledgerlink/config.json`. Values can
//! be overridden with `LEDGERLINK_BASE_URL`, `LEDGERLINK_TIMEOUT_MS` and
//! `LEDGERLINK_TOKEN_BACKEND`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};

/// Application name used for config directory paths
const APP_NAME: &str = "ledgerlink";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Token file name, used by the file token backend
const TOKEN_FILE: &str = "token.json";

/// Backend root used when nothing else is configured (Laravel `artisan serve`).
pub const DEFAULT_BASE_ENDPOINT: &str = "http://localhost:8000/api";

/// Request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const ENV_BASE_URL: &str = "LEDGERLINK_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "LEDGERLINK_TIMEOUT_MS";
pub const ENV_TOKEN_BACKEND: &str = "LEDGERLINK_TOKEN_BACKEND";

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ])
}

/// Where the bearer token is persisted between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// OS keychain
    Keyring,
    /// JSON file next to the config
    #[default]
    File,
    /// Process memory only; the session ends with the process
    Memory,
}

impl FromStr for TokenBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyring" => Ok(TokenBackend::Keyring),
            "file" => Ok(TokenBackend::File),
            "memory" => Ok(TokenBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown token backend '{}' (expected keyring, file or memory)",
                other
            )),
        }
    }
}

/// Options for [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Fixed root URL every request path is appended to.
    pub base_endpoint: String,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// Headers applied to every request before the auth interceptor runs.
    pub default_headers: BTreeMap<String, String>,
}

impl ClientConfig {
    pub fn new(base_endpoint: impl Into<String>) -> Self {
        Self {
            base_endpoint: base_endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_endpoint: DEFAULT_BASE_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_headers: default_headers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub base_endpoint: String,
    pub timeout_ms: u64,
    pub default_headers: BTreeMap<String, String>,
    pub token_backend: TokenBackend,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_endpoint: DEFAULT_BASE_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_headers: default_headers(),
            token_backend: TokenBackend::default(),
            last_email: None,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_endpoint = url.trim().to_string();
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", ENV_TIMEOUT_MS))?;
        }
        if let Some(backend) = lookup(ENV_TOKEN_BACKEND) {
            self.token_backend = backend.parse()?;
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_endpoint: self.base_endpoint.clone(),
            timeout_ms: self.timeout_ms,
            default_headers: self.default_headers.clone(),
        }
    }

    /// Build the token store selected by `token_backend`.
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        Ok(self.token_store_in(&Self::config_dir()?))
    }

    /// Build the token store, placing file tokens under `dir`.
    pub fn token_store_in(&self, dir: &Path) -> Arc<dyn TokenStore> {
        match self.token_backend {
            TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()),
            TokenBackend::File => Arc::new(FileTokenStore::new(dir.join(TOKEN_FILE))),
            TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
        }
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
