use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const REMOTE_URL_ENV: &str = "FINTRACK_REMOTE_URL";
pub const REMOTE_KEY_ENV: &str = "FINTRACK_REMOTE_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

/// Endpoint and key of a hosted datastore, present only when both are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub url: String,
    pub api_key: String,
}

fn default_user_id() -> String {
    "1".to_string()
}

fn default_currency() -> String {
    "€".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            user_id: default_user_id(),
            currency: default_currency(),
            remote: None,
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, falling back to defaults when
    /// no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "fintrack", "fintrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Applies remote endpoint overrides from the given variable lookup.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup(REMOTE_URL_ENV);
        let api_key = lookup(REMOTE_KEY_ENV);
        if url.is_some() || api_key.is_some() {
            let remote = self.remote.get_or_insert_with(RemoteConfig::default);
            if url.is_some() {
                remote.url = url;
            }
            if api_key.is_some() {
                remote.api_key = api_key;
            }
        }
        self
    }

    /// Returns the remote endpoint when both the URL and the key are non-empty.
    pub fn remote_endpoint(&self) -> Option<RemoteEndpoint> {
        let remote = self.remote.as_ref()?;
        let url = remote.url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let api_key = remote
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some(RemoteEndpoint {
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}
