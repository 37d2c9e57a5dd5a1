use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(stripped) = s.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if s == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

/// Configuration for rcon-rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Console API root (`http://host:port/api/`) or a local state directory
    #[serde(default = "defaults::default_api_url")]
    pub api_url: String,
    /// Bearer token sent with every API request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Seconds between vote-map config polls
    #[serde(default = "defaults::default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Per-request timeout
    #[serde(default = "defaults::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::default_api_url(),
            api_token: None,
            refresh_interval_secs: defaults::default_refresh_interval_secs(),
            request_timeout_secs: defaults::default_request_timeout_secs(),
        }
    }
}

impl ConsoleConfig {
    /// Load from `path` (or the default location), then apply `RCON_*`
    /// environment overrides. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path)?;
        tracing::debug!("loading rcon-rotation config from {:?}", config_path);

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else if path.is_some() {
            anyhow::bail!("config file not found at {:?}", config_path);
        } else {
            Self::default()
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: ConsoleConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        if !config.api_url.starts_with("http") {
            config.api_url = expand_tilde(Path::new(&config.api_url))
                .to_string_lossy()
                .into_owned();
        }

        Ok(config)
    }

    /// Apply overrides looked up by environment variable name
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("RCON_API_URL") {
            self.api_url = url;
        }

        if let Some(token) = lookup("RCON_API_TOKEN") {
            self.api_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Some(secs) = lookup("RCON_REFRESH_INTERVAL_SECS") {
            self.refresh_interval_secs = secs
                .parse()
                .context("Failed to parse RCON_REFRESH_INTERVAL_SECS as u64")?;
        }

        if let Some(secs) = lookup("RCON_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = secs
                .parse()
                .context("Failed to parse RCON_REQUEST_TIMEOUT_SECS as u64")?;
        }

        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be greater than zero");
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// `path` with `~` expanded, or the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(expand_tilde(path)),
            None => Self::config_file_path(),
        }
    }

    /// Get default config file path
    pub fn config_file_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config/rcon-rotation/config.yaml"))
            .context("Could not determine home directory for config file")
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

mod defaults {
    pub(crate) fn default_api_url() -> String {
        "http://localhost:8010/api/".to_string()
    }

    pub(crate) fn default_refresh_interval_secs() -> u64 {
        10
    }

    pub(crate) fn default_request_timeout_secs() -> u64 {
        10
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");

        let config = ConsoleConfig {
            api_url: "https://rcon.example.com/api/".to_string(),
            api_token: Some("secret".to_string()),
            refresh_interval_secs: 30,
            request_timeout_secs: 5,
        };
        config.save(&config_path).unwrap();

        let loaded = ConsoleConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "api_url: http://10.0.0.2:8010/api/\n").unwrap();

        let loaded = ConsoleConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.api_url, "http://10.0.0.2:8010/api/");
        assert_eq!(loaded.refresh_interval(), Duration::from_secs(10));
        assert_eq!(loaded.request_timeout(), Duration::from_secs(10));
        assert_eq!(loaded.api_token, None);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "api_urll: http://typo/\n").unwrap();

        assert!(ConsoleConfig::load_from_file(&config_path).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(ConsoleConfig::load(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("RCON_API_URL", "file::/srv/rotation"),
            ("RCON_API_TOKEN", "abc"),
            ("RCON_REFRESH_INTERVAL_SECS", "60"),
        ]);

        let mut config = ConsoleConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_url, "file::/srv/rotation");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_bad_override_is_error() {
        let mut config = ConsoleConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "RCON_REFRESH_INTERVAL_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());

        let result = config.apply_overrides(|key| {
            (key == "RCON_REFRESH_INTERVAL_SECS").then(|| "0".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_tilde_expansion() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, "api_url: ~/rotation\n").unwrap();

        let loaded = ConsoleConfig::load_from_file(&config_path).unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(PathBuf::from(&loaded.api_url), home.join("rotation"));
        }
    }
}
