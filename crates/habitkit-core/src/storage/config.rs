//! TOML-based application configuration.
//!
//! Stores the API gateway location and the credential backend choice.
//! Configuration lives at `~/.config/habitkit/config.toml`; the
//! `HABITKIT_API_URL` environment variable overrides the gateway URL at
//! load time without touching the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// API gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Credential storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Credential backend: "keyring" or "file".
    #[serde(default = "default_credentials")]
    pub credentials: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitkit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".into()
}

fn default_credentials() -> String {
    "keyring".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            credentials: default_credentials(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/habitkit"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, falling back to defaults when the file is absent.
    /// `HABITKIT_API_URL` overrides the configured gateway URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        let mut cfg = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(_) => Self::default(),
        };
        if let Ok(url) = std::env::var("HABITKIT_API_URL") {
            cfg.api.base_url = url;
        }
        Ok(cfg)
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get_value(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Only existing keys can be
    /// set; the caller persists with [`Config::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let mut parts = key.split('.').peekable();
        let mut current = &mut json;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .filter(|obj| obj.contains_key(part))
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                obj.insert(part.to_string(), serde_json::Value::String(value.into()));
            } else {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            }
        }

        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Flatten to `key = value` lines for `config list`.
    pub fn entries(&self) -> Vec<(String, String)> {
        vec![
            ("api.base_url".into(), self.api.base_url.clone()),
            ("storage.credentials".into(), self.storage.credentials.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.base_url, "http://localhost:8080/api");
        assert_eq!(parsed.storage.credentials, "keyring");
    }

    #[test]
    fn empty_file_fills_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.api.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn get_and_set_by_dotted_key() {
        let mut cfg = Config::default();
        cfg.set_value("api.base_url", "https://habits.example.com/api")
            .unwrap();
        assert_eq!(
            cfg.get_value("api.base_url").as_deref(),
            Some("https://habits.example.com/api")
        );
        assert!(cfg.set_value("api.nope", "x").is_err());
        assert!(cfg.get_value("nope").is_none());
    }
}
