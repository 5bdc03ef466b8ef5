use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable that overrides the configured backend base URL.
pub const API_URL_ENV: &str = "FINBOARD_API_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/services/api";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    /// Streaming endpoint, carried as plain configuration so callers that
    /// need a live connection receive the address explicitly instead of
    /// rewriting a global.
    #[serde(default)]
    pub ws_url: Option<String>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api: ApiConfig::default(),
            ws_url: None,
            locale: default_locale(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default platform location. A missing file
    /// is not an error: the built-in defaults point at a local backend.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::with_env_overrides(Self::default()));
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "finboard", "finboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "finboard", "finboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(Self::with_env_overrides(config))
    }

    // Environment values are read once at load; there is no hot reload.
    fn with_env_overrides(mut config: Self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                debug!("Overriding base URL from {API_URL_ENV}");
                config.api.base_url = url;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
api:
  base_url: "https://dashboard.example.com/services/api"
  api_key: "k-123"
ws_url: "wss://dashboard.example.com/ws"
locale: "fr"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.api.base_url,
            "https://dashboard.example.com/services/api"
        );
        assert_eq!(config.api.api_key.as_deref(), Some("k-123"));
        assert_eq!(
            config.ws_url.as_deref(),
            Some("wss://dashboard.example.com/ws")
        );
        assert_eq!(config.locale, "fr");
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.api.api_key.is_none());
        assert!(config.ws_url.is_none());
        assert_eq!(config.locale, "en");
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_missing_optional_sections() {
        let yaml_str = r#"
locale: "en"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }
}
