//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// File configuration for csvdist
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub google: GoogleConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_url: csvdist_core::DEFAULT_API_URL.to_string(),
            api_key: std::env::var(csvdist_core::API_KEY_ENV).ok(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base for relative input/output paths (default: the executable's directory)
    pub base_dir: Option<PathBuf>,
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./csvdist.toml (current directory)
    /// 2. ~/.config/csvdist/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("csvdist.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "csvdist") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn base_dir(&self) -> PathBuf {
        self.paths
            .base_dir
            .clone()
            .unwrap_or_else(csvdist_core::default_base_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.google.api_url, csvdist_core::DEFAULT_API_URL);
        assert!(config.paths.base_dir.is_none());
        assert!(config.base_dir().is_absolute());
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("CSVDIST_TEST_KEY", "secret");
        assert_eq!(
            expand_env_var("${CSVDIST_TEST_KEY}"),
            Some("secret".to_string())
        );
        std::env::remove_var("CSVDIST_TEST_KEY");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[google]
api_url = "http://localhost:8080/distancematrix/json"
api_key = "abc123"

[paths]
base_dir = "/data/trips"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.google.api_url,
            "http://localhost:8080/distancematrix/json"
        );
        assert_eq!(config.google.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.base_dir(), PathBuf::from("/data/trips"));
    }

    #[test]
    fn from_file_reports_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("csvdist.toml");
        std::fs::write(&path, "[google\napi_url = 1").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
