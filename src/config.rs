use crate::analysis::{AnalysisSettings, UploadPolicy};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const API_URL_ENV: &str = "ONCODERMA_API_URL";

#[derive(Debug)]
pub enum ConfigError {
    Read(String),
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub health_timeout_ms: u64,
    pub max_file_size: u64,
    pub allowed_mime_types: Vec<String>,
    pub session_path: String,
}

impl Default for Config {
    fn default() -> Self {
        let policy = UploadPolicy::default();
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_ms: 30_000,
            health_timeout_ms: 5_000,
            max_file_size: policy.max_file_size,
            allowed_mime_types: policy.allowed_mime_types,
            session_path: "./storage".to_string(),
        }
    }
}

impl Config {
    /// Reads `file_path`; a missing file yields the defaults.
    pub fn from_file(file_path: &str) -> Result<Self, ConfigError> {
        let mut config = if Path::new(file_path).exists() {
            let config_str =
                fs::read_to_string(file_path).map_err(|e| ConfigError::Read(e.to_string()))?;
            Self::from_toml(&config_str)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn from_toml(config_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(config_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            allowed_mime_types: self.allowed_mime_types.clone(),
            max_file_size: self.max_file_size,
        }
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            health_timeout: Duration::from_millis(self.health_timeout_ms),
            policy: self.upload_policy(),
            ..AnalysisSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            api_base_url = "https://oncoderma.example"
            request_timeout_ms = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://oncoderma.example");
        assert_eq!(config.request_timeout_ms, 1000);
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.session_path, "./storage");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("api_base_url = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn test_analysis_settings() {
        let config = Config {
            request_timeout_ms: 2500,
            allowed_mime_types: vec!["image/png".to_string()],
            ..Config::default()
        };
        let settings = config.analysis_settings();
        assert_eq!(settings.request_timeout, Duration::from_millis(2500));
        assert!(settings.policy.allows("image/png"));
        assert!(!settings.policy.allows("image/jpeg"));
        assert_eq!(settings.result_ttl_ms, 30 * 60 * 1000);
    }
}
