//! Client configuration

use crate::ClientError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Registry base URL, without the `/guests` suffix
    pub api_url: String,
    /// HTTP request timeout
    pub timeout_secs: u64,
    /// Pause between a successful submit and the jump to the guest list
    pub navigation_delay_ms: u64,
    /// Drop soft-deleted guests from list results
    pub hide_deleted: bool,
    /// Logging level
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/v1".into(),
            timeout_secs: 10,
            navigation_delay_ms: 2000,
            hide_deleted: true,
            log_level: "warn".into(),
        }
    }
}

impl ClientConfig {
    /// Load from a JSON file. Embedders that keep their own settings file
    /// use this; the CLI builds the config from its TOML profile instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Save to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Reject settings the registry client cannot work with
    pub fn check(&self) -> Result<(), ClientError> {
        let url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("api_url {}: {}", self.api_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!("unsupported scheme: {}", url.scheme())));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");

        let config = ClientConfig {
            api_url: "http://registry.local/api/v1".into(),
            navigation_delay_ms: 500,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.navigation_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(&path, r#"{ "timeout_secs": 3 }"#).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded.timeout_secs, 3);
        assert_eq!(loaded.api_url, ClientConfig::default().api_url);
    }

    #[test]
    fn test_check() {
        assert!(ClientConfig::default().check().is_ok());

        let bad_url = ClientConfig { api_url: "localhost:3000".into(), ..Default::default() };
        assert!(matches!(bad_url.check(), Err(ClientError::Config(_))));

        let no_timeout = ClientConfig { timeout_secs: 0, ..Default::default() };
        assert!(no_timeout.check().is_err());
    }

    #[test]
    fn test_garbage_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(&path, "not json").unwrap();

        let err = ClientConfig::load(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
