//! CLI Configuration

use crate::output::OutputFormat;
use clap::ValueEnum;
use guestdesk_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub default_format: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub navigation_delay_ms: Option<u64>,
    pub hide_deleted: Option<bool>,
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "api_url",
        "default_format",
        "timeout_secs",
        "log_level",
        "navigation_delay_ms",
        "hide_deleted",
    ];

    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, String> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, content).map_err(|e| e.to_string())
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), String> {
        match key {
            "api_url" => self.api_url = Some(value),
            "default_format" => {
                OutputFormat::from_str(&value, true)?;
                self.default_format = Some(value);
            }
            "timeout_secs" => {
                let secs = value.parse().map_err(|_| format!("Not a number: {}", value))?;
                self.timeout_secs = Some(secs);
            }
            "log_level" => self.log_level = Some(value),
            "navigation_delay_ms" => {
                let ms = value.parse().map_err(|_| format!("Not a number: {}", value))?;
                self.navigation_delay_ms = Some(ms);
            }
            "hide_deleted" => {
                let hide = value.parse().map_err(|_| format!("Expected true or false: {}", value))?;
                self.hide_deleted = Some(hide);
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, String> {
        let value = match key {
            "api_url" => self.api_url.clone(),
            "default_format" => self.default_format.clone(),
            "timeout_secs" => self.timeout_secs.map(|s| s.to_string()),
            "log_level" => self.log_level.clone(),
            "navigation_delay_ms" => self.navigation_delay_ms.map(|ms| ms.to_string()),
            "hide_deleted" => self.hide_deleted.map(|hide| hide.to_string()),
            _ => return Err(format!("Unknown config key: {}", key)),
        };
        Ok(value)
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
    }

    /// Library settings: flags first, then this profile, then defaults
    pub fn client_config(&self, api_url: Option<String>, timeout_secs: Option<u64>) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            api_url: api_url
                .or_else(|| self.api_url.clone())
                .unwrap_or(defaults.api_url),
            timeout_secs: timeout_secs
                .or(self.timeout_secs)
                .unwrap_or(defaults.timeout_secs),
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
            navigation_delay_ms: self
                .navigation_delay_ms
                .unwrap_or(defaults.navigation_delay_ms),
            hide_deleted: self.hide_deleted.unwrap_or(defaults.hide_deleted),
        }
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".guestdesk").join(filename))
    }
}
