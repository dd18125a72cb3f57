//! CLI Commands

pub mod config;
pub mod guests;
pub mod register;

use guestdesk_client::{ClientConfig, HttpGuestRegistry};

/// Registry client for the configured endpoint
pub fn registry(config: &ClientConfig) -> Result<HttpGuestRegistry, String> {
    config.check().map_err(|e| e.to_string())?;
    HttpGuestRegistry::from_config(config).map_err(|e| e.to_string())
}
