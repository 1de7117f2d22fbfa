// src/config.rs
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::demo::engine::DEFAULT_DELAY;
use crate::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_UPLOAD_MB: usize = 20;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub bind_addr: SocketAddr,
    pub demo_delay: Duration,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        // API_KEY is still accepted as a legacy name
        let gemini_api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY"));

        let bind_addr = match non_empty("BIND_ADDR") {
            Some(value) => value
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidValue { name: "BIND_ADDR", value })?,
            None => SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        };

        let demo_delay = match non_empty("DEMO_DELAY_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidValue { name: "DEMO_DELAY_MS", value })?,
            None => DEFAULT_DELAY,
        };

        let max_upload_mb = match non_empty("MAX_UPLOAD_MB") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or(ConfigError::InvalidValue { name: "MAX_UPLOAD_MB", value })?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: non_empty("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bind_addr,
            demo_delay,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.demo_delay, Duration::from_millis(2000));
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_api_key_fallback_and_blank_values() {
        let config = config(&[("GEMINI_API_KEY", "  "), ("API_KEY", "abc")]).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));

        let config = self::config(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "legacy")]).unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(matches!(
            config(&[("DEMO_DELAY_MS", "soon")]),
            Err(ConfigError::InvalidValue { name: "DEMO_DELAY_MS", .. })
        ));
        assert!(matches!(
            config(&[("BIND_ADDR", "localhost")]),
            Err(ConfigError::InvalidValue { name: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("MAX_UPLOAD_MB", "0")]),
            Err(ConfigError::InvalidValue { name: "MAX_UPLOAD_MB", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DEMO_DELAY_MS", "50"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.demo_delay, Duration::from_millis(50));
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
    }
}
