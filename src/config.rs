//! Runtime configuration read from the environment (and `.env`, if present).

use std::str::FromStr;

use crate::{PrintShopError, Result};

const DEFAULT_PORT: u16 = 8084;
const DEFAULT_IDLE_MINUTES: i64 = 60;
/// Thirty days; anything longer is a typo rather than a timeout.
const MAX_IDLE_MINUTES: i64 = 30 * 24 * 60;
/// Base64 inflates by 4/3, so a 50 MiB file needs roughly 67 MiB of JSON.
const DEFAULT_MAX_REQUEST_BYTES: usize = 72 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session_idle_minutes: i64,
    pub max_request_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            session_idle_minutes: DEFAULT_IDLE_MINUTES,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; missing keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT", defaults.port)?,
            session_idle_minutes: parse(&lookup, "SESSION_IDLE_MINUTES", defaults.session_idle_minutes)?,
            max_request_bytes: parse(&lookup, "MAX_REQUEST_BYTES", defaults.max_request_bytes)?,
        };
        if !(1..=MAX_IDLE_MINUTES).contains(&config.session_idle_minutes) {
            return Err(PrintShopError::InvalidConfig { key: "SESSION_IDLE_MINUTES", value: config.session_idle_minutes.to_string() });
        }
        Ok(config)
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }

    pub fn session_idle(&self) -> chrono::Duration { chrono::Duration::minutes(self.session_idle_minutes) }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| PrintShopError::InvalidConfig { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8084");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "9000"), ("HOST", "127.0.0.1"), ("SESSION_IDLE_MINUTES", "5")])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.session_idle_minutes, 5);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(PrintShopError::InvalidConfig { key: "PORT", .. })
        ));
        assert!(AppConfig::from_lookup(lookup(&[("SESSION_IDLE_MINUTES", "0")])).is_err());
        for huge in ["43201", "1000000000000", "200000000000000"] {
            assert!(matches!(
                AppConfig::from_lookup(lookup(&[("SESSION_IDLE_MINUTES", huge)])),
                Err(PrintShopError::InvalidConfig { key: "SESSION_IDLE_MINUTES", .. })
            ));
        }
        let longest = AppConfig::from_lookup(lookup(&[("SESSION_IDLE_MINUTES", "43200")])).unwrap();
        assert_eq!(longest.session_idle(), chrono::Duration::days(30));
    }
}
