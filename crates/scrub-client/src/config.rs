//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the client can start with zero
//! configuration against a local API.

use std::path::PathBuf;
use std::time::Duration;

use scrub_shared::constants::{
    DEFAULT_API_URL, DEFAULT_PURGE_MAX_ROUNDS, DEFAULT_REQUEST_TIMEOUT_SECS,
};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the RPC endpoint.
    /// Env: `SCRUB_API_URL`
    pub api_url: String,

    /// SQLite database file.  `None` uses the platform data directory.
    /// Env: `SCRUB_DATABASE_PATH`
    pub database_path: Option<PathBuf>,

    /// Upper bound on `DeleteUserHistory` round trips per purge.
    /// Env: `SCRUB_PURGE_MAX_ROUNDS` (must be at least 1)
    pub purge_max_rounds: u32,

    /// Per-request HTTP timeout.
    /// Env: `SCRUB_REQUEST_TIMEOUT_SECS`
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            database_path: None,
            purge_max_rounds: DEFAULT_PURGE_MAX_ROUNDS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SCRUB_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }

        if let Some(path) = lookup("SCRUB_DATABASE_PATH") {
            if !path.is_empty() {
                config.database_path = Some(PathBuf::from(path));
            }
        }

        if let Some(val) = lookup("SCRUB_PURGE_MAX_ROUNDS") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.purge_max_rounds = n,
                _ => {
                    tracing::warn!(value = %val, "Invalid SCRUB_PURGE_MAX_ROUNDS, using default");
                }
            }
        }

        if let Some(val) = lookup("SCRUB_REQUEST_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %val, "Invalid SCRUB_REQUEST_TIMEOUT_SECS, using default");
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:8080");
        assert_eq!(config.purge_max_rounds, 1000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.database_path.is_none());
        assert_eq!(load(&[]), config);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SCRUB_API_URL", "https://api.example.org"),
            ("SCRUB_DATABASE_PATH", "/tmp/scrub.db"),
            ("SCRUB_PURGE_MAX_ROUNDS", "25"),
            ("SCRUB_REQUEST_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.api_url, "https://api.example.org");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/scrub.db")));
        assert_eq!(config.purge_max_rounds, 25);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = load(&[
            ("SCRUB_PURGE_MAX_ROUNDS", "0"),
            ("SCRUB_REQUEST_TIMEOUT_SECS", "soon"),
        ]);
        assert_eq!(config.purge_max_rounds, DEFAULT_PURGE_MAX_ROUNDS);
        assert_eq!(
            config.request_timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }
}
