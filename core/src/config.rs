//! Client configuration from the environment.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const BASE_URL_VAR: &str = "CLIENTES_API_URL";
pub const TIMEOUT_VAR: &str = "CLIENTES_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server root; the `/clientes` resource path is appended by the client.
    pub base_url: String,
    /// Overall per-request timeout. `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Read `CLIENTES_API_URL` and `CLIENTES_TIMEOUT_SECS`, loading a `.env`
    /// file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self { base_url, timeout })
    }
}

pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            var: TIMEOUT_VAR,
            value: raw.to_string(),
        })
}
