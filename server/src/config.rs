//! Server configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before this runs, so local development can keep
//! the backend address out of the shell environment.

use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    pub port: u16,
}

impl ServerConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `API_URL`: backend base URL, default `http://localhost:8000`
    /// - `PORT`: listen port, default 3000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when `PORT` is not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("API_URL").ok();
        let port = std::env::var("PORT").ok();
        Self::from_vars(api_url.as_deref(), port.as_deref())
    }

    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] when `port` is not a port number.
    pub fn from_vars(api_url: Option<&str>, port: Option<&str>) -> Result<Self, ConfigError> {
        let api_url = non_empty(api_url)
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_owned();
        let port = match non_empty(port) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.to_owned()))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { api_url, port })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
