use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use asb_config::{
    ASB_API_HOST, ASB_API_PORT, ASB_BACKEND_TOKEN, ASB_BACKEND_URL, ASB_CORS_ORIGIN,
    ASB_DATABASE_PATH, ASB_HTTP_TIMEOUT_SECS, DEFAULT_API_HOST, DEFAULT_API_PORT,
    DEFAULT_CORS_ORIGIN, DEFAULT_HTTP_TIMEOUT_SECS, PORT,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid HTTP timeout: {0}")]
    InvalidTimeout(String),
    #[error("ASB_BACKEND_URL is not set")]
    MissingBackendUrl,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub cors_origin: String,
    pub database_path: PathBuf,
    pub backend_url: Option<String>,
    pub backend_token: Option<String>,
    pub http_timeout: Duration,
}

/// Non-empty value of an environment variable
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match var(ASB_API_PORT).or_else(|| var(PORT)) {
            Some(raw) => raw.parse::<u16>()?,
            None => DEFAULT_API_PORT,
        };

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host_str = var(ASB_API_HOST).unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        let host = host_str
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_str.clone()))?;

        let cors_origin = var(ASB_CORS_ORIGIN).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        let database_path = var(ASB_DATABASE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(asb_core::database_file);

        let http_timeout = match var(ASB_HTTP_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Config {
            port,
            host,
            cors_origin,
            database_path,
            backend_url: var(ASB_BACKEND_URL),
            backend_token: var(ASB_BACKEND_TOKEN),
            http_timeout,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn require_backend_url(&self) -> Result<&str, ConfigError> {
        self.backend_url
            .as_deref()
            .ok_or(ConfigError::MissingBackendUrl)
    }
}
