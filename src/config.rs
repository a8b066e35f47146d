// src/config.rs

use std::{env, net::SocketAddr, time::Duration};

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

/// Default size cap for multipart uploads, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Origin of the PlayEdu backend, e.g. `http://127.0.0.1:9898`.
    pub backend_url: Url,
    pub listen_addr: SocketAddr,
    pub rust_log: String,
    pub log_dir: String,
    pub max_upload_bytes: usize,
    pub console_origins: Vec<String>,
    /// `None` keeps the transport default.
    pub backend_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let backend_url = env::var("BACKEND_URL").map_err(|_| ConfigError::Missing("BACKEND_URL"))?;
        let backend_url = Url::parse(&backend_url).map_err(|e| ConfigError::Invalid {
            name: "BACKEND_URL",
            reason: e.to_string(),
        })?;

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "LISTEN_ADDR",
                reason: e.to_string(),
            })?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let max_upload_mb = match env::var("MAX_UPLOAD_MB") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
                name: "MAX_UPLOAD_MB",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };

        let console_origins = env::var("CONSOLE_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let backend_timeout = match env::var("BACKEND_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::Invalid {
                    name: "BACKEND_TIMEOUT_SECS",
                    reason: e.to_string(),
                }
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            backend_url,
            listen_addr,
            rust_log,
            log_dir,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            console_origins,
            backend_timeout,
        })
    }

    /// Config pointing at a given backend with defaults for everything else.
    pub fn for_backend(backend_url: Url) -> Self {
        Self {
            backend_url,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            rust_log: "error".to_string(),
            log_dir: "logs".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            console_origins: vec!["http://localhost:3000".to_string()],
            backend_timeout: None,
        }
    }
}
