// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JSON file listing the layers
    pub layers_path: PathBuf,
    /// Directory local layer sources are resolved against
    pub data_dir: PathBuf,
    /// Time bound for each layer query (retries included)
    pub query_timeout: Duration,
    /// Retries of transient errors per layer query
    pub query_retries: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            layers_path: PathBuf::from("data/layers.json"),
            data_dir: PathBuf::from("data"),
            query_timeout: Duration::from_millis(8000),
            query_retries: 1,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let query_timeout_ms: u64 = parse_var("QUERY_TIMEOUT_MS", 8000)?;
        if query_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "QUERY_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_var("PORT", 8080)?,
            layers_path: env::var("LAYERS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/layers.json")),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            query_timeout: Duration::from_millis(query_timeout_ms),
            query_retries: parse_var("QUERY_RETRIES", 1)?,
        })
    }
}

/// Parse a numeric variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
