use std::{env, path::PathBuf, str::FromStr};

use btcmap::RegistryConfig;
use database::DatabaseConfig;

use crate::middleware::cors::AllowedOrigins;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_UPLOAD_DIR: &str = "static/logos";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Everything the server needs, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub allowed_origins: AllowedOrigins,
    pub registry: RegistryConfig,
    pub database: DatabaseConfig,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid value '{value}' for {key}.");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("API_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned()),
            port: var_or("API_PORT", DEFAULT_PORT),
            debug: env::var("API_DEBUG")
                .map(|flag| flag.eq_ignore_ascii_case("true") || flag == "1")
                .unwrap_or(false),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|list| AllowedOrigins::parse(&list))
                .unwrap_or_default(),
            registry: RegistryConfig::from_env(),
            database: DatabaseConfig::from_env(),
            upload_dir: env::var("UPLOAD_FOLDER")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_owned())
                .into(),
            max_upload_bytes: var_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default tracing filter directive.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
