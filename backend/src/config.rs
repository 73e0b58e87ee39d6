//! Runtime configuration read from `ANIMALS_*` environment variables.
use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DATABASE_URL_VAR: &str = "ANIMALS_DATABASE_URL";
pub const UPLOAD_DIR_VAR: &str = "ANIMALS_UPLOAD_DIR";
pub const BIND_ADDR_VAR: &str = "ANIMALS_BIND_ADDR";
pub const MAX_UPLOAD_BYTES_VAR: &str = "ANIMALS_MAX_UPLOAD_BYTES";

const DEFAULT_DATABASE_URL: &str = "sqlite:animals.db";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or blank keys take their default
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = value(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .trim()
            .parse()
            .with_context(|| {
                format!("{} is not a valid socket address: '{}'", BIND_ADDR_VAR, bind_addr)
            })?;

        let max_upload_bytes = match value(MAX_UPLOAD_BYTES_VAR) {
            Some(raw) => raw.trim().parse().with_context(|| {
                format!("{} must be a positive integer: '{}'", MAX_UPLOAD_BYTES_VAR, raw)
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        if max_upload_bytes == 0 {
            anyhow::bail!("{} must be greater than zero", MAX_UPLOAD_BYTES_VAR);
        }

        Ok(Self {
            database_url: value(DATABASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            upload_dir: value(UPLOAD_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            bind_addr,
            max_upload_bytes,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
