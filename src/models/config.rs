use crate::models::config_validator::validate_config;
use crate::models::error::{LogDataError, Result};
use crate::utils::log_handler::DEFAULT_TAIL_BUFFER_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// SQLite file holding the ErrorLog table. Empty means in-memory.
    #[serde(default)]
    pub database_file: String,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_tail_buffer_size")]
    pub tail_buffer_size: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}
const fn default_port() -> u16 {
    8200
}
const fn default_tail_buffer_size() -> usize {
    DEFAULT_TAIL_BUFFER_SIZE
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: String::new(),
            address: default_address(),
            port: default_port(),
            tail_buffer_size: default_tail_buffer_size(),
            log_level: default_log_level(),
        }
    }
}

/// Tail buffers above this size get a warning at startup
pub const LARGE_TAIL_BUFFER_SIZE: usize = 1_000_000;

impl Config {
    pub fn log_level_filter(&self) -> log::LevelFilter {
        parse_level_filter(&self.log_level)
    }

    pub fn uses_memory_database(&self) -> bool {
        self.database_file.is_empty() || self.database_file == ":memory:"
    }

    pub fn has_large_tail_buffer(&self) -> bool {
        self.tail_buffer_size > LARGE_TAIL_BUFFER_SIZE
    }
}

/// Map a level name to a filter, defaulting to Info
pub fn parse_level_filter(level: &str) -> log::LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    }
}

pub fn setup_config(config_file: String) -> Result<Config> {
    let config_path = PathBuf::from(config_file);

    let config_str = fs::read_to_string(&config_path).map_err(|cause| {
        LogDataError::ConfigRead {
            path: config_path.clone(),
            cause,
        }
    })?;

    let config: Config = serde_json::from_str(&config_str).map_err(|cause| {
        LogDataError::ConfigParse {
            path: config_path,
            cause,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}
