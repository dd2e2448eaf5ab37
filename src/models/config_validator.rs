use crate::models::config::Config;
use crate::models::error::{LogDataError, Result};
use std::fs;
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validates the entire configuration.
///
/// Runs before the logger is installed, so problems are returned rather than logged.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_numeric_values(config)?;
    validate_log_level(&config.log_level)?;
    if !config.uses_memory_database() {
        validate_database_path(&config.database_file)?;
    }
    Ok(())
}

fn validate_numeric_values(config: &Config) -> Result<()> {
    if config.tail_buffer_size == 0 {
        return Err(LogDataError::ConfigInvalid(
            "tail_buffer_size must be greater than 0".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(LogDataError::ConfigInvalid(
            "port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn validate_log_level(level: &str) -> Result<()> {
    if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(LogDataError::ConfigInvalid(format!(
            "log_level '{}' is not one of: {}",
            level,
            LOG_LEVELS.join(", ")
        )));
    }
    Ok(())
}

/// Validate database file path
fn validate_database_path(db_file: &str) -> Result<()> {
    let path = Path::new(db_file);

    if path.exists() {
        if !path.is_file() {
            return Err(LogDataError::ConfigInvalid(format!(
                "Database path exists but is not a file: {}",
                db_file
            )));
        }

        if let Err(e) = fs::OpenOptions::new().read(true).write(true).open(path) {
            return Err(LogDataError::ConfigInvalid(format!(
                "Database file is not readable/writable: {}\nError: {}",
                db_file, e
            )));
        }
    } else {
        // Handle edge case: if parent is empty (current directory), it always exists
        let parent_exists = match path.parent() {
            Some(parent) => parent.as_os_str().is_empty() || parent.exists(),
            None => false,
        };

        if !parent_exists {
            #[cfg(windows)]
            let suggestion = format!("mkdir \"{}\"", path.parent().unwrap_or(path).display());
            #[cfg(not(windows))]
            let suggestion = format!("mkdir -p \"{}\"", path.parent().unwrap_or(path).display());

            return Err(LogDataError::ConfigInvalid(format!(
                "Database parent directory does not exist: {}\nSuggestion: Create the directory with: {}",
                db_file, suggestion
            )));
        }
    }

    Ok(())
}
