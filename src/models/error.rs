use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogDataError {
    #[error("Failed to read config file '{path}': {cause}")]
    ConfigRead { path: PathBuf, cause: io::Error },

    #[error("Failed to parse config file '{path}': {cause}")]
    ConfigParse {
        path: PathBuf,
        cause: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Failed to open or create database file '{path}': {cause}")]
    DatabaseConnection { path: String, cause: r2d2::Error },

    #[error("Failed to get database connection from pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Database query failed for '{operation}': {cause}")]
    DatabaseQuery {
        operation: String,
        cause: rusqlite::Error,
    },

    #[error("Failed to insert into {table}: {cause}")]
    DatabaseInsert {
        table: String,
        cause: rusqlite::Error,
    },

    #[error("Table '{0}' is not available for dumping")]
    UnknownTable(String),

    #[error("Field '{field}' cannot be used to page table '{table}'")]
    UnknownPagingField { table: String, field: String },
}

impl LogDataError {
    /// True for errors caused by the caller naming something outside the allow-list
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            LogDataError::UnknownTable(_) | LogDataError::UnknownPagingField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LogDataError>;
