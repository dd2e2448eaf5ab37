use crate::models::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// One entry held by the tail buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub id: i64,
    pub timestamp: i64,
    pub level: LogLevel,
    pub message: String,
    pub source: Option<String>,
}
