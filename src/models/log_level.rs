use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a log entry, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum LogLevel {
    /// Lowest level. Used as the minimum it disables filtering.
    #[default]
    Profiling,
    Verbose,
    Information,
    Warning,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Profiling,
        LogLevel::Verbose,
        LogLevel::Information,
        LogLevel::Warning,
        LogLevel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Profiling => "Profiling",
            LogLevel::Verbose => "Verbose",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
        }
    }

    /// Lenient parse used for query parameters.
    ///
    /// Accepts a level name in any case or its ordinal. Anything else maps to
    /// the default level, which lets every entry through.
    pub fn parse_lenient(input: &str) -> LogLevel {
        let input = input.trim();
        if let Some(level) = LogLevel::ALL
            .iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(input))
        {
            return *level;
        }

        input
            .parse::<usize>()
            .ok()
            .and_then(|ordinal| LogLevel::ALL.get(ordinal).copied())
            .unwrap_or_default()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => LogLevel::Profiling,
            log::Level::Debug => LogLevel::Verbose,
            log::Level::Info => LogLevel::Information,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Error => LogLevel::Error,
        }
    }
}
