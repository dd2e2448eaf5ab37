use crate::service::log_query::LogQuery;
use chrono::{DateTime, Utc};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Log query entry point with its storage and tail source already wired in
    query: LogQuery,

    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(query: LogQuery) -> Self {
        Self {
            query,
            started_at: Utc::now(),
        }
    }

    pub fn query(&self) -> &LogQuery {
        &self.query
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
