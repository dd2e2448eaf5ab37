use crate::models::log_level::LogLevel;
use crate::models::log_row::LogRow;
use crate::models::page::PollRequest;
use log::debug;
use std::sync::Arc;

/// Source of recent log entries that can be read incrementally.
///
/// Implementations return entries with an id strictly greater than `after`
/// and a level of at least `min_level`, in ascending id order, at most
/// `page_size` of them.
pub trait TailSource: Send + Sync {
    fn after_id(&self, after: i64, min_level: LogLevel, page_size: usize) -> Vec<LogRow>;
}

/// Forwards poll requests to the tail source. Defaulting and clamping of
/// the request happen in [`PollRequest::parse`].
#[derive(Clone)]
pub struct TailPoller {
    source: Arc<dyn TailSource>,
}

impl TailPoller {
    pub fn new(source: Arc<dyn TailSource>) -> Self {
        Self { source }
    }

    pub fn poll(&self, request: &PollRequest) -> Vec<LogRow> {
        debug!(
            "Polling log entries after {} at level {} (page size {})",
            request.last_seen_id, request.min_level, request.page_size
        );
        self.source
            .after_id(request.last_seen_id, request.min_level, request.page_size)
    }
}
