use crate::models::log_level::LogLevel;
use crate::models::log_row::LogRow;
use crate::service::tail::TailSource;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default number of entries kept for tailing
pub const DEFAULT_TAIL_BUFFER_SIZE: usize = 2000;

struct Buffer {
    next_id: i64,
    entries: VecDeque<LogRow>,
}

/// Bounded in-memory buffer of recent log entries.
///
/// Ids start at 1 and only ever grow, so a caller can keep polling with the
/// last id it saw. Once full, the oldest entry is dropped.
pub struct LogHandler {
    capacity: usize,
    buffer: Mutex<Buffer>,
}

impl LogHandler {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buffer: Mutex::new(Buffer {
                next_id: 1,
                entries: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Store an entry and return the id it was given
    pub fn append(&self, level: LogLevel, message: &str, source: Option<&str>) -> i64 {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let id = buffer.next_id;
        buffer.next_id += 1;

        if buffer.entries.len() >= self.capacity {
            buffer.entries.pop_front();
        }
        buffer.entries.push_back(LogRow {
            id,
            timestamp: chrono::Utc::now().timestamp(),
            level,
            message: message.to_string(),
            source: source.map(|s| s.to_string()),
        });
        id
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TailSource for LogHandler {
    fn after_id(&self, after: i64, min_level: LogLevel, page_size: usize) -> Vec<LogRow> {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());

        // Entries are in id order, so skip straight past everything already seen
        let start = buffer.entries.partition_point(|row| row.id <= after);
        buffer
            .entries
            .range(start..)
            .filter(|row| row.level >= min_level)
            .take(page_size)
            .cloned()
            .collect()
    }
}
