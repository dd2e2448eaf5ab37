use crate::models::log_level::LogLevel;

/// Page size used by table dumps when the caller's value does not parse
pub const DUMP_DEFAULT_PAGE_SIZE: i64 = 100;
pub const DUMP_MIN_PAGE_SIZE: i64 = 10;
pub const DUMP_MAX_PAGE_SIZE: i64 = 500;

/// Page size used by polling when the caller's value does not parse as an i32
pub const POLL_DEFAULT_PAGE_SIZE: i32 = 100;
pub const POLL_MIN_PAGE_SIZE: i32 = 1;
pub const POLL_MAX_PAGE_SIZE: i32 = 500;

fn parse_i64(input: Option<&str>) -> Option<i64> {
    input.and_then(|s| s.trim().parse::<i64>().ok())
}

fn page_size(input: Option<&str>, default: i64, min: i64, max: i64) -> usize {
    parse_i64(input).unwrap_or(default).clamp(min, max) as usize
}

fn poll_page_size(input: Option<&str>) -> usize {
    input
        .and_then(|s| s.trim().parse::<i32>().ok())
        .unwrap_or(POLL_DEFAULT_PAGE_SIZE)
        .clamp(POLL_MIN_PAGE_SIZE, POLL_MAX_PAGE_SIZE) as usize
}

/// Keyset page for a table dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Only rows whose paging field is strictly below this value are returned
    pub offset: Option<i64>,
    pub page_size: usize,
}

impl PageRequest {
    /// Build a page from raw query values. Bad values fall back to defaults.
    pub fn parse(offset: Option<&str>, page_size_str: Option<&str>) -> Self {
        Self {
            offset: parse_i64(offset),
            page_size: page_size(
                page_size_str,
                DUMP_DEFAULT_PAGE_SIZE,
                DUMP_MIN_PAGE_SIZE,
                DUMP_MAX_PAGE_SIZE,
            ),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::parse(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollRequest {
    /// 0 means "from the beginning"
    pub last_seen_id: i64,
    pub min_level: LogLevel,
    pub page_size: usize,
}

impl PollRequest {
    pub fn parse(id: Option<&str>, level: Option<&str>, page_size_str: Option<&str>) -> Self {
        Self {
            last_seen_id: parse_i64(id).unwrap_or(0),
            min_level: level.map(LogLevel::parse_lenient).unwrap_or_default(),
            page_size: poll_page_size(page_size_str),
        }
    }
}

impl Default for PollRequest {
    fn default() -> Self {
        Self::parse(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_page_size_defaults_on_parse_failure() {
        assert_eq!(PageRequest::parse(None, None).page_size, 100);
        assert_eq!(PageRequest::parse(None, Some("lots")).page_size, 100);
        assert_eq!(PageRequest::parse(None, Some("")).page_size, 100);
    }

    #[test]
    fn test_dump_page_size_is_clamped() {
        assert_eq!(PageRequest::parse(None, Some("5")).page_size, 10);
        assert_eq!(PageRequest::parse(None, Some("-3")).page_size, 10);
        assert_eq!(PageRequest::parse(None, Some("250")).page_size, 250);
        assert_eq!(PageRequest::parse(None, Some("100000")).page_size, 500);
        assert_eq!(PageRequest::parse(None, Some(" 42 ")).page_size, 42);
    }

    #[test]
    fn test_dump_offset_is_optional() {
        assert_eq!(PageRequest::parse(None, None).offset, None);
        assert_eq!(PageRequest::parse(Some("  "), None).offset, None);
        assert_eq!(PageRequest::parse(Some("abc"), None).offset, None);
        assert_eq!(
            PageRequest::parse(Some("1700000000"), None).offset,
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_poll_defaults() {
        let request = PollRequest::default();
        assert_eq!(request.last_seen_id, 0);
        assert_eq!(request.min_level, LogLevel::Profiling);
        assert_eq!(request.page_size, 100);
    }

    #[test]
    fn test_poll_page_size_has_tighter_floor() {
        assert_eq!(PollRequest::parse(None, None, Some("1")).page_size, 1);
        assert_eq!(PollRequest::parse(None, None, Some("0")).page_size, 1);
        assert_eq!(PollRequest::parse(None, None, Some("501")).page_size, 500);
        assert_eq!(PollRequest::parse(None, None, Some("x")).page_size, 100);
    }

    #[test]
    fn test_poll_page_size_beyond_i32_falls_back_to_default() {
        assert_eq!(PollRequest::parse(None, None, Some("2147483647")).page_size, 500);
        assert_eq!(PollRequest::parse(None, None, Some("3000000000")).page_size, 100);
        assert_eq!(PollRequest::parse(None, None, Some("-3000000000")).page_size, 100);
        // Dumps still accept the wider range
        assert_eq!(PageRequest::parse(None, Some("3000000000")).page_size, 500);
    }

    #[test]
    fn test_poll_parses_id_and_level() {
        let request = PollRequest::parse(Some("42"), Some("warning"), Some("20"));
        assert_eq!(request.last_seen_id, 42);
        assert_eq!(request.min_level, LogLevel::Warning);
        assert_eq!(request.page_size, 20);

        let request = PollRequest::parse(Some("forty-two"), Some("nope"), None);
        assert_eq!(request.last_seen_id, 0);
        assert_eq!(request.min_level, LogLevel::Profiling);
    }
}
