use crate::models::extracted_message::{ExtractedMessage, FieldMap, MessageSections, SectionFields};
use log::debug;
use serde_json::Value;
use std::ops::Range;

const SEPARATOR: &str = ": ";
const MESSAGE_COLUMN: &str = "Message";
const MAIN_OPERATION_KEY: &str = "MainOperation";
const PARSED_RESULT_KEY: &str = "ParsedResult";

/// Top-level lines starting with this are progress noise, not results
const NOISE_PREFIX: &str = "Read";

const COMPACT_MARKER: &str = "CompactResults";
const REPAIR_MARKER: &str = "RepairResults";
const DELETE_MARKER: &str = "DeleteResults";
const TEST_MARKER: &str = "TestResults";
const BACKEND_STATISTICS_MARKER: &str = "BackendStatistics";

/// Line filter applied inside a section span
#[derive(Debug, Clone, Copy)]
struct SectionRule {
    skip_dot_prefixed: bool,
    skip_key_value_entries: bool,
}

const COMPACT_RULE: SectionRule = SectionRule {
    skip_dot_prefixed: true,
    skip_key_value_entries: false,
};

const NESTED_LIST_RULE: SectionRule = SectionRule {
    skip_dot_prefixed: false,
    skip_key_value_entries: true,
};

/// Line index of the first line containing each section marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SectionMarkers {
    compact: Option<usize>,
    repair: Option<usize>,
    delete: Option<usize>,
    test: Option<usize>,
    backend_statistics: Option<usize>,
}

impl SectionMarkers {
    fn locate(lines: &[&str]) -> Self {
        let find = |marker: &str| lines.iter().position(|line| line.contains(marker));
        Self {
            compact: find(COMPACT_MARKER),
            repair: find(REPAIR_MARKER),
            delete: find(DELETE_MARKER),
            test: find(TEST_MARKER),
            backend_statistics: find(BACKEND_STATISTICS_MARKER),
        }
    }
}

/// A span exists only when both ends were found in order
fn span(start: Option<usize>, end: Option<usize>) -> Option<Range<usize>> {
    match (start, end) {
        (Some(start), Some(end)) if end > start => Some(start..end),
        _ => None,
    }
}

/// Text from the fifth character on, if the line is that long
fn from_fifth_char(line: &str) -> Option<&str> {
    line.char_indices().nth(4).map(|(idx, _)| &line[idx..])
}

fn has_open_or_empty_ending(line: &str) -> bool {
    line.ends_with(['[', ']', ':']) || line.ends_with("null")
}

fn is_top_level_pair(line: &str) -> bool {
    !line.is_empty()
        && !line.starts_with([' ', '.', ']'])
        && !line.starts_with(NOISE_PREFIX)
        && !has_open_or_empty_ending(line)
        && line.contains(SEPARATOR)
}

fn is_section_pair(line: &str, rule: SectionRule) -> bool {
    let Some(rest) = from_fifth_char(line) else {
        return false;
    };

    !rest.starts_with(' ')
        && !line.starts_with(']')
        && !(rule.skip_dot_prefixed && line.starts_with('.'))
        && !(rule.skip_key_value_entries && (rest.starts_with("Key") || rest.starts_with("Value")))
        && !has_open_or_empty_ending(line)
        && line.contains(SEPARATOR)
}

/// Key is everything before the first separator, value everything after the last
fn split_pair(line: &str) -> Option<(String, Value)> {
    let (key, _) = line.split_once(SEPARATOR)?;
    let (_, value) = line.rsplit_once(SEPARATOR)?;
    Some((key.trim().to_string(), Value::String(value.trim().to_string())))
}

fn field_text(fields: &SectionFields, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(String::from)
}

fn collect_pairs<'a>(lines: impl Iterator<Item = &'a str>) -> SectionFields {
    lines.filter_map(split_pair).collect()
}

fn section_fields(lines: &[&str], range: Option<Range<usize>>, rule: SectionRule) -> SectionFields {
    match range {
        Some(range) => collect_pairs(
            lines[range]
                .iter()
                .copied()
                .filter(|line| is_section_pair(line, rule)),
        ),
        None => SectionFields::new(),
    }
}

/// Parse a result message into its top-level fields and the compact,
/// delete and test sections.
///
/// The message is the line-oriented text dump of an operation result. Any
/// section whose markers are missing comes back empty.
pub fn extract_message(raw: &str) -> MessageSections {
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let primary_fields = collect_pairs(lines.iter().copied().filter(|line| is_top_level_pair(line)));

    let markers = SectionMarkers::locate(&lines);
    if markers == SectionMarkers::default() {
        debug!("Message has no result sections, only top-level fields were extracted");
    }

    let compact_fields = section_fields(&lines, span(markers.compact, markers.delete), COMPACT_RULE);
    let delete_fields = section_fields(&lines, span(markers.delete, markers.repair), NESTED_LIST_RULE);
    let test_fields = section_fields(
        &lines,
        span(markers.test, markers.backend_statistics),
        NESTED_LIST_RULE,
    );

    MessageSections {
        main_operation: field_text(&primary_fields, MAIN_OPERATION_KEY),
        parsed_result: field_text(&primary_fields, PARSED_RESULT_KEY),
        primary_fields,
        compact_fields,
        delete_fields,
        test_fields,
    }
}

/// Attach the parsed sections of the row's `Message` column to the row.
///
/// Rows without a text message keep their columns and get empty sections.
pub fn enrich_row(row: FieldMap) -> ExtractedMessage {
    let sections = row
        .get(MESSAGE_COLUMN)
        .and_then(|value| value.as_str())
        .map(extract_message)
        .unwrap_or_default();

    ExtractedMessage::new(row, sections)
}
