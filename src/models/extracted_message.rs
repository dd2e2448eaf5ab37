use serde::Serialize;

/// One stored row, keyed by column name in column order
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// `key: value` pairs pulled out of one part of a result message, in the
/// order they appear. Values are always JSON strings.
pub type SectionFields = serde_json::Map<String, serde_json::Value>;

/// Structured view of a result message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSections {
    pub primary_fields: SectionFields,
    pub compact_fields: SectionFields,
    pub delete_fields: SectionFields,
    pub test_fields: SectionFields,
    pub main_operation: Option<String>,
    pub parsed_result: Option<String>,
}

/// A stored row enriched with the sections parsed from its `Message` column.
///
/// Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedMessage {
    #[serde(flatten)]
    pub row: FieldMap,

    #[serde(rename = "MainOperation", skip_serializing_if = "Option::is_none")]
    pub main_operation: Option<String>,

    #[serde(rename = "ParsedResult", skip_serializing_if = "Option::is_none")]
    pub parsed_result: Option<String>,

    #[serde(rename = "BackupResults")]
    pub primary_fields: SectionFields,

    #[serde(rename = "CompactResults")]
    pub compact_fields: SectionFields,

    #[serde(rename = "DeleteResults")]
    pub delete_fields: SectionFields,

    #[serde(rename = "TestResults")]
    pub test_fields: SectionFields,
}

impl ExtractedMessage {
    pub fn new(row: FieldMap, sections: MessageSections) -> Self {
        Self {
            row,
            main_operation: sections.main_operation,
            parsed_result: sections.parsed_result,
            primary_fields: sections.primary_fields,
            compact_fields: sections.compact_fields,
            delete_fields: sections.delete_fields,
            test_fields: sections.test_fields,
        }
    }
}
