use crate::models::extracted_message::{ExtractedMessage, FieldMap};
use crate::models::log_row::LogRow;
use serde::{Deserialize, Serialize};

/// Which query the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Entries newer than a given id from the tail buffer
    Poll,
    /// One page of the error log, optionally with parsed result messages
    Dump { pretty: bool },
}

impl QueryMode {
    /// `poll` selects polling, `pretty` an enriched dump, anything else a raw dump
    pub fn from_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("poll") {
            QueryMode::Poll
        } else if key.eq_ignore_ascii_case("pretty") {
            QueryMode::Dump { pretty: true }
        } else {
            QueryMode::Dump { pretty: false }
        }
    }
}

/// Raw query parameters, exactly as the caller sent them
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QueryParams {
    /// Minimum severity for polling
    pub level: Option<String>,

    /// Last seen entry id for polling
    pub id: Option<String>,

    pub pagesize: Option<String>,

    /// Keyset cursor for dumps
    pub offset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Entries(Vec<LogRow>),
    Rows(Vec<FieldMap>),
    Extracted(Vec<ExtractedMessage>),
}

impl QueryResponse {
    pub fn len(&self) -> usize {
        match self {
            QueryResponse::Entries(rows) => rows.len(),
            QueryResponse::Rows(rows) => rows.len(),
            QueryResponse::Extracted(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
