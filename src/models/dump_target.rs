use crate::models::error::{LogDataError, Result};
use std::str::FromStr;

/// Tables that may be dumped page by page.
///
/// Table and field names end up inside SQL text, so only names listed here
/// are ever accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTable {
    ErrorLog,
}

impl LogTable {
    pub fn name(&self) -> &'static str {
        match self {
            LogTable::ErrorLog => "ErrorLog",
        }
    }

    pub fn paging_fields(&self) -> &'static [&'static str] {
        match self {
            LogTable::ErrorLog => &["Timestamp", "ID"],
        }
    }
}

impl FromStr for LogTable {
    type Err = LogDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ErrorLog" => Ok(LogTable::ErrorLog),
            _ => Err(LogDataError::UnknownTable(s.to_string())),
        }
    }
}

/// A validated table plus optional paging field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpTarget {
    table: LogTable,
    paging_field: Option<&'static str>,
}

impl DumpTarget {
    pub fn new(table: &str, paging_field: Option<&str>) -> Result<Self> {
        let table = table.parse::<LogTable>()?;
        let paging_field = match paging_field.filter(|f| !f.is_empty()) {
            Some(field) => Some(
                table
                    .paging_fields()
                    .iter()
                    .copied()
                    .find(|known| *known == field)
                    .ok_or_else(|| LogDataError::UnknownPagingField {
                        table: table.name().to_string(),
                        field: field.to_string(),
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            table,
            paging_field,
        })
    }

    pub fn table(&self) -> LogTable {
        self.table
    }

    pub fn paging_field(&self) -> Option<&'static str> {
        self.paging_field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_known_table_and_field() {
        let target = DumpTarget::new("ErrorLog", Some("Timestamp")).unwrap();
        assert_eq!(target.table(), LogTable::ErrorLog);
        assert_eq!(target.paging_field(), Some("Timestamp"));
    }

    #[test]
    fn test_empty_paging_field_means_unpaged() {
        let target = DumpTarget::new("ErrorLog", Some("")).unwrap();
        assert_eq!(target.paging_field(), None);
        let target = DumpTarget::new("ErrorLog", None).unwrap();
        assert_eq!(target.paging_field(), None);
    }

    #[test]
    fn test_rejects_unknown_table() {
        let result = DumpTarget::new("ErrorLog\"; DROP TABLE ErrorLog; --", None);
        assert!(matches!(result, Err(LogDataError::UnknownTable(_))));
    }

    #[test]
    fn test_rejects_unknown_paging_field() {
        let result = DumpTarget::new("ErrorLog", Some("Message"));
        match result {
            Err(e @ LogDataError::UnknownPagingField { .. }) => {
                assert!(e.is_rejected_input());
                assert!(e.to_string().contains("Message"));
            }
            _ => panic!("Expected UnknownPagingField error"),
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(DumpTarget::new("errorlog", None).is_err());
        assert!(DumpTarget::new("ErrorLog", Some("timestamp")).is_err());
    }
}
