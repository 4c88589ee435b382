//! Normalized tabular data: uniform records over a discovered column set.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::detect::FormatKind;

/// One normalized row: a complete mapping over the discovered column set.
///
/// Absent cells are empty strings, never missing keys, so every record
/// exposes every column in the same order.
pub type Record = IndexMap<String, String>;

/// The result of detecting and normalizing a raw blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Normalized rows, in input order.
    pub records: Vec<Record>,
    /// Column names in first-seen order, de-duplicated.
    pub columns: Vec<String>,
    /// The format the blob was recognized as.
    pub kind: FormatKind,
}

impl ParseResult {
    /// Assemble a result, filling each record out to the full column set.
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Record>, kind: FormatKind) -> Self {
        let records = rows
            .into_iter()
            .map(|mut partial| {
                let mut record = Record::with_capacity(columns.len());
                for column in &columns {
                    let value = partial.shift_remove(column).unwrap_or_default();
                    record.insert(column.clone(), value);
                }
                record
            })
            .collect();

        Self {
            records,
            columns,
            kind,
        }
    }

    /// Number of normalized rows. After truncation this equals the cap.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Number of discovered columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// A single cell, by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        self.records
            .get(row)
            .and_then(|r| r.get(column).map(|s| s.as_str()))
    }

    /// Display label of the detected format.
    pub fn format_label(&self) -> &'static str {
        self.kind.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Delimiter;

    #[test]
    fn test_records_are_filled_out_to_all_columns() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let mut row = Record::new();
        row.insert("b".to_string(), "2".to_string());

        let result = ParseResult::new(columns, vec![row], FormatKind::Json);

        let record = &result.records[0];
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record["a"], "");
        assert_eq!(record["b"], "2");
    }

    #[test]
    fn test_accessors() {
        let columns = vec!["name".to_string()];
        let mut row = Record::new();
        row.insert("name".to_string(), "John".to_string());

        let result = ParseResult::new(
            columns,
            vec![row],
            FormatKind::Delimited(Delimiter::Comma),
        );

        assert_eq!(result.row_count(), 1);
        assert_eq!(result.column_count(), 1);
        assert_eq!(result.get(0, "name"), Some("John"));
        assert_eq!(result.get(0, "missing"), None);
        assert_eq!(result.format_label(), "CSV");
    }
}
