//! Structural normalization of detected formats into uniform records.

use indexmap::IndexSet;
use serde_json::Value;

use crate::detect::{self, Delimiter, FormatKind};
use crate::error::ParseError;
use crate::table::{ParseResult, Record};

/// Column name used for JSON array elements that are not objects.
const SCALAR_COLUMN: &str = "value";

/// Normalizer configuration.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Maximum rows to keep. Truncation is silent; the caller sees it only
    /// through the reported row count.
    pub max_rows: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { max_rows: 1000 }
    }
}

/// Detect the format of `text` and normalize it in one step.
pub fn parse_text(text: &str, config: &NormalizeConfig) -> Result<ParseResult, ParseError> {
    let kind = detect::detect(text)?;
    normalize(text, kind, config)
}

/// Convert detected raw structure into ordered, uniform records.
pub fn normalize(
    text: &str,
    kind: FormatKind,
    config: &NormalizeConfig,
) -> Result<ParseResult, ParseError> {
    match kind {
        FormatKind::Json => normalize_json(text, config),
        FormatKind::Delimited(delimiter) => normalize_delimited(text, delimiter, config),
    }
}

fn normalize_json(text: &str, config: &NormalizeConfig) -> Result<ParseResult, ParseError> {
    let root: Value = serde_json::from_str(text.trim())
        .map_err(|e| ParseError::Unrecognized(format!("not valid JSON: {e}")))?;

    // A non-array root is a single-element sequence.
    let mut elements = match root {
        Value::Array(items) => items,
        other => vec![other],
    };
    truncate_rows(&mut elements, config.max_rows);

    let mut columns: IndexSet<String> = IndexSet::new();
    let mut rows: Vec<Record> = Vec::with_capacity(elements.len());

    for element in elements {
        let mut partial = Record::new();
        match element {
            Value::Object(map) => {
                for (key, value) in map {
                    columns.insert(key.clone());
                    partial.insert(key, value_to_cell(&value));
                }
            }
            // A non-object element becomes a single scalar-valued column.
            scalar => {
                columns.insert(SCALAR_COLUMN.to_string());
                partial.insert(SCALAR_COLUMN.to_string(), value_to_cell(&scalar));
            }
        }
        rows.push(partial);
    }

    if rows.is_empty() {
        return Err(ParseError::NoRowsProduced(
            "JSON value contains no elements".to_string(),
        ));
    }
    if columns.is_empty() {
        return Err(ParseError::NoRowsProduced(
            "JSON elements carry no keys".to_string(),
        ));
    }

    Ok(ParseResult::new(
        columns.into_iter().collect(),
        rows,
        FormatKind::Json,
    ))
}

fn normalize_delimited(
    text: &str,
    delimiter: Delimiter,
    config: &NormalizeConfig,
) -> Result<ParseResult, ParseError> {
    let lines: Vec<&str> = detect::non_blank_lines(text).collect();
    let Some((&header_line, data_lines)) = lines.split_first() else {
        return Err(ParseError::NoRowsProduced("input is empty".to_string()));
    };

    // Cleaned the same way as data fields; empty names are dropped.
    let headers: Vec<String> = detect::split_fields(header_line, delimiter)
        .into_iter()
        .filter(|h| !h.is_empty())
        .collect();
    let columns: IndexSet<String> = headers.iter().cloned().collect();

    let mut rows: Vec<Record> = Vec::new();
    for &line in data_lines.iter().take(config.max_rows) {
        let fields = detect::split_fields(line, delimiter);
        let mut partial = Record::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            // Short rows pad with empty strings; extra fields are dropped.
            let value = fields.get(i).cloned().unwrap_or_default();
            partial.insert(header.clone(), value);
        }
        rows.push(partial);
    }

    if data_lines.len() > config.max_rows {
        log::debug!(
            "truncated {} rows to {}",
            data_lines.len(),
            config.max_rows
        );
    }

    if rows.is_empty() {
        return Err(ParseError::NoRowsProduced(
            "no data rows after the header".to_string(),
        ));
    }

    Ok(ParseResult::new(
        columns.into_iter().collect(),
        rows,
        FormatKind::Delimited(delimiter),
    ))
}

fn truncate_rows(elements: &mut Vec<Value>, max_rows: usize) {
    if elements.len() > max_rows {
        log::debug!("truncated {} rows to {}", elements.len(), max_rows);
        elements.truncate(max_rows);
    }
}

/// Render a JSON value as a cell string.
///
/// Null is an absent cell; nested structures keep their compact JSON form.
fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => serde_json::to_string(nested).unwrap_or_default(),
    }
}
