//! Delimited export: a pure, order-preserving projection of a `ParseResult`.

use crate::detect::{Delimiter, FormatKind};
use crate::error::Result;
use crate::table::ParseResult;

/// Serialize a result back to delimited text using its own delimiter.
///
/// JSON results export as CSV. Every field is quoted and embedded quote
/// characters are doubled.
pub fn to_delimited(result: &ParseResult) -> Result<String> {
    let delimiter = match result.kind {
        FormatKind::Delimited(d) => d,
        FormatKind::Json => Delimiter::Comma,
    };
    to_delimited_with(result, delimiter)
}

/// Serialize a result with an explicit delimiter.
pub fn to_delimited_with(result: &ParseResult, delimiter: Delimiter) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.char() as u8)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(&result.columns)?;
    for record in &result.records {
        writer.write_record(record.values())?;
    }
    writer.flush()?;

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
