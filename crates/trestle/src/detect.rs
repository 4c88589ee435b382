//! Format detection: JSON probe plus header-line delimiter sniffing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;

/// Delimiters to try, in priority order. Ties keep the earlier candidate.
pub const DELIMITERS: &[Delimiter] = &[
    Delimiter::Comma,
    Delimiter::Tab,
    Delimiter::Pipe,
    Delimiter::Semicolon,
];

/// A candidate column separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Delimiter {
    Comma,
    Tab,
    Pipe,
    Semicolon,
}

impl Delimiter {
    /// The separator character itself.
    pub fn char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Semicolon => ';',
        }
    }

    /// Stable display label for this format.
    pub fn label(self) -> &'static str {
        match self {
            Delimiter::Comma => "CSV",
            Delimiter::Tab => "TSV",
            Delimiter::Pipe => "Pipe-separated",
            Delimiter::Semicolon => "Semicolon-separated",
        }
    }
}

/// The structured format a raw blob was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    Json,
    Delimited(Delimiter),
}

impl FormatKind {
    /// Stable display label (`JSON`, `CSV`, `TSV`, ...).
    pub fn label(self) -> &'static str {
        match self {
            FormatKind::Json => "JSON",
            FormatKind::Delimited(d) => d.label(),
        }
    }
}

/// Decide which structured format `text` is.
///
/// JSON wins first: any text that parses as a single JSON value (scalar roots
/// included) is `Json`. Otherwise the first non-blank line is sniffed for the
/// delimiter with the strictly highest occurrence count, and the header it
/// splits into must contain at least two non-empty field names.
pub fn detect(text: &str) -> Result<FormatKind, ParseError> {
    let trimmed = text.trim();

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Ok(FormatKind::Json);
    }

    let lines: Vec<&str> = non_blank_lines(text).collect();
    if lines.len() < 2 {
        return Err(ParseError::Unrecognized(
            "input is a single line and not valid JSON".to_string(),
        ));
    }

    let header_line = lines[0];
    let delimiter = sniff_delimiter(header_line).ok_or_else(|| {
        ParseError::Unrecognized("no delimiter found in the first line".to_string())
    })?;

    let headers = split_fields(header_line, delimiter);
    let non_empty = headers.iter().filter(|h| !h.is_empty()).count();
    if non_empty < 2 {
        return Err(ParseError::Unrecognized(format!(
            "fewer than 2 header fields after splitting on '{}'",
            delimiter.char().escape_default()
        )));
    }

    log::debug!(
        "detected {} ({} header fields)",
        delimiter.label(),
        non_empty
    );
    Ok(FormatKind::Delimited(delimiter))
}

/// Pick the delimiter with the strictly highest count in the header line.
///
/// Header-line-only sniffing is deliberately cheap: malformed data is handed
/// to the repair step rather than to a statistical sniffer.
fn sniff_delimiter(header_line: &str) -> Option<Delimiter> {
    let mut best: Option<(Delimiter, usize)> = None;
    for &candidate in DELIMITERS {
        let count = header_line.matches(candidate.char()).count();
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ if count == 0 => {}
            _ => best = Some((candidate, count)),
        }
    }
    best.map(|(d, _)| d)
}

/// Lines of `text` that contain something other than whitespace.
pub(crate) fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|l| !l.trim().is_empty())
}

/// Split a line on `delimiter` and clean each field.
pub(crate) fn split_fields(line: &str, delimiter: Delimiter) -> Vec<String> {
    line.split(delimiter.char()).map(clean_field).collect()
}

/// Trim a field and strip one layer of matching surrounding quotes.
pub(crate) fn clean_field(field: &str) -> String {
    let trimmed = field.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_json_array() {
        assert_eq!(detect(r#"[{"a": 1}, {"b": 2}]"#).unwrap(), FormatKind::Json);
    }

    #[test]
    fn test_detect_json_scalar_root() {
        // Any JSON value counts, even a bare scalar.
        assert_eq!(detect("42").unwrap(), FormatKind::Json);
        assert_eq!(detect("  \"hello\"  ").unwrap(), FormatKind::Json);
    }

    #[test]
    fn test_detect_csv() {
        let text = "name,age\nJohn,30\nJane,25";
        assert_eq!(
            detect(text).unwrap(),
            FormatKind::Delimited(Delimiter::Comma)
        );
    }

    #[test]
    fn test_detect_tsv() {
        let text = "a\tb\tc\n1\t2\t3";
        assert_eq!(detect(text).unwrap(), FormatKind::Delimited(Delimiter::Tab));
    }

    #[test]
    fn test_detect_pipe_and_semicolon() {
        assert_eq!(
            detect("a|b\n1|2").unwrap(),
            FormatKind::Delimited(Delimiter::Pipe)
        );
        assert_eq!(
            detect("a;b\n1;2").unwrap(),
            FormatKind::Delimited(Delimiter::Semicolon)
        );
    }

    #[test]
    fn test_tie_keeps_earlier_candidate() {
        // One comma and one pipe in the header: comma has priority.
        let text = "a,b|c\n1,2|3";
        assert_eq!(
            detect(text).unwrap(),
            FormatKind::Delimited(Delimiter::Comma)
        );
    }

    #[test]
    fn test_sniff_counts_header_line_only() {
        // Commas dominate later lines but the header is tab-separated.
        let text = "a\tb\n1,2,3,4\t5";
        assert_eq!(detect(text).unwrap(), FormatKind::Delimited(Delimiter::Tab));
    }

    #[test]
    fn test_single_line_unrecognized() {
        assert!(matches!(
            detect("not valid anything"),
            Err(ParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_no_delimiter_unrecognized() {
        assert!(matches!(
            detect("line one\nline two"),
            Err(ParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_too_few_headers_unrecognized() {
        // The only comma splits into one non-empty header.
        assert!(matches!(
            detect("name,\nJohn,"),
            Err(ParseError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let text = "\n\n  \nname,age\nJohn,30\n\n";
        assert_eq!(
            detect(text).unwrap(),
            FormatKind::Delimited(Delimiter::Comma)
        );
    }

    #[test]
    fn test_clean_field_strips_one_quote_layer() {
        assert_eq!(clean_field("  \"name\"  "), "name");
        assert_eq!(clean_field("'age'"), "age");
        assert_eq!(clean_field("\"'both'\""), "'both'");
        assert_eq!(clean_field("plain"), "plain");
        assert_eq!(clean_field("\""), "\"");
    }
}
