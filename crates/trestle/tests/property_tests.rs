//! Property-based tests for detection and normalization.
//!
//! These verify the invariants that hold for all inputs:
//! 1. **No panics**: the pipeline never crashes on arbitrary text
//! 2. **Determinism**: the same blob always parses the same way
//! 3. **Uniformity**: every record carries exactly the discovered columns
//! 4. **Idempotence**: a result's own delimited re-serialization parses back
//!    to an equal result

use proptest::prelude::*;

use trestle::{Delimiter, NormalizeConfig, parse_text, to_delimited_with};

/// Cell content that cannot collide with delimiters, quotes, or trimming.
/// Non-empty, so no generated line can read as blank.
fn cell_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,12}"
}

/// A small delimited table: column count, rows of cells, and a delimiter.
fn delimited_table() -> impl Strategy<Value = (usize, Vec<Vec<String>>, Delimiter)> {
    (2usize..6, 1usize..20).prop_flat_map(|(cols, rows)| {
        (
            Just(cols),
            prop::collection::vec(prop::collection::vec(cell_value(), cols), rows),
            prop_oneof![
                Just(Delimiter::Comma),
                Just(Delimiter::Tab),
                Just(Delimiter::Pipe),
                Just(Delimiter::Semicolon),
            ],
        )
    })
}

fn render(cols: usize, rows: &[Vec<String>], delimiter: Delimiter) -> String {
    let sep = delimiter.char().to_string();
    let header: Vec<String> = (0..cols).map(|i| format!("col{i}")).collect();
    let mut lines = vec![header.join(&sep)];
    lines.extend(rows.iter().map(|r| r.join(&sep)));
    lines.join("\n")
}

proptest! {
    #[test]
    fn prop_never_panics(text in any::<String>()) {
        let _ = parse_text(&text, &NormalizeConfig::default());
    }

    #[test]
    fn prop_deterministic(text in any::<String>()) {
        let config = NormalizeConfig::default();
        let first = parse_text(&text, &config);
        let second = parse_text(&text, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_records_are_uniform((cols, rows, delimiter) in delimited_table()) {
        let text = render(cols, &rows, delimiter);
        let result = parse_text(&text, &NormalizeConfig::default()).unwrap();

        for record in &result.records {
            prop_assert_eq!(
                record.keys().collect::<Vec<_>>(),
                result.columns.iter().collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn prop_roundtrip_idempotent((cols, rows, delimiter) in delimited_table()) {
        let text = render(cols, &rows, delimiter);
        let config = NormalizeConfig::default();
        let first = parse_text(&text, &config).unwrap();

        let serialized = to_delimited_with(&first, delimiter).unwrap();
        let second = parse_text(&serialized, &config).unwrap();

        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_truncation_keeps_prefix((cols, rows, delimiter) in delimited_table()) {
        let text = render(cols, &rows, delimiter);
        let cap = 5;
        let capped = parse_text(&text, &NormalizeConfig { max_rows: cap }).unwrap();
        let full = parse_text(&text, &NormalizeConfig::default()).unwrap();

        prop_assert_eq!(capped.row_count(), full.row_count().min(cap));
        prop_assert_eq!(
            &capped.records[..],
            &full.records[..capped.row_count()]
        );
    }
}
