//! Parse command - detect, normalize, and optionally repair an input.

use std::path::PathBuf;

use colored::Colorize;
use trestle::{
    GeminiRepairer, NormalizeConfig, ParseResult, ParseSession, RepairConfig, SessionState,
};

use crate::cli::OutputFormat;

pub fn run(
    file: Option<PathBuf>,
    output: OutputFormat,
    max_rows: Option<usize>,
    repair: bool,
    model: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_input(file.as_ref())?;

    let mut config = NormalizeConfig::default();
    if let Some(n) = max_rows {
        config.max_rows = n;
    }

    let mut session = ParseSession::new().with_config(config);
    if repair {
        let mut repair_config = RepairConfig::default();
        if let Some(m) = model {
            repair_config.model = m;
        }
        let deadline = repair_config.deadline;
        let key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| "GEMINI_API_KEY environment variable not set")?;
        session = session
            .with_repairer(GeminiRepairer::with_config(key, repair_config)?)
            .with_deadline(deadline);
    }

    let mut state = session.edit(&text);

    if repair && state.can_repair() {
        let message = state.error_message().unwrap_or_default();
        eprintln!(
            "{} {} - asking the repair service",
            "Parse failed:".yellow().bold(),
            message
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        state = runtime.block_on(session.repair());
    }

    match state {
        SessionState::Parsed(result) => {
            if verbose {
                println!(
                    "{} {} rows x {} columns ({})",
                    "Parsed".green().bold(),
                    result.row_count(),
                    result.column_count(),
                    result.format_label()
                );
                println!();
            }
            print_result(&result, output)
        }
        SessionState::Idle => Err("input is empty".into()),
        state => Err(state
            .error_message()
            .unwrap_or_else(|| "parse failed".to_string())
            .into()),
    }
}

fn print_result(
    result: &ParseResult,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Table => {
            print!("{}", render_table(result));
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
            Ok(())
        }
        OutputFormat::Csv => {
            print!("{}", trestle::to_delimited(result)?);
            Ok(())
        }
    }
}

/// Render an aligned text table: header, rule, rows.
fn render_table(result: &ParseResult) -> String {
    let mut widths: Vec<usize> = result.columns.iter().map(|c| c.chars().count()).collect();
    for record in &result.records {
        for (i, value) in record.values().enumerate() {
            let len = value.chars().count();
            if len > widths[i] {
                widths[i] = len;
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = result
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for record in &result.records {
        let row: Vec<String> = record
            .values()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect();
        out.push_str(row.join("  ").trim_end());
        out.push('\n');
    }

    out
}
