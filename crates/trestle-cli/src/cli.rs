//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Trestle: paste-to-table format inference with AI repair
#[derive(Parser)]
#[command(name = "trestle")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report which structured format an input is
    Detect {
        /// Path to the input (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Parse an input into a normalized table
    Parse {
        /// Path to the input (stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        output: OutputFormat,

        /// Maximum rows to keep
        #[arg(long)]
        max_rows: Option<usize>,

        /// On parse failure, attempt one AI repair round-trip
        /// (requires GEMINI_API_KEY)
        #[arg(long)]
        repair: bool,

        /// Repair model override
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// Pretty-printed JSON (columns and records)
    Json,
    /// Fully quoted CSV
    Csv,
}
