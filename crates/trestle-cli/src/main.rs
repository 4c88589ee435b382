//! Trestle CLI - turn a pasted blob or file into a table.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect { file } => commands::detect::run(file),

        Commands::Parse {
            file,
            output,
            max_rows,
            repair,
            model,
        } => commands::parse::run(file, output, max_rows, repair, model, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
