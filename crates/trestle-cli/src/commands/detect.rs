//! Detect command - report which structured format an input is.

use std::path::PathBuf;

use colored::Colorize;

pub fn run(file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let text = super::read_input(file.as_ref())?;
    let kind = trestle::detect(&text)?;

    println!("{}", kind.label().green().bold());
    Ok(())
}
