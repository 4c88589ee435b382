//! Command implementations.

pub mod detect;
pub mod parse;

use std::io::Read;
use std::path::PathBuf;

/// Ingestion cap: inputs above this many bytes are rejected outright.
const MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Read the input blob from a file or stdin, enforcing the size cap.
pub fn read_input(file: Option<&PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = match file {
        Some(path) => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            std::fs::read(path)?
        }
        None => {
            let mut buffer = Vec::new();
            std::io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };

    log::debug!("read {} input bytes", bytes.len());

    if bytes.len() > MAX_INPUT_BYTES {
        return Err(format!(
            "input is {} bytes, above the {} MiB limit",
            bytes.len(),
            MAX_INPUT_BYTES / (1024 * 1024)
        )
        .into());
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
