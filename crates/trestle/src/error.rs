//! Error types for the Trestle library.

use std::time::Duration;

use thiserror::Error;

/// A first-pass parse failure. Both variants are recoverable: the caller is
/// expected to offer an AI repair attempt rather than give up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No known format matched the input.
    #[error("unrecognized format: {0}")]
    Unrecognized(String),

    /// A format matched but yielded zero usable rows.
    #[error("no rows produced: {0}")]
    NoRowsProduced(String),
}

impl ParseError {
    /// Stable kind name, for observability sinks.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::Unrecognized(_) => "unrecognized",
            ParseError::NoRowsProduced(_) => "no_rows_produced",
        }
    }
}

/// A failure from the repair service round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepairError {
    /// Credential failed the syntactic pre-check (never verified server-side).
    #[error("invalid API key: {0}")]
    InvalidCredential(String),

    /// The call did not resolve within the wall-clock deadline.
    #[error("repair request timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered but returned no candidates.
    #[error("repair service returned no candidates")]
    EmptyResponse,

    /// The request never reached the service, or the connection broke.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("repair service error ({code}): {message}")]
    Service { code: u16, message: String },
}

impl RepairError {
    /// Stable kind name, for observability sinks.
    pub fn kind(&self) -> &'static str {
        match self {
            RepairError::InvalidCredential(_) => "invalid_credential",
            RepairError::Timeout(_) => "timeout",
            RepairError::EmptyResponse => "empty_response",
            RepairError::Transport(_) => "transport",
            RepairError::Service { .. } => "service",
        }
    }
}

/// Main error type for Trestle operations.
#[derive(Debug, Error)]
pub enum TrestleError {
    /// First-pass detection or normalization failure.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Repair service failure.
    #[error(transparent)]
    Repair(#[from] RepairError),

    /// Error from the CSV library during export.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Trestle operations.
pub type Result<T> = std::result::Result<T, TrestleError>;
