//! Trestle: turn an arbitrary text blob into a table.
//!
//! Trestle infers which structured format a raw blob actually is (JSON or a
//! delimited table), normalizes it into uniform rows and columns despite
//! missing or inconsistent data, and, when inference fails, drives a single
//! bounded repair round-trip through an external text-generation service
//! before re-attempting the parse.
//!
//! # Core Principles
//!
//! - **Detect, then normalize**: an ordered list of detector strategies,
//!   first success wins
//! - **Repair is fire-once**: one gated retry, never a convergence loop
//! - **Every failure is recoverable**: a new edit always restarts the cycle
//!
//! # Example
//!
//! ```
//! use trestle::{NormalizeConfig, parse_text};
//!
//! let result = parse_text("name,age\nJohn,30", &NormalizeConfig::default()).unwrap();
//!
//! assert_eq!(result.columns, vec!["name", "age"]);
//! assert_eq!(result.get(0, "age"), Some("30"));
//! ```

pub mod detect;
pub mod error;
pub mod export;
pub mod normalize;
pub mod repair;
pub mod session;

mod table;

pub use detect::{Delimiter, FormatKind, detect};
pub use error::{ParseError, RepairError, Result, TrestleError};
pub use export::{to_delimited, to_delimited_with};
pub use normalize::{NormalizeConfig, normalize, parse_text};
pub use repair::{GeminiRepairer, MockRepairer, RepairConfig, RepairProvider, RepairRequest};
pub use session::{ParseObserver, ParseSession, SessionState};
pub use table::{ParseResult, Record};
