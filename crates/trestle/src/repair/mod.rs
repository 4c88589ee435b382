//! AI repair: one bounded call to an external text-generation service.
//!
//! When detection fails, the raw blob is sent to a generation service with a
//! fixed corrective prompt and deterministic sampling, under a hard deadline.
//! The repair is fire-once: the corrected text re-enters the parse pipeline
//! exactly one time, never in a convergence loop.

mod gemini;
mod mock;
mod prompts;
mod provider;

pub use gemini::{GeminiRepairer, validate_api_key};
pub use mock::MockRepairer;
pub use prompts::repair_prompt;
pub use provider::{
    DEFAULT_DEADLINE, RepairConfig, RepairProvider, RepairRequest, run, strip_code_fence,
};
