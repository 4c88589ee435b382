//! Repair provider trait and request types.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RepairError;

/// Default wall-clock deadline for one repair round-trip.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

/// Configuration for repair providers.
///
/// Generation parameters are deterministic by default to bias the model
/// toward literal correction rather than creative rewriting.
#[derive(Debug, Clone)]
pub struct RepairConfig {
    /// Model to use.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Top-p (nucleus) sampling cutoff.
    pub top_p: f64,
    /// Cap on generated output tokens.
    pub max_output_tokens: u32,
    /// Wall-clock deadline for the whole call.
    pub deadline: Duration,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.1,
            top_k: 1,
            top_p: 0.8,
            max_output_tokens: 8192,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

/// One repair attempt: the raw text to fix, and how long to wait for it.
#[derive(Debug, Clone)]
pub struct RepairRequest {
    /// The text that failed to parse, verbatim.
    pub raw_text: String,
    /// Wall-clock deadline for the call.
    pub deadline: Duration,
}

impl RepairRequest {
    /// Build a request with the default deadline.
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Override the deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Trait for repair providers.
///
/// Implementations issue exactly one outbound call per invocation and must
/// not mutate shared state; committing corrected text is the caller's job.
#[async_trait]
pub trait RepairProvider: Send + Sync {
    /// Ask the service to coerce `raw_text` into a parseable shape.
    async fn repair(&self, raw_text: &str) -> Result<String, RepairError>;

    /// Provider name, for logging.
    fn name(&self) -> &str;
}

/// Run one repair attempt under its deadline.
///
/// On expiry the in-flight future is dropped, so a cancelled call can never
/// deliver a late result to the caller.
pub async fn run(
    provider: &dyn RepairProvider,
    request: &RepairRequest,
) -> Result<String, RepairError> {
    match tokio::time::timeout(request.deadline, provider.repair(&request.raw_text)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            log::warn!(
                "repair via {} timed out after {:?}",
                provider.name(),
                request.deadline
            );
            Err(RepairError::Timeout(request.deadline))
        }
    }
}

/// Strip one optional leading/trailing fenced-code-block marker.
///
/// Models often wrap corrected data in a fence whose opening line may carry
/// a language tag; only the bare marker lines are removed.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let mut lines: Vec<&str> = trimmed.lines().collect();

    if lines.first().is_some_and(|l| l.trim_start().starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim() == "```") {
        lines.pop();
    }

    lines.join("\n").trim().to_string()
}
