//! Parse session: the state machine tying detection, normalization, and
//! repair together.
//!
//! Each edit replaces the session snapshot atomically; readers always see
//! either the old or the new raw/outcome pair. Detection and normalization
//! are synchronous and pure, so they run on every edit. The only suspending
//! operation is the repair call, guarded to at most one in flight.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{ParseError, RepairError};
use crate::normalize::{NormalizeConfig, parse_text};
use crate::repair::{self, RepairProvider, RepairRequest};
use crate::table::ParseResult;

/// Observability sink for parse outcomes.
///
/// All methods default to no-ops so implementers override only what they
/// report on.
pub trait ParseObserver: Send + Sync {
    /// A successful parse: row count and format label.
    fn parse_succeeded(&self, _row_count: usize, _format_label: &str) {}

    /// A parse or repair failure: stable kind name and message.
    fn parse_failed(&self, _kind: &str, _message: &str) {}
}

/// Where a session currently stands.
///
/// Detection is a transient synchronous phase inside [`ParseSession::edit`],
/// not a stored state. `Repairing` doubles as the in-flight guard: a second
/// repair request while one is outstanding is rejected without queueing.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No input yet, or the input was blank.
    Idle,
    /// Detection and normalization succeeded.
    Parsed(Arc<ParseResult>),
    /// First-pass parsing failed; a repair attempt may be invoked.
    Failed(ParseError),
    /// A repair call is outstanding.
    Repairing,
    /// The repair cycle failed; a new edit or another attempt restarts it.
    RepairFailed(RepairError),
}

impl SessionState {
    /// The parse result, if the session holds one.
    pub fn result(&self) -> Option<&Arc<ParseResult>> {
        match self {
            SessionState::Parsed(result) => Some(result),
            _ => None,
        }
    }

    /// User-visible error text, cleared (None) on success or idle.
    pub fn error_message(&self) -> Option<String> {
        match self {
            SessionState::Failed(e) => Some(e.to_string()),
            SessionState::RepairFailed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    /// Whether a repair call is outstanding.
    pub fn is_repairing(&self) -> bool {
        matches!(self, SessionState::Repairing)
    }

    /// Whether a repair attempt may be started from here.
    pub fn can_repair(&self) -> bool {
        matches!(self, SessionState::Failed(_) | SessionState::RepairFailed(_))
    }
}

struct Inner {
    /// Bumped on every edit; an in-flight repair resolving against an older
    /// generation is discarded.
    generation: u64,
    raw: Arc<str>,
    state: SessionState,
}

/// One user session of the detect → normalize → (repair → retry) pipeline.
pub struct ParseSession {
    config: NormalizeConfig,
    repairer: Option<Arc<dyn RepairProvider>>,
    observer: Option<Arc<dyn ParseObserver>>,
    deadline: Duration,
    inner: Mutex<Inner>,
}

impl ParseSession {
    /// Create a session with default configuration and no repair provider.
    pub fn new() -> Self {
        Self {
            config: NormalizeConfig::default(),
            repairer: None,
            observer: None,
            deadline: repair::DEFAULT_DEADLINE,
            inner: Mutex::new(Inner {
                generation: 0,
                raw: Arc::from(""),
                state: SessionState::Idle,
            }),
        }
    }

    /// Set the normalizer configuration.
    pub fn with_config(mut self, config: NormalizeConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a repair provider, enabling the repair transition.
    pub fn with_repairer(mut self, provider: impl RepairProvider + 'static) -> Self {
        self.repairer = Some(Arc::new(provider));
        self
    }

    /// Override the repair deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Attach an observability sink.
    pub fn with_observer(mut self, observer: impl ParseObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Feed a new raw blob into the pipeline.
    ///
    /// Blank input transitions back to `Idle` with no result. Any outcome of
    /// an in-flight repair is invalidated by the edit.
    pub fn edit(&self, text: &str) -> SessionState {
        // Pure and reentrant, so parsing happens outside the lock.
        let outcome = if text.trim().is_empty() {
            None
        } else {
            Some(parse_text(text, &self.config))
        };

        let state = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.raw = Arc::from(text);
            inner.state = match outcome {
                None => SessionState::Idle,
                Some(Ok(result)) => SessionState::Parsed(Arc::new(result)),
                Some(Err(error)) => SessionState::Failed(error),
            };
            inner.state.clone()
        };

        self.report(&state);
        state
    }

    /// Invoke one repair-and-retry cycle.
    ///
    /// Allowed only from `Failed` or `RepairFailed`; rejected without
    /// queueing while another repair is outstanding. On success the
    /// corrected text re-enters the pipeline exactly once via the ordinary
    /// edit path. The repair never chains automatically.
    pub async fn repair(&self) -> SessionState {
        let (generation, raw) = {
            let mut inner = self.lock();
            if inner.state.is_repairing() {
                log::warn!("repair already in flight, request rejected");
                return inner.state.clone();
            }
            if !inner.state.can_repair() {
                log::debug!("repair requested outside a failed state, ignored");
                return inner.state.clone();
            }
            inner.state = SessionState::Repairing;
            (inner.generation, Arc::clone(&inner.raw))
        };

        let Some(repairer) = self.repairer.clone() else {
            let error =
                RepairError::InvalidCredential("no repair provider configured".to_string());
            return self.fail_repair(generation, error);
        };

        let request = RepairRequest::new(raw.as_ref()).with_deadline(self.deadline);
        let outcome = repair::run(repairer.as_ref(), &request).await;

        match outcome {
            // The corrected text becomes the new raw blob, exactly once.
            Ok(corrected) => self.commit_repaired(generation, &corrected),
            Err(error) => self.fail_repair(generation, error),
        }
    }

    /// Re-run the pipeline on repaired text, unless the snapshot moved on.
    fn commit_repaired(&self, generation: u64, corrected: &str) -> SessionState {
        // Parsed outside the lock; detection is pure.
        let outcome = if corrected.trim().is_empty() {
            None
        } else {
            Some(parse_text(corrected, &self.config))
        };

        let state = {
            let mut inner = self.lock();
            if inner.generation != generation || !inner.state.is_repairing() {
                log::debug!("discarding stale repair result");
                return inner.state.clone();
            }
            inner.generation += 1;
            inner.raw = Arc::from(corrected);
            inner.state = match outcome {
                None => SessionState::Idle,
                Some(Ok(result)) => SessionState::Parsed(Arc::new(result)),
                Some(Err(error)) => SessionState::Failed(error),
            };
            inner.state.clone()
        };

        self.report(&state);
        state
    }

    fn fail_repair(&self, generation: u64, error: RepairError) -> SessionState {
        let state = {
            let mut inner = self.lock();
            if inner.generation != generation || !inner.state.is_repairing() {
                log::debug!("discarding stale repair outcome");
                return inner.state.clone();
            }
            inner.state = SessionState::RepairFailed(error);
            inner.state.clone()
        };

        self.report(&state);
        state
    }

    fn report(&self, state: &SessionState) {
        let Some(observer) = &self.observer else {
            return;
        };
        match state {
            SessionState::Parsed(result) => {
                observer.parse_succeeded(result.row_count(), result.format_label());
            }
            SessionState::Failed(e) => observer.parse_failed(e.kind(), &e.to_string()),
            SessionState::RepairFailed(e) => observer.parse_failed(e.kind(), &e.to_string()),
            SessionState::Idle | SessionState::Repairing => {}
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Parsing never panics while holding the lock; poisoning would be a
        // bug in this module itself.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ParseSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::MockRepairer;

    #[test]
    fn test_blank_edit_is_idle() {
        let session = ParseSession::new();
        assert!(matches!(session.edit("   \n  "), SessionState::Idle));
        assert!(session.state().error_message().is_none());
    }

    #[test]
    fn test_edit_success_and_failure() {
        let session = ParseSession::new();

        let state = session.edit("name,age\nJohn,30");
        let result = state.result().expect("should parse");
        assert_eq!(result.row_count(), 1);

        let state = session.edit("not valid anything");
        assert!(matches!(state, SessionState::Failed(ParseError::Unrecognized(_))));
        assert!(state.error_message().is_some());

        // A new edit clears the failure.
        let state = session.edit("a,b\n1,2");
        assert!(state.error_message().is_none());
    }

    #[tokio::test]
    async fn test_repair_success_reenters_pipeline() {
        let session = ParseSession::new()
            .with_repairer(MockRepairer::succeeding("name,age\nJohn,30"));

        session.edit("name age John 30");
        assert!(session.state().can_repair());

        let state = session.repair().await;
        let result = state.result().expect("repaired text should parse");
        assert_eq!(result.columns, vec!["name", "age"]);
    }

    #[tokio::test]
    async fn test_repair_failure_is_surfaced() {
        let session = ParseSession::new()
            .with_repairer(MockRepairer::failing(RepairError::EmptyResponse));

        session.edit("not valid anything");
        let state = session.repair().await;

        assert!(matches!(state, SessionState::RepairFailed(RepairError::EmptyResponse)));
        assert!(state.error_message().is_some());
    }

    #[tokio::test]
    async fn test_repair_rejected_outside_failed_state() {
        let session = ParseSession::new()
            .with_repairer(MockRepairer::succeeding("a,b\n1,2"));

        let state = session.repair().await;
        assert!(matches!(state, SessionState::Idle));

        session.edit("a,b\n1,2");
        let state = session.repair().await;
        assert!(matches!(state, SessionState::Parsed(_)));
    }

    #[tokio::test]
    async fn test_repair_without_provider_fails_cleanly() {
        let session = ParseSession::new();
        session.edit("not valid anything");

        let state = session.repair().await;
        assert!(matches!(
            state,
            SessionState::RepairFailed(RepairError::InvalidCredential(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_repair_rejected_while_in_flight() {
        let provider = MockRepairer::succeeding("a,b\n1,2")
            .with_delay(Duration::from_secs(5));
        let session = ParseSession::new().with_repairer(provider);
        session.edit("not valid anything");

        let (first, second) = tokio::join!(session.repair(), session.repair());

        // The overlapping request observed the guard and changed nothing.
        assert!(second.is_repairing());
        assert!(matches!(first, SessionState::Parsed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_during_repair_discards_late_result() {
        let provider = MockRepairer::succeeding("x,y\n1,2")
            .with_delay(Duration::from_secs(10));
        let session = ParseSession::new().with_repairer(provider);
        session.edit("not valid anything");

        let (repaired, _) = tokio::join!(session.repair(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            session.edit("name,age\nJane,25");
        });

        // The edit superseded the repair; its late result was ignored.
        let result = repaired.result().expect("edit result");
        assert_eq!(result.columns, vec!["name", "age"]);
        assert_eq!(session.state().result().unwrap().columns, vec!["name", "age"]);
    }
}
