//! Mock repair provider for testing.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::RepairError;

use super::provider::RepairProvider;

/// Scriptable repair provider that returns queued outcomes in order.
///
/// An optional artificial delay makes deadline behavior testable under
/// `tokio::time` paused clocks.
pub struct MockRepairer {
    script: Mutex<VecDeque<Result<String, RepairError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockRepairer {
    /// A provider that always answers with `text`.
    pub fn succeeding(text: impl Into<String>) -> Self {
        Self::new().then(Ok(text.into()))
    }

    /// A provider whose first call fails with `error`.
    pub fn failing(error: RepairError) -> Self {
        Self::new().then(Err(error))
    }

    /// An empty script; calls fail with `EmptyResponse` until outcomes are
    /// queued.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue the next outcome.
    pub fn then(self, outcome: Result<String, RepairError>) -> Self {
        self.script
            .lock()
            .expect("mock script lock poisoned")
            .push_back(outcome);
        self
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of repair calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRepairer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepairProvider for MockRepairer {
    async fn repair(&self, _raw_text: &str) -> Result<String, RepairError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.script
            .lock()
            .expect("mock script lock poisoned")
            .pop_front()
            .unwrap_or(Err(RepairError::EmptyResponse))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
