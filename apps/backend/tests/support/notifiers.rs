//! In-process `MatchNotifier` fakes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use matchday::services::match_notifier::{MatchNotifier, NotifyError, StartAnnouncement};

/// Records every announcement. Answers from a script first, then `Ok`.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<StartAnnouncement>>,
    script: Mutex<VecDeque<NotifyError>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `errors.len()` announcements with these errors, in order.
    pub fn failing_first(errors: Vec<NotifyError>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(errors.into()),
        }
    }

    pub fn calls(&self) -> Vec<StartAnnouncement> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MatchNotifier for RecordingNotifier {
    async fn announce_start(&self, announcement: &StartAnnouncement) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(announcement.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Never answers within `delay`; succeeds afterwards.
pub struct SlowNotifier {
    delay: Duration,
    started: AtomicUsize,
}

impl SlowNotifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchNotifier for SlowNotifier {
    async fn announce_start(&self, _announcement: &StartAnnouncement) -> Result<(), NotifyError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
