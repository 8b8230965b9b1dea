use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::services::match_notifier::{self, MatchNotifier};

/// Default bound on one Start announcement when none is configured.
pub const DEFAULT_ANNOUNCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared resources handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Long-lived client for the match-execution service
    pub match_notifier: Arc<dyn MatchNotifier>,
    /// Upper bound for one Start announcement, retries included
    pub announce_timeout: Duration,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        match_notifier: Arc<dyn MatchNotifier>,
        announce_timeout: Duration,
    ) -> Self {
        Self {
            db: Some(db),
            match_notifier,
            announce_timeout,
        }
    }

    /// State without a database; every DB-backed route answers 503.
    pub fn new_without_db() -> Self {
        Self {
            db: None,
            match_notifier: match_notifier::disabled(),
            announce_timeout: DEFAULT_ANNOUNCE_TIMEOUT,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("announce_timeout", &self.announce_timeout)
            .finish_non_exhaustive()
    }
}
