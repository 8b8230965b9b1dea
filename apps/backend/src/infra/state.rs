use std::sync::Arc;
use std::time::Duration;

use crate::config::db::{DbKind, RuntimeEnv};
use crate::config::match_service::MatchServiceConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::match_notifier::{self, HttpMatchNotifier, MatchNotifier};
use crate::state::app_state::{AppState, DEFAULT_ANNOUNCE_TIMEOUT};

/// Builder for `AppState` (used in both tests and main)
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    notifier: Option<Arc<dyn MatchNotifier>>,
    match_service: Option<MatchServiceConfig>,
    announce_timeout: Option<Duration>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Test,
            db_kind: None,
            notifier: None,
            match_service: None,
            announce_timeout: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, db_kind: DbKind) -> Self {
        self.db_kind = Some(db_kind);
        self
    }

    /// Inject a ready notifier (fakes in tests).
    pub fn with_notifier(mut self, notifier: Arc<dyn MatchNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the HTTP notifier from `config` at `build()` time.
    pub fn with_match_service(mut self, config: MatchServiceConfig) -> Self {
        self.match_service = Some(config);
        self
    }

    pub fn with_announce_timeout(mut self, timeout: Duration) -> Self {
        self.announce_timeout = Some(timeout);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let (notifier, default_timeout): (Arc<dyn MatchNotifier>, Duration) =
            match (self.notifier, self.match_service) {
                (Some(notifier), _) => (notifier, DEFAULT_ANNOUNCE_TIMEOUT),
                (None, Some(config)) => {
                    let http = HttpMatchNotifier::new(config)?;
                    let budget = http.total_budget();
                    (Arc::new(http), budget)
                }
                (None, None) => (match_notifier::disabled(), DEFAULT_ANNOUNCE_TIMEOUT),
            };
        let announce_timeout = self.announce_timeout.unwrap_or(default_timeout);

        match self.db_kind {
            Some(db_kind) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(self.env, db_kind).await?;
                Ok(AppState::new(conn, notifier, announce_timeout))
            }
            None => Ok(AppState {
                db: None,
                match_notifier: notifier,
                announce_timeout,
            }),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
