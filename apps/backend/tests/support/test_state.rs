use std::sync::Arc;
use std::time::Duration;

use matchday::config::db::{DbKind, RuntimeEnv};
use matchday::infra::state::{build_state, StateBuilder};
use matchday::services::match_notifier::MatchNotifier;
use matchday::{AppError, AppState};

/// Fresh in-memory SQLite per state: tests never share rows.
pub fn test_state_builder() -> StateBuilder {
    backend_test_support::logging::init();
    build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(DbKind::SqliteMemory)
}

pub async fn build_test_state() -> Result<AppState, AppError> {
    test_state_builder().build().await
}

pub async fn state_with_notifier(notifier: Arc<dyn MatchNotifier>) -> Result<AppState, AppError> {
    test_state_builder().with_notifier(notifier).build().await
}

pub async fn state_with_notifier_and_timeout(
    notifier: Arc<dyn MatchNotifier>,
    timeout: Duration,
) -> Result<AppState, AppError> {
    test_state_builder()
        .with_notifier(notifier)
        .with_announce_timeout(timeout)
        .build()
        .await
}
