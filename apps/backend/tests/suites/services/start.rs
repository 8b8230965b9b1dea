//! Start: row claim, announcement, rollback on notifier failure.

use std::sync::Arc;
use std::time::Duration;

use matchday::db::txn::with_txn;
use matchday::entities::games::GameState;
use matchday::error::AppError;
use matchday::errors::ErrorCode;
use matchday::services::games::GameLifecycleService;
use matchday::services::match_notifier::NotifyError;

use crate::support::factory::{
    create_game, delete_game, find_game, finish_game, seed_teams, start_game,
};
use crate::support::notifiers::{RecordingNotifier, SlowNotifier};
use crate::support::test_state::{state_with_notifier, state_with_notifier_and_timeout};

#[tokio::test]
async fn start_moves_created_to_going_and_announces_once() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;

    let started = start_game(&state, &created.game.code).await?;

    assert_eq!(started.game.state, GameState::Going);
    assert_eq!(started.game.version, created.game.version + 1);
    assert!(started.game.started_at.is_some());

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    let sent = &calls[0];
    assert_eq!(sent.game_code, created.game.code);
    assert_eq!(sent.idempotency_key(), created.game.code);
    assert_eq!(sent.duration_minutes, 60);
    let teams: Vec<(&str, i64)> = sent
        .participants
        .iter()
        .map(|p| (p.team_code.as_str(), p.team_id))
        .collect();
    assert_eq!(teams, vec![(home.code.as_str(), home.id), (away.code.as_str(), away.id)]);

    let stored = find_game(&state, &created.game.code).await?;
    assert_eq!(stored.game.state, GameState::Going);
    Ok(())
}

#[tokio::test]
async fn start_accepts_codes_in_any_case() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;

    let lowered = format!("  {}  ", created.game.code.to_lowercase());
    let started = start_game(&state, &lowered).await?;
    assert_eq!(started.game.code, created.game.code);
    Ok(())
}

#[tokio::test]
async fn start_on_unknown_code_is_not_found_without_notifying() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;

    let err = start_game(&state, "0000000000").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    assert_eq!(err.status().as_u16(), 404);
    assert!(err.detail().contains("0000000000"));
    assert_eq!(notifier.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn notifier_failure_rolls_back_and_a_retry_succeeds() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::failing_first(vec![NotifyError::Transport(
        "connection refused".to_string(),
    )]));
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;

    let err = start_game(&state, &created.game.code).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::MatchServiceUnavailable);
    assert_eq!(err.status().as_u16(), 502);

    let after_failure = find_game(&state, &created.game.code).await?;
    assert_eq!(after_failure.game.state, GameState::Created);
    assert_eq!(after_failure.game.version, created.game.version);
    assert!(after_failure.game.started_at.is_none());

    let started = start_game(&state, &created.game.code).await?;
    assert_eq!(started.game.state, GameState::Going);

    let keys: Vec<String> = notifier
        .calls()
        .iter()
        .map(|a| a.idempotency_key().to_string())
        .collect();
    assert_eq!(keys, vec![created.game.code.clone(), created.game.code.clone()]);
    Ok(())
}

#[tokio::test]
async fn rejection_by_match_service_is_bad_gateway() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::failing_first(vec![NotifyError::Rejected {
        status: 422,
    }]));
    let state = state_with_notifier(notifier).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;

    let err = start_game(&state, &created.game.code).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::MatchServiceRejected);
    assert_eq!(err.status().as_u16(), 502);
    assert_eq!(
        find_game(&state, &created.game.code).await?.game.state,
        GameState::Created
    );
    Ok(())
}

#[tokio::test]
async fn slow_match_service_times_out_and_game_stays_created() -> Result<(), AppError> {
    let notifier = Arc::new(SlowNotifier::new(Duration::from_secs(5)));
    let state =
        state_with_notifier_and_timeout(notifier.clone(), Duration::from_millis(50)).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;

    let err = start_game(&state, &created.game.code).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::MatchServiceTimeout);
    assert_eq!(err.status().as_u16(), 504);
    assert_eq!(notifier.started(), 1);

    let stored = find_game(&state, &created.game.code).await?;
    assert_eq!(stored.game.state, GameState::Created);
    assert_eq!(stored.game.version, 1);
    Ok(())
}

#[tokio::test]
async fn second_start_is_an_invalid_transition() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;

    start_game(&state, &created.game.code).await?;
    let err = start_game(&state, &created.game.code).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(notifier.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn start_after_finish_is_rejected() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;
    start_game(&state, &created.game.code).await?;
    finish_game(&state, &created.game.code, &home.code, None).await?;

    let err = start_game(&state, &created.game.code).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTransition);
    assert_eq!(notifier.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_starts_transition_and_notify_once() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;
    let code = created.game.code.clone();

    let (a, b) = tokio::join!(start_game(&state, &code), start_game(&state, &code));

    let outcomes = [a, b];
    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one start must win");
    for loser in outcomes.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(loser.status().as_u16(), 409);
        assert!(matches!(
            loser.code(),
            ErrorCode::InvalidTransition | ErrorCode::OptimisticLock
        ));
    }

    assert_eq!(notifier.call_count(), 1);
    let stored = find_game(&state, &code).await?;
    assert_eq!(stored.game.state, GameState::Going);
    assert_eq!(stored.game.version, 2);
    Ok(())
}

#[tokio::test]
async fn delete_read_before_a_start_commits_loses() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;
    let code = created.game.code.clone();

    // both operations read version 1; Start commits first
    let seen_by_delete = find_game(&state, &code).await?;
    let started = start_game(&state, &code).await?;

    let service = GameLifecycleService::from_state(&state);
    let err = with_txn(&state, |txn| {
        Box::pin(async move { service.delete_loaded(txn, seen_by_delete).await })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OptimisticLock);

    let stored = find_game(&state, &code).await?;
    assert_eq!(stored, started);
    assert_eq!(stored.participations.len(), 2);
    assert_eq!(notifier.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn start_read_before_a_delete_commits_loses_without_notifying() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::new());
    let state = state_with_notifier(notifier.clone()).await?;
    let (home, away) = seed_teams(&state).await?;
    let created = create_game(&state, &home, &away).await?;
    let code = created.game.code.clone();

    // both operations read version 1; Delete commits first
    let seen_by_start = find_game(&state, &code).await?;
    delete_game(&state, &code).await?;

    let service = GameLifecycleService::from_state(&state);
    let err = with_txn(&state, |txn| {
        Box::pin(async move { service.start_loaded(txn, seen_by_start).await })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    assert!(err.to_string().contains(&code), "{err}");

    assert_eq!(notifier.call_count(), 0);
    assert_eq!(find_game(&state, &code).await.unwrap_err().code(), ErrorCode::GameNotFound);
    Ok(())
}
