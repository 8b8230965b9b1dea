//! Fixture helpers: teams are seeded directly, games go through the
//! lifecycle service inside `with_txn` the same way the routes do.

use backend_test_support::unique_helpers::unique_team_code;
use matchday::db::require_db;
use matchday::db::txn::with_txn;
use matchday::repos::games::GameDetail;
use matchday::repos::teams::{self, Team};
use matchday::services::games::{CreateGame, FinishGame, GameLifecycleService};
use matchday::{AppError, AppState};
use time::{Duration, OffsetDateTime};

pub fn kickoff_in_hours(hours: i64) -> OffsetDateTime {
    OffsetDateTime::now_utc() + Duration::hours(hours)
}

pub async fn seed_team(state: &AppState, prefix: &str) -> Result<Team, AppError> {
    let db = require_db(state)?;
    let code = unique_team_code(prefix);
    Ok(teams::create_team(db, &code, &format!("{prefix} united")).await?)
}

pub async fn seed_teams(state: &AppState) -> Result<(Team, Team), AppError> {
    let home = seed_team(state, "red").await?;
    let away = seed_team(state, "blu").await?;
    Ok((home, away))
}

pub fn create_input(home: &Team, away: &Team) -> CreateGame {
    CreateGame {
        scheduled_at: kickoff_in_hours(2),
        home_team_code: home.code.clone(),
        away_team_code: away.code.clone(),
        duration_minutes: 60,
    }
}

pub async fn create_with(state: &AppState, input: CreateGame) -> Result<GameDetail, AppError> {
    let service = GameLifecycleService::from_state(state);
    with_txn(state, |txn| {
        Box::pin(async move { service.create(txn, input).await })
    })
    .await
}

pub async fn create_game(state: &AppState, home: &Team, away: &Team) -> Result<GameDetail, AppError> {
    create_with(state, create_input(home, away)).await
}

pub async fn start_game(state: &AppState, code: &str) -> Result<GameDetail, AppError> {
    let service = GameLifecycleService::from_state(state);
    let code = code.to_string();
    with_txn(state, |txn| {
        Box::pin(async move { service.start(txn, &code).await })
    })
    .await
}

pub async fn finish_game(
    state: &AppState,
    code: &str,
    winner_team_code: &str,
    summary: Option<&str>,
) -> Result<GameDetail, AppError> {
    let service = GameLifecycleService::from_state(state);
    let code = code.to_string();
    let input = FinishGame {
        winner_team_code: winner_team_code.to_string(),
        summary: summary.map(str::to_string),
    };
    with_txn(state, |txn| {
        Box::pin(async move { service.finish(txn, &code, input).await })
    })
    .await
}

pub async fn delete_game(state: &AppState, code: &str) -> Result<GameDetail, AppError> {
    let service = GameLifecycleService::from_state(state);
    let code = code.to_string();
    with_txn(state, |txn| {
        Box::pin(async move { service.delete(txn, &code).await })
    })
    .await
}

pub async fn find_game(state: &AppState, code: &str) -> Result<GameDetail, AppError> {
    let db = require_db(state)?;
    GameLifecycleService::from_state(state)
        .find_by_code(db, code)
        .await
}

/// A game already moved to `Going` with a notifier that accepts everything.
pub async fn going_game(state: &AppState) -> Result<(GameDetail, Team, Team), AppError> {
    let (home, away) = seed_teams(state).await?;
    let created = create_game(state, &home, &away).await?;
    let started = start_game(state, &created.game.code).await?;
    Ok((started, home, away))
}
