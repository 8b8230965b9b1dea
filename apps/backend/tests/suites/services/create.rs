use matchday::db::require_db;
use matchday::entities::games::GameState;
use matchday::error::AppError;
use matchday::errors::ErrorCode;
use matchday::repos::games;
use matchday::services::games::CreateGame;
use matchday::utils::game_code::GAME_CODE_LEN;
use time::{Duration, OffsetDateTime};

use crate::support::factory::{create_game, create_input, create_with, seed_teams};
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn create_persists_created_game_with_two_participations() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (home, away) = seed_teams(&state).await?;

    let detail = create_game(&state, &home, &away).await?;

    assert_eq!(detail.game.state, GameState::Created);
    assert_eq!(detail.game.version, 1);
    assert_eq!(detail.game.code.len(), GAME_CODE_LEN);
    let codes: Vec<&str> = detail
        .participations
        .iter()
        .map(|p| p.team_code.as_str())
        .collect();
    assert_eq!(codes, vec![home.code.as_str(), away.code.as_str()]);
    assert!(detail.participations.iter().all(|p| !p.is_winner));

    // what was returned is what was committed
    let db = require_db(&state)?;
    let stored = games::find_by_code(db, &detail.game.code).await?.unwrap();
    assert_eq!(stored.game.id, detail.game.id);
    assert_eq!(stored.participations.len(), 2);
    Ok(())
}

#[tokio::test]
async fn every_game_gets_its_own_code() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (home, away) = seed_teams(&state).await?;

    let a = create_game(&state, &home, &away).await?;
    let b = create_game(&state, &away, &home).await?;
    assert_ne!(a.game.code, b.game.code);
    Ok(())
}

#[tokio::test]
async fn schedule_too_soon_is_rejected_and_nothing_persists() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (home, away) = seed_teams(&state).await?;

    let input = CreateGame {
        scheduled_at: OffsetDateTime::now_utc() + Duration::seconds(30),
        ..create_input(&home, &away)
    };
    let err = create_with(&state, input).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ScheduleTooSoon);
    assert_eq!(err.status().as_u16(), 400);

    let db = require_db(&state)?;
    assert!(games::list_page(db, 1, 10).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn past_schedule_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (home, away) = seed_teams(&state).await?;

    let input = CreateGame {
        scheduled_at: OffsetDateTime::now_utc() - Duration::days(1),
        ..create_input(&home, &away)
    };
    let err = create_with(&state, input).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ScheduleTooSoon);
    Ok(())
}

#[tokio::test]
async fn same_team_on_both_sides_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (home, _) = seed_teams(&state).await?;

    let err = create_game(&state, &home, &home).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SameTeam);
    Ok(())
}

#[tokio::test]
async fn duration_out_of_range_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (home, away) = seed_teams(&state).await?;

    for minutes in [0, 1441] {
        let input = CreateGame {
            duration_minutes: minutes,
            ..create_input(&home, &away)
        };
        let err = create_with(&state, input).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidDuration);
    }
    Ok(())
}

#[tokio::test]
async fn unknown_team_is_not_found_and_names_the_code() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let (home, _) = seed_teams(&state).await?;

    let input = CreateGame {
        away_team_code: "GHOSTS".to_string(),
        ..create_input(&home, &home)
    };
    let err = create_with(&state, input).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TeamNotFound);
    assert!(err.detail().contains("GHOSTS"));

    let db = require_db(&state)?;
    assert!(games::list_page(db, 1, 10).await?.is_empty());
    Ok(())
}
