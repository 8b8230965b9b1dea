use matchday::adapters::teams_sea;
use matchday::db::require_db;
use matchday::error::AppError;
use matchday::repos::teams;

use crate::support::factory::seed_team;
use crate::support::test_state::build_test_state;

#[tokio::test]
async fn team_lookup_by_code() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let team = seed_team(&state, "red").await?;
    let db = require_db(&state)?;

    let found = teams::find_by_code(db, &team.code).await?.unwrap();
    assert_eq!(found, team);
    assert_eq!(found.name, "red united");

    let by_id = teams_sea::find_by_id(db, team.id).await?.unwrap();
    assert_eq!(by_id.code, team.code);

    assert!(teams::find_by_code(db, "NO-SUCH-TEAM").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn team_codes_are_unique() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let team = seed_team(&state, "red").await?;
    let db = require_db(&state)?;

    let second = teams::create_team(db, &team.code, "imposters").await;
    assert!(second.is_err());
    Ok(())
}
