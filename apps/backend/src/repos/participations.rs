//! Participation store. Participations only exist inside their game's
//! unit of work: created with it, flagged by Finish, deleted with it.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::participations_sea as participations_adapter;
use crate::entities::{participations, teams};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::teams::Team;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participation {
    pub id: i64,
    pub game_id: i64,
    pub team_id: i64,
    pub team_code: String,
    pub is_winner: bool,
}

impl Participation {
    fn from_parts(model: participations::Model, team_code: String) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            team_id: model.team_id,
            team_code,
            is_winner: model.is_winner,
        }
    }
}

pub async fn create_for(
    txn: &DatabaseTransaction,
    game_id: i64,
    team: &Team,
) -> Result<Participation, DomainError> {
    let model = participations_adapter::create_participation(txn, game_id, team.id).await?;
    Ok(Participation::from_parts(model, team.code.clone()))
}

/// Participations of a game in creation order (home first).
pub async fn find_for_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Participation>, DomainError> {
    let rows = participations_adapter::find_with_teams(conn, game_id).await?;
    rows.into_iter()
        .map(|(model, team): (participations::Model, Option<teams::Model>)| {
            let team = team.ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("participation {} references a missing team", model.id),
                )
            })?;
            Ok(Participation::from_parts(model, team.code))
        })
        .collect()
}

/// Remove every participation of a game; returns how many went.
pub async fn delete_for_game(
    txn: &DatabaseTransaction,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(participations_adapter::delete_by_game(txn, game_id).await?)
}

pub async fn set_winner(
    txn: &DatabaseTransaction,
    game_id: i64,
    participation_id: i64,
) -> Result<(), DomainError> {
    participations_adapter::set_winner(txn, game_id, participation_id).await?;
    Ok(())
}
