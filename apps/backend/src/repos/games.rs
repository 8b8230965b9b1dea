//! Game repository functions for the domain layer.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::games_sea as games_adapter;
pub use crate::adapters::games_sea::GameUpdate;
use crate::entities::games::{self, GameState};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::repos::participations::{self, Participation};

/// Game domain model, converted from `games::Model` when loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: i64,
    pub code: String,
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
    pub state: GameState,
    pub started_at: Option<OffsetDateTime>,
    pub finished_at: Option<OffsetDateTime>,
    pub summary: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub version: i32,
}

impl From<games::Model> for Game {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            scheduled_at: model.scheduled_at,
            duration_minutes: model.duration_minutes,
            state: model.state,
            started_at: model.started_at,
            finished_at: model.finished_at,
            summary: model.summary,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        }
    }
}

/// A game together with its participations (home first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetail {
    pub game: Game,
    pub participations: Vec<Participation>,
}

impl GameDetail {
    pub fn participation_for_team(&self, team_code: &str) -> Option<&Participation> {
        self.participations
            .iter()
            .find(|p| p.team_code == team_code)
    }

    pub fn winner(&self) -> Option<&Participation> {
        self.participations.iter().find(|p| p.is_winner)
    }
}

#[derive(Debug, Clone)]
pub struct NewGame {
    pub code: String,
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
}

pub async fn create_new(txn: &DatabaseTransaction, new: NewGame) -> Result<Game, DomainError> {
    let dto = games_adapter::GameCreate::new(new.code, new.scheduled_at, new.duration_minutes);
    let game = games_adapter::create_game(txn, dto).await?;
    Ok(Game::from(game))
}

/// Plain row lookup, no participations.
pub async fn find_game_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_by_code(conn, code).await?;
    Ok(game.map(Game::from))
}

/// Detail-level lookup: the game and its participations.
pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<GameDetail>, DomainError> {
    let Some(game) = find_game_by_code(conn, code).await? else {
        return Ok(None);
    };
    let participations = participations::find_for_game(conn, game.id).await?;
    if participations.len() != 2 {
        return Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!(
                "game {} has {} participations, expected 2",
                game.code,
                participations.len()
            ),
        ));
    }
    Ok(Some(GameDetail {
        game,
        participations,
    }))
}

/// A version-checked write matched nothing because the row is gone.
fn vanished_as_not_found(e: sea_orm::DbErr, code: &str) -> DomainError {
    match e {
        sea_orm::DbErr::RecordNotFound(_) => {
            DomainError::not_found(NotFoundKind::Game, format!("Game '{code}' not found"))
        }
        other => other.into(),
    }
}

/// Update with optimistic locking; returns the refreshed game.
pub async fn update_game(
    txn: &DatabaseTransaction,
    code: &str,
    update: GameUpdate,
) -> Result<Game, DomainError> {
    let game = games_adapter::update_game(txn, update)
        .await
        .map_err(|e| vanished_as_not_found(e, code))?;
    Ok(Game::from(game))
}

/// Delete with optimistic locking against the version `game` was read at.
pub async fn delete_game(txn: &DatabaseTransaction, game: &Game) -> Result<(), DomainError> {
    games_adapter::delete_game(txn, game.id, game.version)
        .await
        .map_err(|e| vanished_as_not_found(e, &game.code))
}

/// Games still in `Created`, newest first.
pub async fn list_recent_created<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Game>, DomainError> {
    let games = games_adapter::list_by_state(conn, GameState::Created).await?;
    Ok(games.into_iter().map(Game::from).collect())
}

/// One-based page of all games, newest first. Page 0 is treated as page 1.
pub async fn list_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: u64,
    page_size: u64,
) -> Result<Vec<Game>, DomainError> {
    let games = games_adapter::list_page(conn, page.saturating_sub(1), page_size).await?;
    Ok(games.into_iter().map(Game::from).collect())
}
