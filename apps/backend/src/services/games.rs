//! Game lifecycle orchestration.
//!
//! Every mutating operation runs on a caller-provided transaction (see
//! `db::txn::with_txn`), so the game row, its participations and the Start
//! row claim commit or roll back together. Reads take any connection.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::domain::lifecycle::{self, LifecycleOp};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::games::{self, Game, GameDetail, GameUpdate, NewGame};
use crate::repos::participations;
use crate::repos::teams::{self, Team};
use crate::services::match_notifier::{MatchNotifier, NotifyError, StartAnnouncement};
use crate::state::app_state::AppState;
use crate::utils::game_code::{generate_game_code, normalize_game_code};

/// Fixed page length for `list_page`.
pub const PAGE_SIZE: u64 = 10;
pub const MIN_DURATION_MINUTES: i32 = 1;
pub const MAX_DURATION_MINUTES: i32 = 24 * 60;
/// How far ahead a new game must be scheduled.
pub const MIN_LEAD_TIME: time::Duration = time::Duration::minutes(1);
const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct CreateGame {
    pub scheduled_at: OffsetDateTime,
    pub home_team_code: String,
    pub away_team_code: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone)]
pub struct FinishGame {
    pub winner_team_code: String,
    pub summary: Option<String>,
}

pub struct GameLifecycleService {
    notifier: Arc<dyn MatchNotifier>,
    announce_timeout: Duration,
}

impl GameLifecycleService {
    pub fn new(notifier: Arc<dyn MatchNotifier>, announce_timeout: Duration) -> Self {
        Self {
            notifier,
            announce_timeout,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.match_notifier.clone(), state.announce_timeout)
    }

    /// Create a game in `Created` with one participation per team, home first.
    pub async fn create(
        &self,
        txn: &DatabaseTransaction,
        input: CreateGame,
    ) -> Result<GameDetail, AppError> {
        let home_code = input.home_team_code.trim().to_string();
        let away_code = input.away_team_code.trim().to_string();

        validate_schedule(input.scheduled_at, OffsetDateTime::now_utc())?;
        validate_duration(input.duration_minutes)?;
        if home_code == away_code {
            return Err(DomainError::validation(
                ValidationKind::SameTeam,
                format!("A game needs two distinct teams, got '{home_code}' twice"),
            )
            .into());
        }

        let home = require_team(txn, &home_code).await?;
        let away = require_team(txn, &away_code).await?;

        let code = allocate_code(txn).await?;
        let game = games::create_new(
            txn,
            NewGame {
                code,
                scheduled_at: input.scheduled_at,
                duration_minutes: input.duration_minutes,
            },
        )
        .await?;
        debug_assert_eq!(game.state, lifecycle::initial_state());

        let home_participation = participations::create_for(txn, game.id, &home).await?;
        let away_participation = participations::create_for(txn, game.id, &away).await?;

        info!(
            game_code = %game.code,
            home = %home.code,
            away = %away.code,
            scheduled_at = %game.scheduled_at,
            "game=created"
        );

        Ok(GameDetail {
            game,
            participations: vec![home_participation, away_participation],
        })
    }

    /// Move a `Created` game to `Going` once the match service has accepted it.
    ///
    /// The row is claimed with a version-checked update before the announcement
    /// goes out; if the announcement fails the caller's transaction rolls the
    /// claim back and the game stays `Created`.
    pub async fn start(&self, txn: &DatabaseTransaction, code: &str) -> Result<GameDetail, AppError> {
        let detail = require_game(txn, &normalize_game_code(code)).await?;
        self.start_loaded(txn, detail).await
    }

    /// Start a game already read in this transaction. The claim checks the
    /// version `detail` carries.
    pub async fn start_loaded(
        &self,
        txn: &DatabaseTransaction,
        detail: GameDetail,
    ) -> Result<GameDetail, AppError> {
        let code = detail.game.code.clone();
        let next = lifecycle::next_state(detail.game.state, LifecycleOp::Start)
            .map_err(DomainError::from)?;

        let claimed = games::update_game(
            txn,
            &code,
            GameUpdate::new(detail.game.id, detail.game.version)
                .with_state(next)
                .with_started_at(OffsetDateTime::now_utc()),
        )
        .await?;
        debug!(game_code = %code, version = claimed.version, "game=start_claimed");

        let announcement = StartAnnouncement::for_game(&detail);
        let outcome = tokio::time::timeout(
            self.announce_timeout,
            self.notifier.announce_start(&announcement),
        )
        .await
        .unwrap_or(Err(NotifyError::Timeout));

        if let Err(e) = outcome {
            warn!(game_code = %code, error = %e, "game=start_failed");
            return Err(e.into_domain(&code).into());
        }

        info!(game_code = %code, version = claimed.version, "game=started");
        Ok(GameDetail {
            game: claimed,
            participations: detail.participations,
        })
    }

    /// Record the result of a `Going` game and flag exactly one winner.
    pub async fn finish(
        &self,
        txn: &DatabaseTransaction,
        code: &str,
        input: FinishGame,
    ) -> Result<GameDetail, AppError> {
        let code = normalize_game_code(code);
        let detail = require_game(txn, &code).await?;

        let winner_code = input.winner_team_code.trim();
        let winner_id = detail
            .participation_for_team(winner_code)
            .map(|p| p.id)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::WinnerNotParticipant,
                    format!("Team '{winner_code}' does not play in game '{code}'"),
                )
            })?;

        let next = lifecycle::next_state(detail.game.state, LifecycleOp::Finish)
            .map_err(DomainError::from)?;

        let summary = input
            .summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let game = games::update_game(
            txn,
            &code,
            GameUpdate::new(detail.game.id, detail.game.version)
                .with_state(next)
                .with_finished_at(OffsetDateTime::now_utc())
                .with_summary(summary),
        )
        .await?;
        participations::set_winner(txn, game.id, winner_id).await?;
        let participations = participations::find_for_game(txn, game.id).await?;

        info!(game_code = %code, winner = %winner_code, version = game.version, "game=finished");
        Ok(GameDetail {
            game,
            participations,
        })
    }

    /// Remove a game and its participations; returns the pre-delete snapshot.
    pub async fn delete(&self, txn: &DatabaseTransaction, code: &str) -> Result<GameDetail, AppError> {
        let detail = require_game(txn, &normalize_game_code(code)).await?;
        self.delete_loaded(txn, detail).await
    }

    /// Delete a game already read in this transaction. Participations go
    /// first; the game row delete checks the version `detail` carries, so a
    /// stale snapshot fails and the caller's rollback restores them.
    pub async fn delete_loaded(
        &self,
        txn: &DatabaseTransaction,
        detail: GameDetail,
    ) -> Result<GameDetail, AppError> {
        let code = detail.game.code.as_str();
        lifecycle::transition(detail.game.state, LifecycleOp::Delete).map_err(DomainError::from)?;

        let removed = participations::delete_for_game(txn, detail.game.id).await?;
        if removed != detail.participations.len() as u64 {
            warn!(
                game_code = %code,
                removed,
                expected = detail.participations.len(),
                "participation count changed during delete"
            );
        }
        games::delete_game(txn, &detail.game).await?;

        info!(game_code = %code, state = ?detail.game.state, "game=deleted");
        Ok(detail)
    }

    pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<GameDetail, AppError> {
        Ok(require_game(conn, &normalize_game_code(code)).await?)
    }

    /// Games still waiting to start, newest first.
    pub async fn list_recent_created<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Game>, AppError> {
        Ok(games::list_recent_created(conn).await?)
    }

    /// One-based page of all games, newest first. Past the end is empty.
    pub async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        page: i64,
    ) -> Result<Vec<Game>, AppError> {
        if page < 1 {
            return Err(DomainError::validation(
                ValidationKind::InvalidPage,
                format!("Page numbers start at 1, got {page}"),
            )
            .into());
        }
        Ok(games::list_page(conn, page as u64, PAGE_SIZE).await?)
    }
}

fn validate_schedule(scheduled_at: OffsetDateTime, now: OffsetDateTime) -> Result<(), DomainError> {
    if scheduled_at < now + MIN_LEAD_TIME {
        return Err(DomainError::validation(
            ValidationKind::ScheduleTooSoon,
            format!("Game must be scheduled at least one minute ahead, got {scheduled_at}"),
        ));
    }
    Ok(())
}

fn validate_duration(minutes: i32) -> Result<(), DomainError> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(DomainError::validation(
            ValidationKind::InvalidDuration,
            format!(
                "Duration must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes, got {minutes}"
            ),
        ));
    }
    Ok(())
}

async fn require_team<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Team, DomainError> {
    teams::find_by_code(conn, code)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Team, format!("Team '{code}' not found")))
}

async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<GameDetail, DomainError> {
    games::find_by_code(conn, code)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Game, format!("Game '{code}' not found")))
}

/// Pick a code no existing game uses. The unique index stays the final guard
/// against a concurrent insert of the same code.
async fn allocate_code<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<String, DomainError> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let candidate = generate_game_code();
        if games::find_game_by_code(conn, &candidate).await?.is_none() {
            return Ok(candidate);
        }
        debug!(attempt, "game code collision, regenerating");
    }
    Err(DomainError::conflict(
        ConflictKind::GameCodeConflict,
        format!("Could not allocate a unique game code after {MAX_CODE_ATTEMPTS} attempts"),
    ))
}
