//! Game lifecycle HTTP routes, mounted under `/api/games`.

use actix_web::http::header::LOCATION;
use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::games::GameState;
use crate::error::AppError;
use crate::extractors::validated_json::ValidatedJson;
use crate::repos::games::{Game, GameDetail};
use crate::repos::participations::Participation;
use crate::services::games::{CreateGame, FinishGame, GameLifecycleService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub home_team_code: String,
    pub away_team_code: String,
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishGameRequest {
    pub winner_team_code: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// List entry: the game row without participations.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummaryResponse {
    pub code: String,
    pub state: GameState,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
    pub version: i32,
}

impl From<Game> for GameSummaryResponse {
    fn from(game: Game) -> Self {
        Self {
            code: game.code,
            state: game.state,
            scheduled_at: game.scheduled_at,
            duration_minutes: game.duration_minutes,
            version: game.version,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationResponse {
    pub team_code: String,
    pub team_id: i64,
    pub is_winner: bool,
}

impl From<Participation> for ParticipationResponse {
    fn from(p: Participation) -> Self {
        Self {
            team_code: p.team_code,
            team_id: p.team_id,
            is_winner: p.is_winner,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailResponse {
    pub code: String,
    pub state: GameState,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
    pub summary: Option<String>,
    pub version: i32,
    /// Home team first.
    pub participations: Vec<ParticipationResponse>,
}

impl From<GameDetail> for GameDetailResponse {
    fn from(detail: GameDetail) -> Self {
        let GameDetail {
            game,
            participations,
        } = detail;
        Self {
            code: game.code,
            state: game.state,
            scheduled_at: game.scheduled_at,
            duration_minutes: game.duration_minutes,
            started_at: game.started_at,
            finished_at: game.finished_at,
            summary: game.summary,
            version: game.version,
            participations: participations.into_iter().map(Into::into).collect(),
        }
    }
}

/// GET /api/games
///
/// Games that have not started yet, newest first.
async fn list_recent_created(
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<GameSummaryResponse>>, AppError> {
    let db = require_db(&app_state)?;
    let service = GameLifecycleService::from_state(&app_state);
    let games = service.list_recent_created(db).await?;
    Ok(web::Json(games.into_iter().map(Into::into).collect()))
}

/// GET /api/games/page/{page}
async fn list_page(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<Vec<GameSummaryResponse>>, AppError> {
    let page = path.into_inner();
    let db = require_db(&app_state)?;
    let service = GameLifecycleService::from_state(&app_state);
    let games = service.list_page(db, page).await?;
    Ok(web::Json(games.into_iter().map(Into::into).collect()))
}

/// GET /api/games/{code}
async fn get_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<GameDetailResponse>, AppError> {
    let code = path.into_inner();
    let db = require_db(&app_state)?;
    let service = GameLifecycleService::from_state(&app_state);
    let detail = service.find_by_code(db, &code).await?;
    Ok(web::Json(detail.into()))
}

/// POST /api/games
///
/// Schedules a game between two existing teams. Answers 201 with the new game
/// and a `Location` pointing at it.
async fn create_game(
    body: ValidatedJson<CreateGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let input = CreateGame {
        scheduled_at: req.scheduled_at,
        home_team_code: req.home_team_code,
        away_team_code: req.away_team_code,
        duration_minutes: req.duration_minutes,
    };
    let service = GameLifecycleService::from_state(&app_state);

    let detail = with_txn(&app_state, |txn| {
        Box::pin(async move { service.create(txn, input).await })
    })
    .await?;

    let location = format!("/api/games/{}", detail.game.code);
    Ok(HttpResponse::Created()
        .insert_header((LOCATION, location))
        .json(GameDetailResponse::from(detail)))
}

/// POST /api/games/{code}/start
///
/// Commits only after the match service accepted the game. On a 502/504 the
/// game is still `CREATED` and the request can be repeated.
async fn start_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<GameDetailResponse>, AppError> {
    let code = path.into_inner();
    let service = GameLifecycleService::from_state(&app_state);

    let detail = with_txn(&app_state, |txn| {
        Box::pin(async move { service.start(txn, &code).await })
    })
    .await?;

    Ok(web::Json(detail.into()))
}

/// POST /api/games/{code}/finish
async fn finish_game(
    path: web::Path<String>,
    body: ValidatedJson<FinishGameRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<GameDetailResponse>, AppError> {
    let code = path.into_inner();
    let req = body.into_inner();
    let input = FinishGame {
        winner_team_code: req.winner_team_code,
        summary: req.summary,
    };
    let service = GameLifecycleService::from_state(&app_state);

    let detail = with_txn(&app_state, |txn| {
        Box::pin(async move { service.finish(txn, &code, input).await })
    })
    .await?;

    Ok(web::Json(detail.into()))
}

/// DELETE /api/games/{code}
///
/// Returns the game as it was just before removal.
async fn delete_game(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<GameDetailResponse>, AppError> {
    let code = path.into_inner();
    let service = GameLifecycleService::from_state(&app_state);

    let snapshot = with_txn(&app_state, |txn| {
        Box::pin(async move { service.delete(txn, &code).await })
    })
    .await?;

    Ok(web::Json(snapshot.into()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_recent_created))
            .route(web::post().to(create_game)),
    );
    cfg.service(web::resource("/page/{page}").route(web::get().to(list_page)));
    cfg.service(
        web::resource("/{code}")
            .route(web::get().to(get_game))
            .route(web::delete().to(delete_game)),
    );
    cfg.service(web::resource("/{code}/start").route(web::post().to(start_game)));
    cfg.service(web::resource("/{code}/finish").route(web::post().to(finish_game)));
}
