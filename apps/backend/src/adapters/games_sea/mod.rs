//! SeaORM adapter for games - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::games::{self, GameState};

pub mod dto;

pub use dto::{GameCreate, GameUpdate};

fn lock_conflict(expected: i32, actual: i32) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!(
        "OPTIMISTIC_LOCK:{{\"expected\":{expected},\"actual\":{actual}}}"
    ))
}

/// Zero rows matched `(id, version)`: tell a stale version from a vanished row.
async fn explain_missed_row<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    expected_version: i32,
) -> sea_orm::DbErr {
    match games::Entity::find_by_id(id).one(conn).await {
        Ok(Some(game)) => lock_conflict(expected_version, game.version),
        Ok(None) => sea_orm::DbErr::RecordNotFound(format!("Game {id} not found")),
        Err(e) => e,
    }
}

/// Apply an optimistic update with version check, then refetch.
///
/// Adds the version increment and `updated_at`, filters by id and the
/// expected version. The caller configures entity-specific columns.
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: i64,
    expected_version: i32,
    configure_update: F,
) -> Result<games::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<games::Entity>) -> sea_orm::UpdateMany<games::Entity>,
{
    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(games::Entity::update_many())
        .col_expr(games::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            games::Column::Version,
            Expr::col(games::Column::Version).add(1),
        )
        .filter(games::Column::Id.eq(id))
        .filter(games::Column::Version.eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(explain_missed_row(conn, id, expected_version).await);
    }

    games::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("Game {id} not found")))
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::Code.eq(code))
        .one(conn)
        .await
}

pub async fn create_game(
    txn: &DatabaseTransaction,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        code: Set(dto.code),
        scheduled_at: Set(dto.scheduled_at),
        duration_minutes: Set(dto.duration_minutes),
        state: Set(GameState::Created),
        started_at: Set(None),
        finished_at: Set(None),
        summary: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        version: Set(1),
    };

    game_active.insert(txn).await
}

pub async fn update_game(
    txn: &DatabaseTransaction,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(txn, dto.id, dto.expected_version, |mut update| {
        if let Some(state) = dto.state {
            update = update.col_expr(games::Column::State, Expr::val(state).into());
        }
        if let Some(at) = dto.started_at {
            update = update.col_expr(games::Column::StartedAt, Expr::val(Some(at)).into());
        }
        if let Some(at) = dto.finished_at {
            update = update.col_expr(games::Column::FinishedAt, Expr::val(Some(at)).into());
        }
        if let Some(summary) = dto.summary {
            update = update.col_expr(games::Column::Summary, Expr::val(summary).into());
        }
        update
    })
    .await
}

/// Delete a game, guarded by its version.
pub async fn delete_game(
    txn: &DatabaseTransaction,
    id: i64,
    expected_version: i32,
) -> Result<(), sea_orm::DbErr> {
    let result = games::Entity::delete_many()
        .filter(games::Column::Id.eq(id))
        .filter(games::Column::Version.eq(expected_version))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(explain_missed_row(txn, id, expected_version).await);
    }
    Ok(())
}

/// Games in `state`, newest first.
pub async fn list_by_state<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    state: GameState,
) -> Result<Vec<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::State.eq(state))
        .order_by_desc(games::Column::Id)
        .all(conn)
        .await
}

/// Zero-based page of all games, newest first. An offset no database row
/// count can reach (beyond `i64::MAX`) is past the end, so it is empty.
pub async fn list_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page_index: u64,
    page_size: u64,
) -> Result<Vec<games::Model>, sea_orm::DbErr> {
    let Some(offset) = page_index
        .checked_mul(page_size)
        .filter(|offset| i64::try_from(*offset).is_ok())
    else {
        return Ok(Vec::new());
    };
    games::Entity::find()
        .order_by_desc(games::Column::Id)
        .offset(offset)
        .limit(page_size)
        .all(conn)
        .await
}
