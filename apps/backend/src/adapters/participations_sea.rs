//! SeaORM adapter for participations.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{participations, teams};

pub async fn create_participation(
    txn: &DatabaseTransaction,
    game_id: i64,
    team_id: i64,
) -> Result<participations::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    participations::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        team_id: Set(team_id),
        is_winner: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
}

/// Participations of a game joined with their team, in insertion order.
pub async fn find_with_teams<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<(participations::Model, Option<teams::Model>)>, sea_orm::DbErr> {
    participations::Entity::find()
        .filter(participations::Column::GameId.eq(game_id))
        .find_also_related(teams::Entity)
        .order_by_asc(participations::Column::Id)
        .all(conn)
        .await
}

/// Returns the number of rows removed.
pub async fn delete_by_game(
    txn: &DatabaseTransaction,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = participations::Entity::delete_many()
        .filter(participations::Column::GameId.eq(game_id))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

/// Flag `participation_id` as the winner of `game_id` and clear every other flag.
pub async fn set_winner(
    txn: &DatabaseTransaction,
    game_id: i64,
    participation_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    participations::Entity::update_many()
        .col_expr(participations::Column::IsWinner, Expr::val(false).into())
        .col_expr(participations::Column::UpdatedAt, Expr::val(now).into())
        .filter(participations::Column::GameId.eq(game_id))
        .filter(participations::Column::Id.ne(participation_id))
        .exec(txn)
        .await?;

    let result = participations::Entity::update_many()
        .col_expr(participations::Column::IsWinner, Expr::val(true).into())
        .col_expr(participations::Column::UpdatedAt, Expr::val(now).into())
        .filter(participations::Column::GameId.eq(game_id))
        .filter(participations::Column::Id.eq(participation_id))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound(format!(
            "Participation {participation_id} not found in game {game_id}"
        )));
    }
    Ok(())
}
