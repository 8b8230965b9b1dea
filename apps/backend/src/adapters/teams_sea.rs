//! SeaORM adapter for teams. Read-only apart from the seeding insert.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::entities::teams;

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<teams::Model>, sea_orm::DbErr> {
    teams::Entity::find()
        .filter(teams::Column::Code.eq(code))
        .one(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    team_id: i64,
) -> Result<Option<teams::Model>, sea_orm::DbErr> {
    teams::Entity::find_by_id(team_id).one(conn).await
}

/// Insert a team. Teams are owned elsewhere; this exists for seeding.
pub async fn create_team<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
    name: &str,
) -> Result<teams::Model, sea_orm::DbErr> {
    teams::ActiveModel {
        id: NotSet,
        code: Set(code.to_string()),
        name: Set(name.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}
