//! Team lookup. Teams are seeded elsewhere; this layer only resolves them.

use sea_orm::ConnectionTrait;

use crate::adapters::teams_sea as teams_adapter;
use crate::entities::teams;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl From<teams::Model> for Team {
    fn from(model: teams::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
        }
    }
}

pub async fn find_by_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<Team>, DomainError> {
    let team = teams_adapter::find_by_code(conn, code).await?;
    Ok(team.map(Team::from))
}

/// Seed a team (fixtures and local setup).
pub async fn create_team<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
    name: &str,
) -> Result<Team, DomainError> {
    let team = teams_adapter::create_team(conn, code, name).await?;
    Ok(Team::from(team))
}
