//! DTOs for games_sea adapter.

use time::OffsetDateTime;

use crate::entities::games::GameState;

/// DTO for inserting a new game. State and version take their initial values.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub code: String,
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
}

impl GameCreate {
    pub fn new(
        code: impl Into<String>,
        scheduled_at: OffsetDateTime,
        duration_minutes: i32,
    ) -> Self {
        Self {
            code: code.into(),
            scheduled_at,
            duration_minutes,
        }
    }
}

/// Update of game fields guarded by optimistic locking.
///
/// Any combination of fields is applied atomically with a single version
/// increment; the row must still carry `expected_version`.
#[derive(Debug, Clone)]
pub struct GameUpdate {
    pub id: i64,
    pub expected_version: i32,
    pub state: Option<GameState>,
    pub started_at: Option<OffsetDateTime>,
    pub finished_at: Option<OffsetDateTime>,
    /// Three-state: None = no change, Some(Some(s)) = set, Some(None) = clear.
    pub summary: Option<Option<String>>,
}

impl GameUpdate {
    pub fn new(id: i64, expected_version: i32) -> Self {
        Self {
            id,
            expected_version,
            state: None,
            started_at: None,
            finished_at: None,
            summary: None,
        }
    }

    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_started_at(mut self, at: OffsetDateTime) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn with_finished_at(mut self, at: OffsetDateTime) -> Self {
        self.finished_at = Some(at);
        self
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = Some(summary);
        self
    }
}
