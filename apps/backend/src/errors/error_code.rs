//! Error codes for the matchday backend API.
//!
//! Every code that can appear in a problem+json body is listed here.
//! Add new codes here; never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes. Each variant maps to the SCREAMING_SNAKE_CASE
/// string that appears in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Scheduled start is less than one minute away
    ScheduleTooSoon,
    /// Duration outside the accepted range
    InvalidDuration,
    /// Home and away team are the same
    SameTeam,
    /// Winner code does not match a participant
    WinnerNotParticipant,
    /// Page number below 1
    InvalidPage,
    /// General validation error
    ValidationError,
    /// Malformed request (bad JSON, bad path)
    BadRequest,

    // Resource Not Found
    GameNotFound,
    TeamNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Lifecycle operation not allowed in the current state
    InvalidTransition,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generated game code already taken
    GameCodeConflict,
    ParticipationConflict,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // External Services
    /// Match-execution service answered with a failure
    MatchServiceRejected,
    /// Match-execution service did not answer in time
    MatchServiceTimeout,
    /// Match-execution service unreachable
    MatchServiceUnavailable,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    Internal,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ScheduleTooSoon => "SCHEDULE_TOO_SOON",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::SameTeam => "SAME_TEAM",
            Self::WinnerNotParticipant => "WINNER_NOT_PARTICIPANT",
            Self::InvalidPage => "INVALID_PAGE",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::TeamNotFound => "TEAM_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::GameCodeConflict => "GAME_CODE_CONFLICT",
            Self::ParticipationConflict => "PARTICIPATION_CONFLICT",
            Self::Conflict => "CONFLICT",

            Self::MatchServiceRejected => "MATCH_SERVICE_REJECTED",
            Self::MatchServiceTimeout => "MATCH_SERVICE_TIMEOUT",
            Self::MatchServiceUnavailable => "MATCH_SERVICE_UNAVAILABLE",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
