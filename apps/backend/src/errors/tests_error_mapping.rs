// Domain → AppError mapping, no HTTP server or database involved
use actix_web::http::StatusCode;
use actix_web::ResponseError;
use backend_test_support::problem_details::assert_problem_details_from_http_response;

use crate::errors::domain::{
    ConflictKind, DomainError, ExternalKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::trace_ctx;
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let de = DomainError::validation(ValidationKind::ScheduleTooSoon, "too soon");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::ScheduleTooSoon);
    assert_eq!(app.status().as_u16(), 400);

    let winner = DomainError::validation(ValidationKind::WinnerNotParticipant, "GRN");
    let app: AppError = winner.into();
    assert_eq!(app.code().as_str(), "WINNER_NOT_PARTICIPANT");

    let other = DomainError::validation(ValidationKind::Other("x".into()), "x");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_conflicts() {
    let transition = DomainError::conflict(ConflictKind::InvalidTransition, "finished");
    let app: AppError = transition.into();
    assert_eq!(app.code().as_str(), "INVALID_TRANSITION");
    assert_eq!(app.status().as_u16(), 409);

    let lock = DomainError::conflict(ConflictKind::OptimisticLock, "stale");
    let app: AppError = lock.into();
    assert_eq!(app.code().as_str(), "OPTIMISTIC_LOCK");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::Other("x".to_string()), "generic");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let game = DomainError::not_found(NotFoundKind::Game, "no game");
    let app: AppError = game.into();
    assert_eq!(app.code().as_str(), "GAME_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let team = DomainError::not_found(NotFoundKind::Team, "Team 'RED' not found");
    let app: AppError = team.into();
    assert_eq!(app.code().as_str(), "TEAM_NOT_FOUND");
    assert_eq!(app.detail(), "Team 'RED' not found");
}

#[test]
fn maps_external() {
    let timeout = DomainError::external(ExternalKind::Timeout, "slow");
    let app: AppError = timeout.into();
    assert_eq!(app.code(), ErrorCode::MatchServiceTimeout);
    assert_eq!(app.status(), StatusCode::GATEWAY_TIMEOUT);

    let rejected = DomainError::external(ExternalKind::MatchServiceRejected, "500");
    let app: AppError = rejected.into();
    assert_eq!(app.code(), ErrorCode::MatchServiceRejected);
    assert_eq!(app.status(), StatusCode::BAD_GATEWAY);

    let down = DomainError::external(ExternalKind::Unavailable, "refused");
    let app: AppError = down.into();
    assert_eq!(app.code(), ErrorCode::MatchServiceUnavailable);
    assert_eq!(app.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn maps_infra() {
    let t = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    let app: AppError = t.into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let down = DomainError::infra(InfraErrorKind::DbUnavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let other = DomainError::infra(InfraErrorKind::Other("x".into()), "boom");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::DbError);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn humanized_title() {
    assert_eq!(
        AppError::humanize_code("MATCH_SERVICE_TIMEOUT"),
        "Match Service Timeout"
    );
}

#[tokio::test]
async fn problem_details_carry_trace_id() {
    let resp = trace_ctx::with_trace_id("trace-abc".to_string(), async {
        AppError::not_found(ErrorCode::GameNotFound, "Game 'X' not found").error_response()
    })
    .await;

    let problem = assert_problem_details_from_http_response(
        resp,
        "GAME_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("'X'"),
    )
    .await;
    assert_eq!(problem.trace_id, "trace-abc");
    assert_eq!(problem.title, "Game Not Found");
    assert_eq!(problem.type_, "https://matchday.dev/errors/GAME_NOT_FOUND");
}
