//! Failures render as problem+json with a trace id in header and body.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use matchday::error::AppError;
use matchday::services::match_notifier::NotifyError;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::support::app_builder::create_test_app;
use crate::support::factory::{create_game, seed_teams};
use crate::support::notifiers::RecordingNotifier;
use crate::support::test_state::state_with_notifier;

#[actix_web::test]
async fn unknown_game_is_problem_json_404() -> Result<(), AppError> {
    let state = state_with_notifier(Arc::new(RecordingNotifier::new())).await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/games/QQQQQQQQQQ/start")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let problem = assert_problem_details_from_service_response(
        resp,
        "GAME_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("QQQQQQQQQQ"),
    )
    .await;
    assert_eq!(problem.title, "Game Not Found");
    assert_eq!(problem.type_, "https://matchday.dev/errors/GAME_NOT_FOUND");
    assert_ne!(problem.trace_id, "unknown");
    Ok(())
}

#[actix_web::test]
async fn schedule_too_soon_is_400() -> Result<(), AppError> {
    let state = state_with_notifier(Arc::new(RecordingNotifier::new())).await?;
    let (red, blu) = seed_teams(&state).await?;
    let app = create_test_app(state).await;

    let soon = (OffsetDateTime::now_utc() + Duration::seconds(10))
        .format(&Rfc3339)
        .unwrap();
    let req = test::TestRequest::post()
        .uri("/api/games")
        .set_json(json!({
            "scheduledAt": soon,
            "homeTeamCode": red.code,
            "awayTeamCode": blu.code,
            "durationMinutes": 60
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "SCHEDULE_TOO_SOON",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn malformed_body_is_bad_request() -> Result<(), AppError> {
    let state = state_with_notifier(Arc::new(RecordingNotifier::new())).await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/games")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"scheduledAt": "tomorrow-ish", "homeTeamCode": 1}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        Some("Invalid JSON"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn non_numeric_page_is_bad_request() -> Result<(), AppError> {
    let state = state_with_notifier(Arc::new(RecordingNotifier::new())).await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/api/games/page/two").to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "BAD_REQUEST",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn finish_before_start_is_409() -> Result<(), AppError> {
    let state = state_with_notifier(Arc::new(RecordingNotifier::new())).await?;
    let (red, blu) = seed_teams(&state).await?;
    let created = create_game(&state, &red, &blu).await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{}/finish", created.game.code))
        .set_json(json!({ "winnerTeamCode": red.code }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "INVALID_TRANSITION",
        StatusCode::CONFLICT,
        Some("state Created"),
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn match_service_outage_is_502_and_game_stays_created() -> Result<(), AppError> {
    let notifier = Arc::new(RecordingNotifier::failing_first(vec![NotifyError::Rejected {
        status: 503,
    }]));
    let state = state_with_notifier(notifier).await?;
    let (red, blu) = seed_teams(&state).await?;
    let created = create_game(&state, &red, &blu).await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/games/{}/start", created.game.code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "MATCH_SERVICE_REJECTED",
        StatusCode::BAD_GATEWAY,
        Some(&created.game.code),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{}", created.game.code))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["state"], "CREATED");
    Ok(())
}
