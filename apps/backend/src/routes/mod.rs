use actix_web::web;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod games;
pub mod health;

/// Register every route. Shared by `main.rs` and the test app builder.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // non-numeric page numbers and similar path errors answer problem+json too
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, err.to_string()).into()
    }));

    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Game lifecycle: /api/games/**
    cfg.service(web::scope("/api/games").configure(games::configure_routes));
}
