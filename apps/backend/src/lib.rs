#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;
pub mod utils;

// Re-exports for public API
pub use config::db::{db_url, DbKind, DbOwner, DbProfile, RuntimeEnv};
pub use config::match_service::MatchServiceConfig;
pub use db::txn::with_txn;
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use infra::state::build_state;
pub use middleware::{RequestTrace, StructuredLogger, TraceSpan};
pub use services::games::GameLifecycleService;
pub use services::match_notifier::{MatchNotifier, NotifyError, StartAnnouncement};
pub use state::app_state::AppState;
