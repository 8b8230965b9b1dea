//! Outbound announcements to the match-execution service.
//!
//! One long-lived `reqwest::Client` is built at startup and shared by every
//! request through `AppState`. Each announcement carries the game code as
//! its `Idempotency-Key`, so a repeated Start for the same game is
//! deduplicated by the remote side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::match_service::MatchServiceConfig;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ExternalKind};
use crate::repos::games::GameDetail;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncedParticipant {
    pub team_code: String,
    pub team_id: i64,
}

/// Body of `POST {base}/matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAnnouncement {
    pub game_code: String,
    pub participants: Vec<AnnouncedParticipant>,
    #[serde(with = "time::serde::rfc3339")]
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: i32,
}

impl StartAnnouncement {
    /// Participants keep the game's participation order (home first).
    pub fn for_game(detail: &GameDetail) -> Self {
        Self {
            game_code: detail.game.code.clone(),
            participants: detail
                .participations
                .iter()
                .map(|p| AnnouncedParticipant {
                    team_code: p.team_code.clone(),
                    team_id: p.team_id,
                })
                .collect(),
            scheduled_at: detail.game.scheduled_at,
            duration_minutes: detail.game.duration_minutes,
        }
    }

    pub fn idempotency_key(&self) -> &str {
        &self.game_code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("match service rejected the announcement with status {status}")]
    Rejected { status: u16 },
    #[error("match service did not answer in time")]
    Timeout,
    #[error("match service unreachable: {0}")]
    Transport(String),
}

impl NotifyError {
    /// Failures worth another attempt: the remote may not have seen the request.
    pub fn is_transient(&self) -> bool {
        match self {
            NotifyError::Rejected { status } => *status >= 500 || *status == 429,
            NotifyError::Timeout | NotifyError::Transport(_) => true,
        }
    }

    pub fn into_domain(self, game_code: &str) -> DomainError {
        let kind = match self {
            NotifyError::Rejected { .. } => ExternalKind::MatchServiceRejected,
            NotifyError::Timeout => ExternalKind::Timeout,
            NotifyError::Transport(_) => ExternalKind::Unavailable,
        };
        DomainError::external(kind, format!("Start of game '{game_code}' not accepted: {self}"))
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NotifyError::Timeout
        } else if let Some(status) = e.status() {
            NotifyError::Rejected {
                status: status.as_u16(),
            }
        } else {
            NotifyError::Transport(e.to_string())
        }
    }
}

#[async_trait]
pub trait MatchNotifier: Send + Sync {
    /// Succeeds only once the remote has durably accepted the game.
    async fn announce_start(&self, announcement: &StartAnnouncement) -> Result<(), NotifyError>;
}

/// HTTP client for the match-execution service.
pub struct HttpMatchNotifier {
    client: reqwest::Client,
    config: MatchServiceConfig,
}

impl HttpMatchNotifier {
    pub fn new(config: MatchServiceConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build match service client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &MatchServiceConfig {
        &self.config
    }

    /// Longest an announcement may take with every retry used.
    pub fn total_budget(&self) -> Duration {
        let attempts = self.config.max_attempts.max(1);
        self.config.timeout * attempts + self.config.retry_interval * (attempts - 1)
    }

    async fn post_once(&self, announcement: &StartAnnouncement) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(self.config.matches_url())
            .header(IDEMPOTENCY_KEY_HEADER, announcement.idempotency_key())
            .json(announcement)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl MatchNotifier for HttpMatchNotifier {
    async fn announce_start(&self, announcement: &StartAnnouncement) -> Result<(), NotifyError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.post_once(announcement).await {
                Ok(()) => {
                    info!(
                        game_code = %announcement.game_code,
                        attempt,
                        "match_service=announced"
                    );
                    return Ok(());
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    warn!(
                        game_code = %announcement.game_code,
                        attempt,
                        max_attempts,
                        error = %e,
                        "match_service=retry"
                    );
                    tokio::time::sleep(self.config.retry_interval).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        game_code = %announcement.game_code,
                        attempt,
                        error = %e,
                        "match_service=failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// Used when no match service is configured: every Start fails cleanly.
pub struct DisabledNotifier;

#[async_trait]
impl MatchNotifier for DisabledNotifier {
    async fn announce_start(&self, announcement: &StartAnnouncement) -> Result<(), NotifyError> {
        debug!(game_code = %announcement.game_code, "match_service=disabled");
        Err(NotifyError::Transport(
            "match service is not configured".to_string(),
        ))
    }
}

pub fn disabled() -> Arc<dyn MatchNotifier> {
    Arc::new(DisabledNotifier)
}
