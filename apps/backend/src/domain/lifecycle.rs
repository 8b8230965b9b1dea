//! Game lifecycle state machine.
//!
//! Every legal `(state, operation)` pair is declared once in [`TRANSITIONS`];
//! anything not listed is rejected.

use std::fmt;

use thiserror::Error;

use crate::entities::games::GameState;
use crate::errors::domain::{ConflictKind, DomainError};

/// Lifecycle operations that act on an existing game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleOp {
    Start,
    Finish,
    Delete,
}

impl fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleOp::Start => "start",
            LifecycleOp::Finish => "finish",
            LifecycleOp::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// What an accepted operation does to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moves(GameState),
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {op} a game in state {from:?}")]
pub struct TransitionRejected {
    pub from: GameState,
    pub op: LifecycleOp,
}

impl From<TransitionRejected> for DomainError {
    fn from(r: TransitionRejected) -> Self {
        DomainError::conflict(ConflictKind::InvalidTransition, r.to_string())
    }
}

pub const TRANSITIONS: &[(GameState, LifecycleOp, Outcome)] = &[
    (
        GameState::Created,
        LifecycleOp::Start,
        Outcome::Moves(GameState::Going),
    ),
    (
        GameState::Going,
        LifecycleOp::Finish,
        Outcome::Moves(GameState::Finished),
    ),
    (GameState::Created, LifecycleOp::Delete, Outcome::Removed),
    (GameState::Going, LifecycleOp::Delete, Outcome::Removed),
    (GameState::Finished, LifecycleOp::Delete, Outcome::Removed),
];

/// State every new game starts in.
pub fn initial_state() -> GameState {
    GameState::Created
}

pub fn transition(from: GameState, op: LifecycleOp) -> Result<Outcome, TransitionRejected> {
    TRANSITIONS
        .iter()
        .find(|(state, candidate, _)| *state == from && *candidate == op)
        .map(|(_, _, outcome)| *outcome)
        .ok_or(TransitionRejected { from, op })
}

/// Like [`transition`] but for operations that must land in a new state.
pub fn next_state(from: GameState, op: LifecycleOp) -> Result<GameState, TransitionRejected> {
    match transition(from, op)? {
        Outcome::Moves(to) => Ok(to),
        Outcome::Removed => Err(TransitionRejected { from, op }),
    }
}
