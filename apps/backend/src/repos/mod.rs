//! Repository functions for the domain layer.

pub mod games;
pub mod participations;
pub mod teams;
