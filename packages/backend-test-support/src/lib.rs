//! Shared helpers for the matchday backend tests: quiet logging init,
//! unique fixture strings and problem+json assertions.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
