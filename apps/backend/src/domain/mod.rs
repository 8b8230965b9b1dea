//! Domain layer: pure lifecycle rules, no I/O.

pub mod lifecycle;
