#![allow(dead_code)]

pub mod app_builder;
pub mod factory;
pub mod notifiers;
pub mod test_state;
