//! SeaORM adapters. Functions return `DbErr`; repos map to `DomainError`.

pub mod games_sea;
pub mod participations_sea;
pub mod teams_sea;
