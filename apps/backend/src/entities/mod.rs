pub mod games;
pub mod participations;
pub mod teams;

pub use games::Entity as Games;
pub use games::Model as Game;
pub use participations::Entity as Participations;
pub use participations::Model as Participation;
pub use teams::Entity as Teams;
pub use teams::Model as Team;
