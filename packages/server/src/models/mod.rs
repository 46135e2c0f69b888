pub mod auth;
pub mod quest;
pub mod shared;
pub mod tournament;
