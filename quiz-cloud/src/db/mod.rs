//! Database access layer

pub mod leaderboard;
pub mod players;
pub mod subscriptions;
