//! Authentication for the player-facing API

pub mod player_auth;

pub use player_auth::{PlayerIdentity, player_auth_middleware};
