//! Shared types for the quiz platform
//!
//! Domain types and pure logic used by both quiz-cloud (server) and
//! quiz-client: plans, subscription state, game-mode metadata, rank
//! derivation, the access policy, and the unified error system.

pub mod access;
pub mod error;
pub mod game_mode;
pub mod plan;
pub mod rank;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use access::{access_denied_message, can_access};
pub use game_mode::{GameMode, ScoreOrdering};
pub use plan::{Plan, SubscriptionStatus};
pub use rank::{Rank, Tier, rank_for_level, tier_for_level};
