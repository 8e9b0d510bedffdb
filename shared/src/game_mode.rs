//! Game-mode metadata for the competitive leaderboards
//!
//! Only a fixed allow-list of modes is persisted. Speed-rush submissions
//! arrive under the raw `speedrush` mode plus a time limit in the details
//! payload and are remapped to a duration-specific variant so each
//! duration gets its own leaderboard.

use serde::{Deserialize, Serialize};

/// Which direction "better" points for a mode's scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrdering {
    /// Larger score wins (streak length, questions answered)
    HigherIsBetter,
    /// Smaller score wins (completion time in seconds)
    LowerIsBetter,
}

/// A leaderboard-eligible game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Streak,
    Timed,
    Speedrush30s,
    Speedrush1m,
    Speedrush5m,
    Speedrush10m,
}

impl GameMode {
    /// Leaderboard key string, also the wire form
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Streak => "streak",
            Self::Timed => "timed",
            Self::Speedrush30s => "speedrush_30s",
            Self::Speedrush1m => "speedrush_1m",
            Self::Speedrush5m => "speedrush_5m",
            Self::Speedrush10m => "speedrush_10m",
        }
    }

    /// Parse an already-normalized mode key
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "streak" => Some(Self::Streak),
            "timed" => Some(Self::Timed),
            "speedrush_30s" => Some(Self::Speedrush30s),
            "speedrush_1m" => Some(Self::Speedrush1m),
            "speedrush_5m" => Some(Self::Speedrush5m),
            "speedrush_10m" => Some(Self::Speedrush10m),
            _ => None,
        }
    }

    /// Score comparison direction for this mode.
    ///
    /// Timed mode records a completion time, so lower is better; every
    /// other mode counts upward.
    pub const fn ordering(&self) -> ScoreOrdering {
        match self {
            Self::Timed => ScoreOrdering::LowerIsBetter,
            _ => ScoreOrdering::HigherIsBetter,
        }
    }

    /// Normalize a raw submitted mode into a leaderboard-eligible mode.
    ///
    /// `speedrush` with a recognized `time_limit` (seconds) in the details
    /// payload maps to its duration variant. Any other time limit, and any
    /// mode outside the allow-list, yields None.
    pub fn normalize(raw_mode: &str, details: Option<&serde_json::Value>) -> Option<Self> {
        if raw_mode == "speedrush" {
            let time_limit = details.and_then(|d| d.get("time_limit")).and_then(|v| v.as_i64());
            return match time_limit {
                Some(30) => Some(Self::Speedrush30s),
                Some(60) => Some(Self::Speedrush1m),
                Some(300) => Some(Self::Speedrush5m),
                Some(600) => Some(Self::Speedrush10m),
                _ => None,
            };
        }
        Self::parse(raw_mode)
    }
}

/// Format a timed-mode score (seconds) as `M:SS` for display
pub fn format_timed_score(seconds: i64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
