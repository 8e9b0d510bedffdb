//! Rank derivation from accumulated experience level
//!
//! Ranks are a fixed ordered table of (name, threshold, color); a user's
//! rank is the highest threshold not above their level. Within a rank,
//! the span up to the next threshold is split into three sub-tiers that
//! progress III → II → I, so III is entered first and I is the top of
//! the rank. Both functions are pure and total for levels ≥ 0.

use serde::Serialize;

/// A named rank tier with its entry threshold and display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub name: &'static str,
    pub threshold: u32,
    pub color: &'static str,
}

/// Sub-tier within a rank. III is entered first; I is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    I,
    II,
    III,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
        }
    }
}

/// Rank ladder, thresholds strictly increasing. Level cap is 100, hence
/// the 101 span sentinel for the final rank.
pub const RANKS: &[Rank] = &[
    Rank { name: "Novice", threshold: 0, color: "#9ca3af" },
    Rank { name: "Apprentice", threshold: 5, color: "#a16207" },
    Rank { name: "Scholar", threshold: 15, color: "#16a34a" },
    Rank { name: "Expert", threshold: 30, color: "#2563eb" },
    Rank { name: "Master", threshold: 50, color: "#9333ea" },
    Rank { name: "Grandmaster", threshold: 75, color: "#dc2626" },
    Rank { name: "Legend", threshold: 100, color: "#f59e0b" },
];

/// Span used for the last rank, which has no successor threshold
const LAST_RANK_SPAN: u32 = 101;

/// Highest-threshold rank whose threshold ≤ level; the lowest rank if
/// level is below every threshold.
pub fn rank_for_level(level: u32) -> &'static Rank {
    RANKS
        .iter()
        .rev()
        .find(|r| r.threshold <= level)
        .unwrap_or(&RANKS[0])
}

/// Sub-tier within `rank` for a given level.
///
/// Ranks spanning ≤ 10 levels have no sub-tiers and always report I.
/// Otherwise the span is divided into integer-floored thirds: the first
/// third is III, the second II, and the remainder I.
pub fn tier_for_level(level: u32, rank: &Rank) -> Tier {
    let next_threshold = RANKS
        .iter()
        .find(|r| r.threshold > rank.threshold)
        .map(|r| r.threshold);
    let span = match next_threshold {
        Some(next) => next - rank.threshold,
        None => LAST_RANK_SPAN,
    };

    if span <= 10 {
        return Tier::I;
    }

    let third = span / 3;
    let offset = level.saturating_sub(rank.threshold);
    if offset < third {
        Tier::III
    } else if offset < third * 2 {
        Tier::II
    } else {
        Tier::I
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_strictly_increasing() {
        for w in RANKS.windows(2) {
            assert!(w[0].threshold < w[1].threshold);
        }
    }

    #[test]
    fn rank_monotonic_in_level() {
        let mut prev = 0;
        for level in 0..=200 {
            let rank = rank_for_level(level);
            assert!(rank.threshold >= prev, "rank regressed at level {level}");
            assert!(rank.threshold <= level || rank.threshold == 0);
            prev = rank.threshold;
        }
    }

    #[test]
    fn rank_boundaries() {
        assert_eq!(rank_for_level(0).name, "Novice");
        assert_eq!(rank_for_level(4).name, "Novice");
        assert_eq!(rank_for_level(5).name, "Apprentice");
        assert_eq!(rank_for_level(99).name, "Grandmaster");
        assert_eq!(rank_for_level(100).name, "Legend");
        assert_eq!(rank_for_level(1000).name, "Legend");
    }

    #[test]
    fn narrow_ranks_have_no_sub_tiers() {
        // Novice (span 5) and Apprentice (span 10) always report I
        for level in 0..15 {
            let rank = rank_for_level(level);
            assert_eq!(tier_for_level(level, rank), Tier::I, "level {level}");
        }
    }

    #[test]
    fn tier_bands_progress_iii_to_i() {
        // Scholar spans 15..30 (span 15, third = 5)
        let rank = rank_for_level(15);
        assert_eq!(rank.name, "Scholar");
        for level in 15..20 {
            assert_eq!(tier_for_level(level, rank), Tier::III);
        }
        for level in 20..25 {
            assert_eq!(tier_for_level(level, rank), Tier::II);
        }
        for level in 25..30 {
            assert_eq!(tier_for_level(level, rank), Tier::I);
        }
    }

    #[test]
    fn tier_bands_partition_every_wide_rank() {
        // Within a rank with span > 10 the tier never moves backwards
        // (III < II < I) as the level climbs.
        fn tier_order(t: Tier) -> u8 {
            match t {
                Tier::III => 0,
                Tier::II => 1,
                Tier::I => 2,
            }
        }
        for (i, rank) in RANKS.iter().enumerate() {
            let next = RANKS.get(i + 1).map(|r| r.threshold);
            let span = next.unwrap_or(rank.threshold + LAST_RANK_SPAN) - rank.threshold;
            if span <= 10 {
                continue;
            }
            let mut prev = 0;
            for level in rank.threshold..rank.threshold + span {
                let order = tier_order(tier_for_level(level, rank));
                assert!(order >= prev, "{} tier regressed at level {level}", rank.name);
                prev = order;
            }
            // All three bands are visited
            assert_eq!(tier_for_level(rank.threshold, rank), Tier::III);
            assert_eq!(tier_for_level(rank.threshold + span - 1, rank), Tier::I);
        }
    }

    #[test]
    fn last_rank_uses_sentinel_span() {
        // Legend has no successor; span 101, third = 33
        let rank = rank_for_level(100);
        assert_eq!(tier_for_level(100, rank), Tier::III);
        assert_eq!(tier_for_level(133, rank), Tier::II);
        assert_eq!(tier_for_level(166, rank), Tier::I);
    }
}
