//! Paid plan tiers and subscription status

use serde::{Deserialize, Serialize};

/// A user's paid tier. Gates quiz/feature access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Premium,
    Ultimate,
}

impl Plan {
    /// String form used in the database and billing metadata
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Ultimate => "ultimate",
        }
    }

    /// Parse from a database/metadata string; unknown values map to Free
    pub fn from_str_or_free(s: &str) -> Self {
        match s {
            "premium" => Self::Premium,
            "ultimate" => Self::Ultimate,
            _ => Self::Free,
        }
    }

    /// Premium privileges: premium and ultimate both qualify
    pub const fn is_premium(&self) -> bool {
        matches!(self, Self::Premium | Self::Ultimate)
    }
}

/// Subscription lifecycle status, driven by billing webhook events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
    Expired,
}

impl SubscriptionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
        }
    }

    /// Parse a provider-supplied status string; unknown values are None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "past_due" => Some(Self::PastDue),
            "canceled" => Some(Self::Canceled),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_parse_defaults_to_free() {
        assert_eq!(Plan::from_str_or_free("ultimate"), Plan::Ultimate);
        assert_eq!(Plan::from_str_or_free("enterprise"), Plan::Free);
    }

    #[test]
    fn ultimate_implies_premium() {
        assert!(Plan::Ultimate.is_premium());
        assert!(Plan::Premium.is_premium());
        assert!(!Plan::Free.is_premium());
    }

    #[test]
    fn status_round_trip() {
        for s in [
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Expired,
        ] {
            assert_eq!(SubscriptionStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(SubscriptionStatus::parse("trialing"), None);
    }
}
