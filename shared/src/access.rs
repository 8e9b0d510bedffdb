//! Static access policy: which quizzes/features each plan may enter
//!
//! Loaded once as immutable module data. Evaluation is pure; the caller
//! supplies the live plan (read from the subscription store).

use crate::plan::Plan;

/// Plan requirements for a feature/quiz id
#[derive(Debug, Clone, Copy)]
struct FeatureGate {
    feature: &'static str,
    requires_premium: bool,
    requires_ultimate: bool,
}

/// Policy table. Features not listed here are unrestricted.
const GATES: &[FeatureGate] = &[
    FeatureGate { feature: "flags", requires_premium: false, requires_ultimate: false },
    FeatureGate { feature: "capitals", requires_premium: false, requires_ultimate: false },
    FeatureGate { feature: "streak", requires_premium: false, requires_ultimate: false },
    FeatureGate { feature: "timed", requires_premium: true, requires_ultimate: false },
    FeatureGate { feature: "speedrush", requires_premium: true, requires_ultimate: false },
    FeatureGate { feature: "marathon", requires_premium: true, requires_ultimate: false },
    FeatureGate { feature: "exclusive", requires_premium: true, requires_ultimate: true },
];

const ULTIMATE_MESSAGE: &str = "This quiz is reserved for Ultimate members. Upgrade to Ultimate to play it.";
const PREMIUM_MESSAGE: &str = "This quiz requires a Premium membership. Upgrade to unlock it.";

fn gate_for(feature: &str) -> Option<&'static FeatureGate> {
    GATES.iter().find(|g| g.feature == feature)
}

/// Whether `plan` may enter `feature`. Ultimate implies premium
/// privileges; unlisted features are open to everyone.
pub fn can_access(feature: &str, plan: Plan) -> bool {
    let Some(gate) = gate_for(feature) else {
        return true;
    };
    if gate.requires_ultimate && plan != Plan::Ultimate {
        return false;
    }
    if gate.requires_premium && plan == Plan::Free {
        return false;
    }
    true
}

/// Explanatory message shown on denial. The ultimate message takes
/// priority over the premium one; None when the feature is unrestricted.
pub fn access_denied_message(feature: &str) -> Option<&'static str> {
    let gate = gate_for(feature)?;
    if gate.requires_ultimate {
        Some(ULTIMATE_MESSAGE)
    } else if gate.requires_premium {
        Some(PREMIUM_MESSAGE)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ultimate_gate_blocks_premium() {
        assert!(!can_access("exclusive", Plan::Premium));
        assert!(can_access("exclusive", Plan::Ultimate));
        assert!(!can_access("exclusive", Plan::Free));
    }

    #[test]
    fn free_features_open_to_all() {
        assert!(can_access("flags", Plan::Free));
        assert!(can_access("capitals", Plan::Free));
    }

    #[test]
    fn premium_gate_admits_ultimate() {
        assert!(!can_access("marathon", Plan::Free));
        assert!(can_access("marathon", Plan::Premium));
        assert!(can_access("marathon", Plan::Ultimate));
    }

    #[test]
    fn unlisted_features_unrestricted() {
        assert!(can_access("daily_challenge", Plan::Free));
        assert_eq!(access_denied_message("daily_challenge"), None);
    }

    #[test]
    fn denial_message_priority() {
        assert_eq!(access_denied_message("exclusive"), Some(ULTIMATE_MESSAGE));
        assert_eq!(access_denied_message("marathon"), Some(PREMIUM_MESSAGE));
        assert_eq!(access_denied_message("flags"), None);
    }
}
