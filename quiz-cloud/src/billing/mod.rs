//! Billing provider integration
//!
//! Webhook signature verification (HMAC-SHA256 over `"{t}.{raw_body}"`)
//! and parsing of the provider's event JSON into a closed set of
//! [`BillingEvent`] variants. Anything the synchronizer does not handle
//! parses to `Ignored`; authentic events missing required fields parse
//! to `Malformed` and are dropped by the webhook handler.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use shared::plan::{Plan, SubscriptionStatus};

/// Grace period granted by a checkout event when the provider supplies
/// no period bounds.
pub const DEFAULT_PERIOD_DAYS: i64 = 30;

/// Verify a webhook signature header (HMAC-SHA256)
///
/// Header format: `t=<unix seconds>,v1=<hex hmac>`, signed over
/// `"{t}.{raw_body}"`. Events older than 5 minutes are rejected to
/// prevent replay.
pub fn verify_webhook_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<(), &'static str> {
    let mut timestamp = "";
    let mut signature = "";
    for part in sig_header.split(',') {
        if let Some(t) = part.strip_prefix("t=") {
            timestamp = t;
        } else if let Some(v) = part.strip_prefix("v1=") {
            signature = v;
        }
    }

    if timestamp.is_empty() || signature.is_empty() {
        return Err("Invalid signature header");
    }

    let signed_payload = format!("{timestamp}.{}", std::str::from_utf8(payload).unwrap_or(""));
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| "HMAC key error")?;
    mac.update(signed_payload.as_bytes());

    // Decode hex signature and use constant-time comparison via hmac::verify_slice
    let sig_bytes = hex::decode(signature).map_err(|_| "Invalid signature hex")?;
    mac.verify_slice(&sig_bytes)
        .map_err(|_| "Webhook signature mismatch")?;

    // Reject events older than 5 minutes to prevent replay attacks
    let ts: i64 = timestamp.parse().map_err(|_| "Invalid timestamp")?;
    let now = chrono::Utc::now().timestamp();
    if (now - ts).abs() > 300 {
        return Err("Webhook timestamp too old");
    }

    Ok(())
}

/// A new subscription created by a completed checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCompleted {
    pub user_id: String,
    pub plan: Plan,
    pub customer_id: String,
    pub subscription_id: String,
    pub price_id: Option<String>,
    /// Provider-supplied period bounds (epoch ms), if present
    pub period_start: Option<i64>,
    pub period_end: Option<i64>,
}

/// Closed set of billing events the synchronizer reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    /// `checkout.session.completed` — creates the subscription record
    CheckoutCompleted(CheckoutCompleted),
    /// `customer.subscription.updated` — absolute-value status/period copy
    SubscriptionUpdated {
        subscription_id: String,
        status: SubscriptionStatus,
        period_start: Option<i64>,
        period_end: Option<i64>,
        cancel_at_period_end: Option<bool>,
    },
    /// `customer.subscription.deleted` — subscription goes to expired
    SubscriptionDeleted { subscription_id: String },
    /// Recognized-but-unhandled event type; acknowledged without effect
    Ignored { event_type: String },
    /// Authentic event missing required fields; dropped with a warning
    Malformed {
        event_type: String,
        reason: &'static str,
    },
}

/// Parse a verified webhook body into a [`BillingEvent`].
///
/// Dispatch is an explicit match over the fixed event-type set; unknown
/// types are `Ignored`, never an error.
pub fn parse_event(event: &serde_json::Value) -> BillingEvent {
    let event_type = event["type"].as_str().unwrap_or("").to_string();
    let obj = event.get("data").and_then(|d| d.get("object"));

    match event_type.as_str() {
        "checkout.session.completed" => parse_checkout_completed(event_type, obj),
        "customer.subscription.updated" => parse_subscription_updated(event_type, obj),
        "customer.subscription.deleted" => {
            match obj.and_then(|o| o["id"].as_str()) {
                Some(id) => BillingEvent::SubscriptionDeleted {
                    subscription_id: id.to_string(),
                },
                None => BillingEvent::Malformed {
                    event_type,
                    reason: "missing subscription id",
                },
            }
        }
        _ => BillingEvent::Ignored { event_type },
    }
}

fn parse_checkout_completed(
    event_type: String,
    obj: Option<&serde_json::Value>,
) -> BillingEvent {
    let Some(obj) = obj else {
        return BillingEvent::Malformed { event_type, reason: "missing data.object" };
    };

    let metadata = obj.get("metadata");
    let Some(user_id) = metadata.and_then(|m| m["user_id"].as_str()) else {
        return BillingEvent::Malformed { event_type, reason: "missing metadata.user_id" };
    };
    let Some(plan) = metadata.and_then(|m| m["plan"].as_str()) else {
        return BillingEvent::Malformed { event_type, reason: "missing metadata.plan" };
    };
    let Some(customer_id) = obj["customer"].as_str() else {
        return BillingEvent::Malformed { event_type, reason: "missing customer" };
    };
    let Some(subscription_id) = obj["subscription"].as_str() else {
        return BillingEvent::Malformed { event_type, reason: "missing subscription" };
    };

    BillingEvent::CheckoutCompleted(CheckoutCompleted {
        user_id: user_id.to_string(),
        plan: Plan::from_str_or_free(plan),
        customer_id: customer_id.to_string(),
        subscription_id: subscription_id.to_string(),
        price_id: metadata
            .and_then(|m| m["price_id"].as_str())
            .map(String::from),
        period_start: period_millis(obj, "current_period_start"),
        period_end: period_millis(obj, "current_period_end"),
    })
}

fn parse_subscription_updated(
    event_type: String,
    obj: Option<&serde_json::Value>,
) -> BillingEvent {
    let Some(obj) = obj else {
        return BillingEvent::Malformed { event_type, reason: "missing data.object" };
    };
    let Some(subscription_id) = obj["id"].as_str() else {
        return BillingEvent::Malformed { event_type, reason: "missing subscription id" };
    };

    let Some(status) = obj["status"].as_str().and_then(SubscriptionStatus::parse) else {
        return BillingEvent::Malformed { event_type, reason: "unrecognized status" };
    };

    BillingEvent::SubscriptionUpdated {
        subscription_id: subscription_id.to_string(),
        status,
        period_start: period_millis(obj, "current_period_start"),
        period_end: period_millis(obj, "current_period_end"),
        cancel_at_period_end: obj["cancel_at_period_end"].as_bool(),
    }
}

/// Provider timestamps are epoch seconds; the store keeps milliseconds
fn period_millis(obj: &serde_json::Value, field: &str) -> Option<i64> {
    obj[field].as_i64().map(|secs| secs * 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sign(body: &[u8], secret: &str, ts: i64) -> String {
        let signed_payload = format!("{ts}.{}", std::str::from_utf8(body).unwrap());
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        format!("t={ts},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn signature_accepts_valid() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = sign(body, "whsec_test", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(body, &header, "whsec_test").is_ok());
    }

    #[test]
    fn signature_rejects_tampered_body() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = sign(body, "whsec_test", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(b"{}", &header, "whsec_test").is_err());
    }

    #[test]
    fn signature_rejects_wrong_secret() {
        let body = b"{}";
        let header = sign(body, "whsec_other", chrono::Utc::now().timestamp());
        assert!(verify_webhook_signature(body, &header, "whsec_test").is_err());
    }

    #[test]
    fn signature_rejects_stale_timestamp() {
        let body = b"{}";
        let header = sign(body, "whsec_test", chrono::Utc::now().timestamp() - 600);
        assert_eq!(
            verify_webhook_signature(body, &header, "whsec_test"),
            Err("Webhook timestamp too old")
        );
    }

    #[test]
    fn signature_rejects_malformed_header() {
        assert!(verify_webhook_signature(b"{}", "v1=abcd", "whsec_test").is_err());
        assert!(verify_webhook_signature(b"{}", "t=123", "whsec_test").is_err());
        assert!(verify_webhook_signature(b"{}", "", "whsec_test").is_err());
    }

    #[test]
    fn parses_checkout_completed() {
        let event = json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "customer": "cus_123",
                "subscription": "sub_123",
                "metadata": { "user_id": "u1", "plan": "premium", "price_id": "price_1" }
            }}
        });
        let parsed = parse_event(&event);
        let BillingEvent::CheckoutCompleted(c) = parsed else {
            panic!("expected checkout, got {parsed:?}");
        };
        assert_eq!(c.user_id, "u1");
        assert_eq!(c.plan, Plan::Premium);
        assert_eq!(c.subscription_id, "sub_123");
        assert_eq!(c.price_id.as_deref(), Some("price_1"));
        assert_eq!(c.period_start, None);
    }

    #[test]
    fn checkout_missing_user_or_plan_is_malformed() {
        let event = json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "customer": "cus_123",
                "subscription": "sub_123",
                "metadata": { "plan": "premium" }
            }}
        });
        assert!(matches!(
            parse_event(&event),
            BillingEvent::Malformed { reason: "missing metadata.user_id", .. }
        ));

        let event = json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "customer": "cus_123",
                "subscription": "sub_123",
                "metadata": { "user_id": "u1" }
            }}
        });
        assert!(matches!(
            parse_event(&event),
            BillingEvent::Malformed { reason: "missing metadata.plan", .. }
        ));
    }

    #[test]
    fn parses_subscription_updated() {
        let event = json!({
            "type": "customer.subscription.updated",
            "data": { "object": {
                "id": "sub_123",
                "status": "past_due",
                "current_period_start": 1700000000,
                "current_period_end": 1702592000,
                "cancel_at_period_end": true
            }}
        });
        assert_eq!(
            parse_event(&event),
            BillingEvent::SubscriptionUpdated {
                subscription_id: "sub_123".to_string(),
                status: SubscriptionStatus::PastDue,
                period_start: Some(1_700_000_000_000),
                period_end: Some(1_702_592_000_000),
                cancel_at_period_end: Some(true),
            }
        );
    }

    #[test]
    fn update_with_unknown_status_is_malformed() {
        let event = json!({
            "type": "customer.subscription.updated",
            "data": { "object": { "id": "sub_123", "status": "trialing" } }
        });
        assert!(matches!(
            parse_event(&event),
            BillingEvent::Malformed { reason: "unrecognized status", .. }
        ));
    }

    #[test]
    fn parses_subscription_deleted() {
        let event = json!({
            "type": "customer.subscription.deleted",
            "data": { "object": { "id": "sub_123" } }
        });
        assert_eq!(
            parse_event(&event),
            BillingEvent::SubscriptionDeleted {
                subscription_id: "sub_123".to_string()
            }
        );
    }

    #[test]
    fn unknown_event_types_ignored() {
        let event = json!({ "type": "invoice.finalized", "data": { "object": {} } });
        assert!(matches!(parse_event(&event), BillingEvent::Ignored { .. }));
    }
}
