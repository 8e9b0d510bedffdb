//! Billing webhook handler
//!
//! POST /billing/webhook — raw body for HMAC signature verification.
//!
//! The billing provider retries on non-2xx; malformed-but-authentic
//! events are acknowledged with 200 and dropped, since the sender has
//! no feedback channel and would retry the same body forever.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};

use crate::billing::{self, BillingEvent, CheckoutCompleted};
use crate::db;
use crate::state::AppState;

/// Handle incoming billing webhook events
///
/// Must receive the raw body (not JSON) for signature verification.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if state.billing_webhook_secret.is_empty() {
        tracing::error!("Billing webhook secret not configured, rejecting event");
        return StatusCode::BAD_REQUEST;
    }

    // 1. Get signature header
    let sig_header = match headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            tracing::warn!("Missing webhook signature header");
            return StatusCode::BAD_REQUEST;
        }
    };

    // 2. Verify signature — a forged event must never reach a transition
    if let Err(e) =
        billing::verify_webhook_signature(&body, sig_header, &state.billing_webhook_secret)
    {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return StatusCode::BAD_REQUEST;
    }

    // 3. Parse JSON event
    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return StatusCode::BAD_REQUEST;
        }
    };

    // 4. Dispatch over the closed event set
    match billing::parse_event(&event) {
        BillingEvent::CheckoutCompleted(checkout) => {
            handle_checkout_completed(&state, checkout).await
        }
        BillingEvent::SubscriptionUpdated {
            subscription_id,
            status,
            period_start,
            period_end,
            cancel_at_period_end,
        } => {
            let applied = match db::subscriptions::apply_update(
                &state.pool,
                &subscription_id,
                status.as_str(),
                period_start,
                period_end,
                cancel_at_period_end,
                shared::util::now_millis(),
            )
            .await
            {
                Ok(applied) => applied,
                Err(e) => {
                    tracing::error!(%e, "Failed to apply subscription update");
                    return StatusCode::INTERNAL_SERVER_ERROR;
                }
            };
            if applied {
                tracing::info!(
                    subscription_id = %subscription_id,
                    status = status.as_str(),
                    "Subscription updated"
                );
            } else {
                // Update events never create records
                tracing::warn!(
                    subscription_id = %subscription_id,
                    "Update for unknown subscription, ignored"
                );
            }
            StatusCode::OK
        }
        BillingEvent::SubscriptionDeleted { subscription_id } => {
            let applied = match db::subscriptions::mark_expired(
                &state.pool,
                &subscription_id,
                shared::util::now_millis(),
            )
            .await
            {
                Ok(applied) => applied,
                Err(e) => {
                    tracing::error!(%e, "Failed to expire subscription");
                    return StatusCode::INTERNAL_SERVER_ERROR;
                }
            };
            if applied {
                tracing::info!(subscription_id = %subscription_id, "Subscription expired");
            } else {
                tracing::warn!(
                    subscription_id = %subscription_id,
                    "Deletion for unknown subscription, ignored"
                );
            }
            StatusCode::OK
        }
        BillingEvent::Ignored { event_type } => {
            tracing::debug!(event_type = %event_type, "Unhandled webhook event type");
            StatusCode::OK
        }
        BillingEvent::Malformed { event_type, reason } => {
            tracing::warn!(event_type = %event_type, reason = reason, "Malformed webhook event dropped");
            StatusCode::OK
        }
    }
}

/// checkout.session.completed → create the subscription record
async fn handle_checkout_completed(state: &AppState, checkout: CheckoutCompleted) -> StatusCode {
    let now = shared::util::now_millis();
    // Provider-supplied bounds win; otherwise 30 days from now
    let period_start = checkout.period_start.unwrap_or(now);
    let period_end = checkout.period_end.unwrap_or_else(|| {
        period_start + billing::DEFAULT_PERIOD_DAYS * 24 * 60 * 60 * 1000
    });

    let sub = db::subscriptions::CreateSubscription {
        id: &checkout.subscription_id,
        user_id: &checkout.user_id,
        customer_id: &checkout.customer_id,
        price_id: checkout.price_id.as_deref(),
        plan: checkout.plan.as_str(),
        period_start,
        period_end,
        now,
    };
    if let Err(e) = db::subscriptions::create(&state.pool, &sub).await {
        tracing::error!(%e, "Failed to create subscription");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    tracing::info!(
        user_id = %checkout.user_id,
        subscription_id = %checkout.subscription_id,
        plan = checkout.plan.as_str(),
        "Subscription activated via checkout"
    );

    StatusCode::OK
}
