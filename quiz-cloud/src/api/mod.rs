//! API routes for quiz-cloud

pub mod admin;
pub mod billing_webhook;
pub mod health;
pub mod leaderboard;
pub mod profile;
pub mod scores;

use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::player_auth_middleware;
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Player API (JWT authenticated)
    let authed = Router::new()
        .route("/api/scores", post(scores::submit_score))
        .route("/api/profile", get(profile::get_profile))
        .route("/api/subscription", get(profile::get_subscription))
        .route("/api/quiz/{quiz_id}/access", get(profile::quiz_access))
        .route("/api/admin/players/{user_id}", delete(admin::delete_player))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            player_auth_middleware,
        ));

    // Billing webhook (signature-verified, raw body)
    let webhook = Router::new().route("/billing/webhook", post(billing_webhook::handle_webhook));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/leaderboard/{mode}", get(leaderboard::top_entries))
        .merge(webhook)
        .merge(authed)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}
