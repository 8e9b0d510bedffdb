//! Player-facing reads: profile + derived rank, subscription, quiz access
//!
//! These are the read sides of the three state pieces: the rank is
//! derived from the stored level, the plan from the subscription store,
//! and quiz access from the static policy evaluated against that plan.

use axum::extract::{Extension, Path, State};
use serde::Serialize;

use shared::error::{ApiResponse, AppError};
use shared::plan::Plan;
use shared::rank::{rank_for_level, tier_for_level};

use crate::auth::PlayerIdentity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub player: db::players::Player,
    pub level: i32,
    pub xp: i64,
    pub quizzes_played: i64,
    pub rank: &'static str,
    pub tier: &'static str,
    pub rank_color: &'static str,
}

/// GET /api/profile — the caller's profile plus derived rank/tier
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<PlayerIdentity>,
) -> ServiceResult<ApiResponse<ProfileResponse>> {
    let player = db::players::find_by_id(&state.pool, &identity.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("player"))?;

    // Stats row may not exist yet for a fresh account
    let stats = db::players::stats_for(&state.pool, &identity.user_id).await?;
    let (level, xp, quizzes_played) = stats
        .map(|s| (s.level, s.xp, s.quizzes_played))
        .unwrap_or((0, 0, 0));

    let rank = rank_for_level(level.max(0) as u32);
    let tier = tier_for_level(level.max(0) as u32, rank);

    Ok(ApiResponse::success(ProfileResponse {
        player,
        level,
        xp,
        quizzes_played,
        rank: rank.name,
        tier: tier.as_str(),
        rank_color: rank.color,
    }))
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub plan: Plan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<db::subscriptions::Subscription>,
}

/// GET /api/subscription — the caller's current plan and record
pub async fn get_subscription(
    State(state): State<AppState>,
    Extension(identity): Extension<PlayerIdentity>,
) -> ServiceResult<ApiResponse<SubscriptionResponse>> {
    let plan = db::subscriptions::current_plan_for_user(&state.pool, &identity.user_id).await?;
    let subscription = db::subscriptions::find_for_user(&state.pool, &identity.user_id).await?;

    Ok(ApiResponse::success(SubscriptionResponse {
        plan,
        subscription,
    }))
}

#[derive(Debug, Serialize)]
pub struct QuizAccessResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// GET /api/quiz/{quiz_id}/access — policy check against the live plan
pub async fn quiz_access(
    State(state): State<AppState>,
    Extension(identity): Extension<PlayerIdentity>,
    Path(quiz_id): Path<String>,
) -> ServiceResult<ApiResponse<QuizAccessResponse>> {
    let plan = db::subscriptions::current_plan_for_user(&state.pool, &identity.user_id).await?;

    let allowed = shared::access::can_access(&quiz_id, plan);
    let message = if allowed {
        None
    } else {
        shared::access::access_denied_message(&quiz_id)
    };

    Ok(ApiResponse::success(QuizAccessResponse { allowed, message }))
}
