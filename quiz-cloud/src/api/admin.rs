//! Admin operations
//!
//! DELETE /api/admin/players/{user_id} — cascading account deletion.
//! The admin-role check happens before any row is touched; absent rows
//! count as success so a retried deletion is harmless.

use axum::extract::{Extension, Path, State};

use shared::error::{ApiResponse, AppError, ErrorCode};

use crate::auth::PlayerIdentity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

/// Delete a player and everything keyed to them
pub async fn delete_player(
    State(state): State<AppState>,
    Extension(identity): Extension<PlayerIdentity>,
    Path(user_id): Path<String>,
) -> ServiceResult<ApiResponse<()>> {
    if !identity.is_admin() {
        return Err(AppError::new(ErrorCode::AdminRequired).into());
    }

    let leaderboard = db::leaderboard::delete_for_user(&state.pool, &user_id).await?;
    let subscriptions = db::subscriptions::delete_for_user(&state.pool, &user_id).await?;
    let stats = db::players::delete_stats(&state.pool, &user_id).await?;
    let player = db::players::delete_player(&state.pool, &user_id).await?;

    tracing::info!(
        admin = %identity.user_id,
        target = %user_id,
        leaderboard_rows = leaderboard,
        subscription_rows = subscriptions,
        stats_rows = stats,
        player_rows = player,
        "Player account deleted"
    );

    Ok(ApiResponse::ok())
}
