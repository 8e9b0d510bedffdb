//! Leaderboard reads
//!
//! GET /api/leaderboard/{mode}?limit=N

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use shared::error::{ApiResponse, AppError};
use shared::game_mode::GameMode;

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 25;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// Top entries for a leaderboard-eligible mode
pub async fn top_entries(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> ServiceResult<ApiResponse<Vec<db::leaderboard::LeaderboardEntry>>> {
    let Some(mode) = GameMode::parse(&mode) else {
        return Err(AppError::not_found("game mode").into());
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let entries = db::leaderboard::top_entries(&state.pool, mode, limit).await?;
    Ok(ApiResponse::success(entries))
}
