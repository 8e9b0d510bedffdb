//! Score submission — the write side of the leaderboards
//!
//! POST /api/scores (JWT authenticated)
//!
//! A submission is classified first (mode normalization, eligibility,
//! validity) and only then persisted with the conditional upsert. The
//! handler reports a structured outcome; how that is presented (toasts,
//! time formatting) is the client's concern.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use shared::error::ApiResponse;
use shared::game_mode::GameMode;

use crate::auth::PlayerIdentity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub game_mode: String,
    pub score: i64,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct SubmitScoreResponse {
    /// True only when the score was persisted as an improvement
    pub saved: bool,
}

/// What to do with a raw submission
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SubmissionOutcome {
    /// Mode not on the leaderboard allow-list; accepted but not saved
    Discarded,
    /// Eligible mode, invalid score; not saved
    Rejected(&'static str),
    /// Persist under the normalized mode
    Persist(GameMode),
}

/// Classify a submission without touching storage.
///
/// Streak is a positive accumulating counter; a non-positive streak
/// score means no real attempt and is rejected.
pub(crate) fn classify_submission(
    raw_mode: &str,
    score: i64,
    details: Option<&serde_json::Value>,
) -> SubmissionOutcome {
    let Some(mode) = GameMode::normalize(raw_mode, details) else {
        return SubmissionOutcome::Discarded;
    };
    if mode == GameMode::Streak && score <= 0 {
        return SubmissionOutcome::Rejected("non-positive streak score");
    }
    SubmissionOutcome::Persist(mode)
}

/// Handle a score submission from an authenticated player
pub async fn submit_score(
    State(state): State<AppState>,
    Extension(identity): Extension<PlayerIdentity>,
    Json(req): Json<SubmitScoreRequest>,
) -> ServiceResult<ApiResponse<SubmitScoreResponse>> {
    let saved = match classify_submission(&req.game_mode, req.score, req.details.as_ref()) {
        SubmissionOutcome::Discarded => {
            tracing::debug!(
                user_id = %identity.user_id,
                game_mode = %req.game_mode,
                "Score for non-leaderboard mode discarded"
            );
            false
        }
        SubmissionOutcome::Rejected(reason) => {
            tracing::debug!(
                user_id = %identity.user_id,
                game_mode = %req.game_mode,
                reason = reason,
                "Score rejected"
            );
            false
        }
        SubmissionOutcome::Persist(mode) => {
            let improved = db::leaderboard::upsert_best(
                &state.pool,
                &identity.user_id,
                mode,
                req.score,
                req.details.as_ref(),
                shared::util::now_millis(),
            )
            .await?;
            if improved {
                tracing::info!(
                    user_id = %identity.user_id,
                    mode = mode.as_str(),
                    score = req.score,
                    "New personal best recorded"
                );
            }
            improved
        }
    };

    Ok(ApiResponse::success(SubmitScoreResponse { saved }))
}
