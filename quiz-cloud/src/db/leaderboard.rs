//! Leaderboard store: one row per (user, mode) holding the best score
//!
//! The only mutation is [`upsert_best`], a single conditional
//! `INSERT ... ON CONFLICT ... DO UPDATE ... WHERE` statement. Postgres
//! executes the comparison and the write as one atomic step per key, so
//! concurrent submissions from the same user (two browser tabs) cannot
//! lose an update: the surviving value is always the best ever
//! submitted under the mode's ordering.

use sqlx::PgPool;

use shared::game_mode::{GameMode, ScoreOrdering};

/// A stored leaderboard entry
#[derive(Debug, sqlx::FromRow, serde::Serialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub mode: String,
    pub score: i64,
    pub details: Option<serde_json::Value>,
    pub updated_at: i64,
}

/// Insert the entry if absent, otherwise overwrite only when the new
/// score improves on the stored one under the mode's ordering. Returns
/// whether the stored value actually changed.
pub async fn upsert_best(
    pool: &PgPool,
    user_id: &str,
    mode: GameMode,
    score: i64,
    details: Option<&serde_json::Value>,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let sql = match mode.ordering() {
        ScoreOrdering::HigherIsBetter => {
            "INSERT INTO leaderboard_entries (user_id, mode, score, details, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, mode) DO UPDATE SET
                score = EXCLUDED.score, details = EXCLUDED.details,
                updated_at = EXCLUDED.updated_at
             WHERE leaderboard_entries.score < EXCLUDED.score"
        }
        ScoreOrdering::LowerIsBetter => {
            "INSERT INTO leaderboard_entries (user_id, mode, score, details, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, mode) DO UPDATE SET
                score = EXCLUDED.score, details = EXCLUDED.details,
                updated_at = EXCLUDED.updated_at
             WHERE leaderboard_entries.score > EXCLUDED.score"
        }
    };

    let result = sqlx::query(sql)
        .bind(user_id)
        .bind(mode.as_str())
        .bind(score)
        .bind(details)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Top entries for a mode, best first per the mode's ordering
pub async fn top_entries(
    pool: &PgPool,
    mode: GameMode,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
    let sql = match mode.ordering() {
        ScoreOrdering::HigherIsBetter => {
            "SELECT user_id, mode, score, details, updated_at
                FROM leaderboard_entries
                WHERE mode = $1
                ORDER BY score DESC, updated_at ASC
                LIMIT $2"
        }
        ScoreOrdering::LowerIsBetter => {
            "SELECT user_id, mode, score, details, updated_at
                FROM leaderboard_entries
                WHERE mode = $1
                ORDER BY score ASC, updated_at ASC
                LIMIT $2"
        }
    };

    sqlx::query_as::<_, LeaderboardEntry>(sql)
        .bind(mode.as_str())
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// A single user's entry for a mode, if any
pub async fn entry_for_user(
    pool: &PgPool,
    user_id: &str,
    mode: GameMode,
) -> Result<Option<LeaderboardEntry>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardEntry>(
        "SELECT user_id, mode, score, details, updated_at
            FROM leaderboard_entries
            WHERE user_id = $1 AND mode = $2",
    )
    .bind(user_id)
    .bind(mode.as_str())
    .fetch_optional(pool)
    .await
}

/// Remove all leaderboard entries for a user (admin account deletion)
pub async fn delete_for_user(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leaderboard_entries WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
