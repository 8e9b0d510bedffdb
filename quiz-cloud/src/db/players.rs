//! Player profile and progression stats queries

use sqlx::PgPool;

#[derive(Debug, sqlx::FromRow, serde::Serialize)]
pub struct Player {
    pub id: String,
    pub email: String,
    pub username: String,
    pub created_at: i64,
}

#[derive(Debug, sqlx::FromRow, serde::Serialize)]
pub struct PlayerStats {
    pub player_id: String,
    pub level: i32,
    pub xp: i64,
    pub quizzes_played: i64,
    pub updated_at: i64,
}

pub async fn find_by_id(pool: &PgPool, player_id: &str) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        "SELECT id, email, username, created_at FROM players WHERE id = $1",
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

pub async fn stats_for(pool: &PgPool, player_id: &str) -> Result<Option<PlayerStats>, sqlx::Error> {
    sqlx::query_as::<_, PlayerStats>(
        "SELECT player_id, level, xp, quizzes_played, updated_at
            FROM player_stats WHERE player_id = $1",
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_stats(pool: &PgPool, player_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM player_stats WHERE player_id = $1")
        .bind(player_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_player(pool: &PgPool, player_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(player_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
