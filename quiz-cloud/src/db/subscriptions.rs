//! Subscription store, keyed by the billing provider's subscription id
//!
//! Every write here is an absolute-value write: replays of the same
//! event land on the same final state. No timestamp/version comparison
//! guards against an older update arriving after a newer one — providers
//! deliver in order in practice, and last-applied-wins is the accepted
//! behavior.

use sqlx::PgPool;

use shared::plan::Plan;

pub struct CreateSubscription<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub customer_id: &'a str,
    pub price_id: Option<&'a str>,
    pub plan: &'a str,
    pub period_start: i64,
    pub period_end: i64,
    pub now: i64,
}

/// A subscription record as stored
#[derive(Debug, sqlx::FromRow, serde::Serialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: String,
    pub customer_id: String,
    pub price_id: Option<String>,
    pub plan: String,
    pub status: String,
    pub current_period_start: i64,
    pub current_period_end: i64,
    pub cancel_at_period_end: bool,
    pub updated_at: i64,
}

/// Create the record for a completed checkout (status `active`).
///
/// `ON CONFLICT (id) DO UPDATE` with absolute values makes checkout
/// replays converge on one record in one state.
pub async fn create(pool: &PgPool, sub: &CreateSubscription<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO subscriptions
            (id, user_id, customer_id, price_id, plan, status,
             current_period_start, current_period_end, cancel_at_period_end, updated_at)
         VALUES ($1, $2, $3, $4, $5, 'active', $6, $7, FALSE, $8)
         ON CONFLICT (id) DO UPDATE SET
            user_id = $2, customer_id = $3, price_id = $4, plan = $5,
            status = 'active', current_period_start = $6,
            current_period_end = $7, cancel_at_period_end = FALSE,
            updated_at = $8",
    )
    .bind(sub.id)
    .bind(sub.user_id)
    .bind(sub.customer_id)
    .bind(sub.price_id)
    .bind(sub.plan)
    .bind(sub.period_start)
    .bind(sub.period_end)
    .bind(sub.now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Copy an update event's status, period bounds, and cancel flag onto
/// the record. Fields the event omits keep their stored values. Returns
/// false (no-op) when no record matches the subscription id.
pub async fn apply_update(
    pool: &PgPool,
    subscription_id: &str,
    status: &str,
    period_start: Option<i64>,
    period_end: Option<i64>,
    cancel_at_period_end: Option<bool>,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE subscriptions SET
            status = $2,
            current_period_start = COALESCE($3, current_period_start),
            current_period_end = COALESCE($4, current_period_end),
            cancel_at_period_end = COALESCE($5, cancel_at_period_end),
            updated_at = $6
         WHERE id = $1",
    )
    .bind(subscription_id)
    .bind(status)
    .bind(period_start)
    .bind(period_end)
    .bind(cancel_at_period_end)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Deletion event: status goes to expired, everything else untouched.
/// Returns false (no-op) when no record matches.
pub async fn mark_expired(
    pool: &PgPool,
    subscription_id: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE subscriptions SET status = 'expired', updated_at = $2 WHERE id = $1")
            .bind(subscription_id)
            .bind(now)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Most recently updated subscription record for a user, if any
pub async fn find_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        "SELECT id, user_id, customer_id, price_id, plan, status,
                current_period_start, current_period_end, cancel_at_period_end, updated_at
            FROM subscriptions
            WHERE user_id = $1
            ORDER BY updated_at DESC
            LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// The user's effective plan: the plan of their latest active
/// subscription, or Free when none exists.
pub async fn current_plan_for_user(pool: &PgPool, user_id: &str) -> Result<Plan, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT plan FROM subscriptions
            WHERE user_id = $1 AND status = 'active'
            ORDER BY updated_at DESC
            LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| Plan::from_str_or_free(&r.0)).unwrap_or_default())
}

/// Remove all subscription records for a user (admin account deletion)
pub async fn delete_for_user(pool: &PgPool, user_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
