//! Application state for quiz-cloud

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Billing provider webhook signing secret
    pub billing_webhook_secret: String,
    /// JWT secret for player authentication
    pub jwt_secret: String,
}

impl AppState {
    /// Create a new AppState: connect the pool, apply migrations
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            pool,
            billing_webhook_secret: config.billing_webhook_secret.clone(),
            jwt_secret: config.jwt_secret.clone(),
        })
    }
}
