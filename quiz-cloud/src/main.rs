//! quiz-cloud — entitlement & competitive progression service
//!
//! Long-running service that:
//! - Keeps per-player subscription state in sync with the billing
//!   provider's webhook events
//! - Records competitive scores with idempotent best-only upserts
//! - Serves leaderboard, progression, and quiz-access reads
//! - Handles admin account deletion

mod api;
mod auth;
mod billing;
mod config;
mod db;
mod error;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting quiz-cloud (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("quiz-cloud listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
