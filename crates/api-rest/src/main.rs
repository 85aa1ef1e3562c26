//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the survey HTTP server (HTML pages, JSON API, Swagger UI) on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `survey-run` binary serves the same
//! router and additionally loads `.env`.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use survey_core::config::{csv_path_from_env_value, session_ttl_from_env_value};
use survey_core::CoreConfig;

/// Main entry point for the survey REST API server
///
/// # Environment Variables
/// - `SURVEY_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `SURVEY_CSV_PATH`: Response store (default: "diabetes_survey_responses.csv")
/// - `SURVEY_SESSION_TTL_SECS`: Idle session lifetime (default: 3600)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("survey_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SURVEY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let csv_path = csv_path_from_env_value(std::env::var("SURVEY_CSV_PATH").ok());
    let session_ttl_secs =
        session_ttl_from_env_value(std::env::var("SURVEY_SESSION_TTL_SECS").ok())?;
    let cfg = Arc::new(CoreConfig::new(csv_path, session_ttl_secs)?);

    tracing::info!(
        csv_path = %cfg.csv_path().display(),
        "-- Starting survey REST API on {}",
        addr
    );

    let app = router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
