use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use survey_core::CoreConfig;
use survey_core::config::{csv_path_from_env_value, session_ttl_from_env_value};

/// Main entry point for the diabetes survey application
///
/// Loads `.env`, resolves configuration once, and serves the survey pages, the JSON session API
/// and Swagger UI from one HTTP server.
///
/// # Environment Variables
/// - `SURVEY_REST_ADDR`: HTTP server address (default: "0.0.0.0:3000")
/// - `SURVEY_CSV_PATH`: Response store (default: "diabetes_survey_responses.csv")
/// - `SURVEY_SESSION_TTL_SECS`: Idle session lifetime in seconds (default: 3600)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("survey_run=info".parse()?)
                .add_directive("survey_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("SURVEY_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let csv_path = csv_path_from_env_value(std::env::var("SURVEY_CSV_PATH").ok());
    let session_ttl_secs =
        session_ttl_from_env_value(std::env::var("SURVEY_SESSION_TTL_SECS").ok())?;

    let cfg = Arc::new(CoreConfig::new(csv_path, session_ttl_secs)?);

    tracing::info!("++ Starting diabetes survey on {}", rest_addr);
    tracing::info!(
        csv_path = %cfg.csv_path().display(),
        session_ttl_secs,
        "++ Survey configuration resolved"
    );

    let app = router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
