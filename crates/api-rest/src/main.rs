//! FPR REST API server binary.
//!
//! ## Purpose
//! Resolves configuration from the environment, initialises logging, and
//! serves the registry router.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{app, AppState};
use fpr_core::CoreConfig;

/// Main entry point for the FPR REST API server
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000). Provides HTTP endpoints for patient record operations with
/// OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `FPR_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `FPR_DB_FILE`: Path of the JSON registry file (default: "patients.json")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the registry file path is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("FPR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let db_file = PathBuf::from(
        std::env::var("FPR_DB_FILE").unwrap_or_else(|_| "patients.json".into()),
    );

    if !db_file.is_file() {
        tracing::warn!(
            "registry file {} does not exist yet; requests will fail until it is created",
            db_file.display()
        );
    }

    tracing::info!("-- Starting FPR REST API on {}", addr);
    tracing::info!("-- Registry file: {}", db_file.display());

    let cfg = Arc::new(CoreConfig::new(db_file)?);
    let router = app(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
