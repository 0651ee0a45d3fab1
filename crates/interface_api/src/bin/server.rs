//! Claims API Server Binary
//!
//! Starts the HTTP API server for the claims system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 API_DATABASE_URL=postgres://... cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - Token expiration in seconds (default: 3600)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_GEMINI_API_KEY` - Text model API key
//! * `API_GEMINI_MODEL` - Text model identifier (default: gemini-1.5-flash)
//! * `API_S3_BUCKET` - Bucket holding document blobs
//! * `API_S3_REGION` / `API_S3_ENDPOINT` - Object-store overrides

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_claims::ClaimWorkflow;
use infra_db::{create_pool, DatabaseConfig, PgClaimStore};
use infra_external::{GeminiConfig, GeminiTextModel, PdfTextExtractor, S3BlobStore, S3Config};
use interface_api::{config::ApiConfig, create_router, AppState};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, establishes the database
/// connection and external-system clients, and starts the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Claims API Server"
    );

    // Database pool and migrations
    let pool = create_pool(DatabaseConfig::new(&config.database_url))
        .await
        .context("failed to connect to database")?;
    tracing::info!("Running database migrations");
    infra_db::MIGRATOR
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    // Explicitly constructed service handles; the workflow receives them as
    // injected ports
    let store = Arc::new(PgClaimStore::new(pool.clone()));
    let blobs = Arc::new(
        S3BlobStore::connect(S3Config {
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
            endpoint_url: config.s3_endpoint.clone(),
        })
        .await,
    );
    let extractor = Arc::new(PdfTextExtractor::new());
    let model = Arc::new(
        GeminiTextModel::new(GeminiConfig {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            endpoint: config
                .gemini_endpoint
                .clone()
                .unwrap_or_else(|| GeminiConfig::default().endpoint),
            ..Default::default()
        })
        .context("failed to build text model client")?,
    );

    let workflow = Arc::new(ClaimWorkflow::new(store, blobs, extractor, model));

    let app = create_router(AppState {
        pool,
        workflow,
        config: config.clone(),
    });

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .context("invalid server address")?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
