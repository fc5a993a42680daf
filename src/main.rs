//! Roster Core - employee and team directory service
//!
//! Serves CRUD endpoints for employees and teams plus a hierarchical
//! view of the team tree with each team's employees attached.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::auth::{StaticTokenVerifier, TokenVerifier};
use crate::config::Config;
use crate::storage::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool; handlers check out one connection per request.
    pub database: Database,
    /// Decides which bearer tokens are accepted.
    pub verifier: Arc<dyn TokenVerifier>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Roster Core v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        max_connections = config.database.max_connections,
        "Configuration loaded"
    );

    let database = Database::connect(&config.database).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to connect to database");
        anyhow::anyhow!("Database connection error: {}", e)
    })?;

    database.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    if config.auth.token.trim().is_empty() {
        anyhow::bail!("auth.token must be set");
    }

    let state = AppState {
        database,
        verifier: Arc::new(StaticTokenVerifier::new(&config.auth.token)),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
