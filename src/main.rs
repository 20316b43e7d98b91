// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GreenWays API Server
//!
//! Estimates trip emissions, awards eco points for CO2 saved, and serves
//! per-user dashboards and a global leaderboard.

use greenways::{
    config::{Config, StorageBackend},
    db::Database,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, storage = ?config.storage, "Starting GreenWays API");

    let db = match config.storage {
        StorageBackend::Firestore => {
            let db = Database::firestore(&config.gcp_project_id).await?;
            tracing::info!(project = %config.gcp_project_id, "Connected to Firestore");
            db
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will be lost on restart");
            Database::in_memory()
        }
    };

    if config.ors_api_key.is_none() {
        tracing::warn!("ORS_API_KEY not set; route comparison will be unavailable");
    }

    let port = config.port;
    let state = Arc::new(AppState::new(config, db));

    // Build router
    let app = greenways::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("greenways=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
