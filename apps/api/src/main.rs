mod admin;
mod catalog;
mod clock;
mod config;
mod errors;
mod extract;
mod history;
mod reports;
mod response;
mod reviews;
mod roadmap;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use chrono::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::bundles::bundled_bundles;
use crate::catalog::registry::bundled_prompts;
use crate::catalog::{Catalog, TagMappings};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::history::models::HistoryPolicy;
use crate::history::HistoryStore;
use crate::roadmap::seed::seed_features;
use crate::roadmap::RoadmapStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Prompts API v{}", env!("CARGO_PKG_VERSION"));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let catalog = Catalog::new(bundled_prompts()).with_bundles(bundled_bundles());
    info!("Prompt catalog loaded");

    let tag_mappings = TagMappings::load(&config.tag_mappings_path).await?;
    info!(
        "Loaded {} tag mappings from {}",
        tag_mappings.mappings.len(),
        config.tag_mappings_path.display()
    );

    let history = HistoryStore::new(HistoryPolicy {
        dedupe_window: Duration::seconds(config.history_dedupe_window_secs),
        retention: Duration::days(config.history_retention_days),
    });

    let roadmap = if config.seed_roadmap {
        RoadmapStore::with_features(seed_features(clock.now()))
    } else {
        RoadmapStore::new()
    };

    if config.admin_token.is_none() {
        info!("ADMIN_TOKEN not set; admin routes are disabled");
    }

    // Build app state
    let state = AppState::new(
        config.clone(),
        clock,
        catalog,
        tag_mappings,
        history,
        roadmap,
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
