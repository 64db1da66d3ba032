mod config;
mod errors;
mod export;
mod layout;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::routes::export::ExportGuard;
use crate::services::credits::HttpCreditService;
use crate::services::drafts::DraftStore;
use crate::services::optimizer::HttpResumeOptimizer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", crate_target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Inkpress API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Redis (draft snapshot store)
    let redis = redis::Client::open(config.redis_url.clone())?;
    let drafts = DraftStore::new(redis, config.draft_debounce_ms);
    info!("Draft store initialized (debounce {}ms)", config.draft_debounce_ms);

    // Initialize collaborator clients
    let optimizer = Arc::new(HttpResumeOptimizer::new(
        config.optimizer_url.clone(),
        config.optimizer_api_key.clone(),
    ));
    info!("Optimizer client initialized ({})", config.optimizer_url);

    let credits = Arc::new(HttpCreditService::new(config.credits_url.clone()));
    info!("Credit service client initialized ({})", config.credits_url);

    // Build app state
    let state = AppState {
        optimizer,
        credits,
        drafts,
        exports: ExportGuard::default(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
