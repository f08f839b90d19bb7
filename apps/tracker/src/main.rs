mod config;
mod errors;
mod extract;
mod extraction;
mod jobs;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::LlmJobExtractor;
use crate::jobs::store::JobStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Tracker API v{}", env!("CARGO_PKG_VERSION"));

    let store = JobStore::new();
    if config.seed_sample_jobs {
        store.seed_samples().await;
    }

    let llm = LlmClient::from_config(&config);
    if llm.has_api_key() {
        info!(
            "LLM client initialized (model: {}, prompt: {})",
            llm.model(),
            config.extraction_prompt
        );
    } else {
        warn!("OPENROUTER_API_KEY is not set; URL extraction is disabled");
    }
    let extractor = Arc::new(LlmJobExtractor::new(llm, config.extraction_prompt));

    let state = AppState {
        store,
        extractor,
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
