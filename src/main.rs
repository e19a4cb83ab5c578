//! Chargen Engine - opens the character store and reports the review backlog

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chargen_engine::application::ports::outbound::SpendLedgerPort;
use chargen_engine::application::services::SpendDispatcher;
use chargen_engine::domain::value_objects::Archetype;
use chargen_engine::infrastructure::config::AppConfig;
use chargen_engine::infrastructure::state::AppState;
use chargen_engine::infrastructure::step_handlers::PassThroughStepHandler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chargen_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Chargen Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Store: {:?}", config.store_backend);
    tracing::info!("  SQLite: {}", config.sqlite_path);

    // Initialize application state
    let state = AppState::new(config, Arc::new(PassThroughStepHandler)).await?;
    tracing::info!("Application state initialized");

    let dispatcher = SpendDispatcher::new();
    for archetype in Archetype::ALL {
        let categories: Vec<&str> = dispatcher
            .categories(archetype)
            .into_iter()
            .map(|c| c.as_str())
            .collect();
        tracing::debug!("  {}: {}", archetype, categories.join(", "));
    }

    let backlog = state.store.pending_count().await?;
    tracing::info!(backlog, "Spend requests awaiting review: {}", backlog);

    Ok(())
}
