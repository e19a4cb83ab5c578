//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::CreationStepHandler;
use crate::application::services::{CreationService, LockRegistry, SpendDispatcher, SpendService};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::permissions::ChronicleRoster;
use crate::infrastructure::persistence::StoreBackend;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<StoreBackend>,
    pub roster: Arc<ChronicleRoster>,
    pub spend_service: SpendService,
    pub creation_service: CreationService,
}

impl AppState {
    pub async fn new(config: AppConfig, step_handler: Arc<dyn CreationStepHandler>) -> Result<Self> {
        let store = Arc::new(
            StoreBackend::from_config(&config)
                .await
                .context("failed to open the character store")?,
        );
        let roster = Arc::new(ChronicleRoster::new());

        // Spending and creation serialize on the same per-character locks
        let character_locks = Arc::new(LockRegistry::new());
        let spend_service = SpendService::new(
            store.clone(),
            roster.clone(),
            Arc::new(SpendDispatcher::new()),
            character_locks.clone(),
        );
        let creation_service = CreationService::new(store.clone(), step_handler, character_locks);

        Ok(Self {
            config,
            store,
            roster,
            spend_service,
            creation_service,
        })
    }
}
