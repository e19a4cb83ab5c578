//! Persistence adapters
//!
//! Two backends implement the store ports: SQLite for real use and an
//! in-memory store for tests and throwaway sessions. [`StoreBackend`] picks
//! one at startup and forwards every port call to it.

mod memory_store;
mod sqlite_store;

pub use memory_store::InMemorySpendStore;
pub use sqlite_store::SqliteSpendStore;

use async_trait::async_trait;

use crate::application::ports::outbound::{
    CharacterRepositoryPort, SpendLedgerPort, SpendStorePort, StoreError,
};
use crate::domain::entities::{Character, SpendRequest};
use crate::domain::value_objects::{CharacterId, ChronicleId, SpendRequestId};
use crate::infrastructure::config::{AppConfig, StoreKind};

pub enum StoreBackend {
    Memory(InMemorySpendStore),
    Sqlite(SqliteSpendStore),
}

impl StoreBackend {
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match config.store_backend {
            StoreKind::Memory => Ok(StoreBackend::Memory(InMemorySpendStore::new())),
            StoreKind::Sqlite => Ok(StoreBackend::Sqlite(
                SqliteSpendStore::connect(&config.sqlite_path).await?,
            )),
        }
    }

    fn inner(&self) -> &dyn SpendStorePort {
        match self {
            StoreBackend::Memory(store) => store,
            StoreBackend::Sqlite(store) => store,
        }
    }
}

#[async_trait]
impl CharacterRepositoryPort for StoreBackend {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, StoreError> {
        self.inner().get(id).await
    }

    async fn save(&self, character: &Character) -> Result<(), StoreError> {
        self.inner().save(character).await
    }
}

#[async_trait]
impl SpendLedgerPort for StoreBackend {
    async fn get_request(&self, id: SpendRequestId) -> Result<Option<SpendRequest>, StoreError> {
        self.inner().get_request(id).await
    }

    async fn history(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError> {
        self.inner().history(character_id).await
    }

    async fn pending(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError> {
        self.inner().pending(character_id).await
    }

    async fn pending_for_chronicle(
        &self,
        chronicle: ChronicleId,
    ) -> Result<Vec<SpendRequest>, StoreError> {
        self.inner().pending_for_chronicle(chronicle).await
    }

    async fn pending_count(&self) -> Result<usize, StoreError> {
        self.inner().pending_count().await
    }
}

#[async_trait]
impl SpendStorePort for StoreBackend {
    async fn commit_spend(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError> {
        self.inner().commit_spend(character, request).await
    }

    async fn commit_decision(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError> {
        self.inner().commit_decision(character, request).await
    }
}
