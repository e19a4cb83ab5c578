//! Store ports - Interfaces for character and ledger persistence
//!
//! A spend touches the character row and the ledger in one unit, so on top
//! of the plain repository and ledger reads the store exposes two atomic
//! commits. Backends must write both rows or neither.

use async_trait::async_trait;

use crate::domain::entities::{Character, SpendRequest};
use crate::domain::value_objects::{CharacterId, ChronicleId, SpendRequestId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The stored row no longer matches what the caller read
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Failure injected by a test store
    #[error("Injected failure: {0}")]
    Injected(String),
}

// =============================================================================
// Character Repository Port
// =============================================================================

#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    /// Get a character by ID
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, StoreError>;

    /// Insert or replace a character
    async fn save(&self, character: &Character) -> Result<(), StoreError>;
}

// =============================================================================
// Spend Ledger Port
// =============================================================================

#[async_trait]
pub trait SpendLedgerPort: Send + Sync {
    async fn get_request(&self, id: SpendRequestId) -> Result<Option<SpendRequest>, StoreError>;

    /// Every request for a character, oldest first
    async fn history(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError>;

    /// Pending requests for a character, oldest first
    async fn pending(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError>;

    /// The review queue of a chronicle, oldest first
    async fn pending_for_chronicle(
        &self,
        chronicle: ChronicleId,
    ) -> Result<Vec<SpendRequest>, StoreError>;

    /// Pending requests across all chronicles
    async fn pending_count(&self) -> Result<usize, StoreError>;
}

// =============================================================================
// Spend Store Port
// =============================================================================

#[async_trait]
pub trait SpendStorePort: CharacterRepositoryPort + SpendLedgerPort {
    /// Persist a mutated character together with its new pending request
    async fn commit_spend(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError>;

    /// Persist a decided request together with the character it touched.
    ///
    /// Fails with [`StoreError::Conflict`] if the stored request is no longer pending.
    async fn commit_decision(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError>;
}
