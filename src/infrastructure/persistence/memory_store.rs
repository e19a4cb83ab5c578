//! In-memory store for tests and throwaway sessions
//!
//! Both commits run under one write lock, which gives the same all-or-nothing
//! behaviour as a database transaction. Writes can be made to fail after a
//! set number of successes to exercise crash recovery.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    CharacterRepositoryPort, SpendLedgerPort, SpendStorePort, StoreError,
};
use crate::domain::entities::{Character, SpendRequest};
use crate::domain::value_objects::{CharacterId, ChronicleId, SpendRequestId};

#[derive(Default)]
struct Tables {
    characters: HashMap<CharacterId, Character>,
    /// Insertion order is creation order
    requests: Vec<SpendRequest>,
}

impl Tables {
    fn request(&self, id: SpendRequestId) -> Option<&SpendRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    fn request_mut(&mut self, id: SpendRequestId) -> Option<&mut SpendRequest> {
        self.requests.iter_mut().find(|r| r.id == id)
    }
}

#[derive(Default)]
pub struct InMemorySpendStore {
    tables: RwLock<Tables>,
    /// Writes left before every write fails, `None` for unlimited
    write_budget: Mutex<Option<usize>>,
    writes: AtomicUsize,
}

impl InMemorySpendStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` more writes succeed, then fail every write until cleared
    pub fn fail_after_commits(&self, n: usize) {
        *self.write_budget.lock().unwrap_or_else(PoisonError::into_inner) = Some(n);
    }

    pub fn clear_failures(&self) {
        *self.write_budget.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        let mut budget = self.write_budget.lock().unwrap_or_else(PoisonError::into_inner);
        match budget.as_mut() {
            Some(0) => Err(StoreError::Injected("write budget exhausted".to_string())),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn finish_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CharacterRepositoryPort for InMemorySpendStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, StoreError> {
        Ok(self.tables.read().await.characters.get(&id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        self.begin_write()?;
        tables.characters.insert(character.id, character.clone());
        self.finish_write();
        Ok(())
    }
}

#[async_trait]
impl SpendLedgerPort for InMemorySpendStore {
    async fn get_request(&self, id: SpendRequestId) -> Result<Option<SpendRequest>, StoreError> {
        Ok(self.tables.read().await.request(id).cloned())
    }

    async fn history(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.character_id == character_id)
            .cloned()
            .collect())
    }

    async fn pending(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.character_id == character_id && r.is_pending())
            .cloned()
            .collect())
    }

    async fn pending_for_chronicle(
        &self,
        chronicle: ChronicleId,
    ) -> Result<Vec<SpendRequest>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| r.is_pending())
            .filter(|r| {
                tables
                    .characters
                    .get(&r.character_id)
                    .is_some_and(|c| c.chronicle == Some(chronicle))
            })
            .cloned()
            .collect())
    }

    async fn pending_count(&self) -> Result<usize, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.requests.iter().filter(|r| r.is_pending()).count())
    }
}

#[async_trait]
impl SpendStorePort for InMemorySpendStore {
    async fn commit_spend(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.request(request.id).is_some() {
            return Err(StoreError::Conflict(format!(
                "spend request {} already exists",
                request.id
            )));
        }
        self.begin_write()?;
        tables.characters.insert(character.id, character.clone());
        tables.requests.push(request.clone());
        self.finish_write();
        Ok(())
    }

    async fn commit_decision(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        match tables.request(request.id) {
            None => return Err(StoreError::NotFound(format!("spend request {}", request.id))),
            Some(stored) if !stored.is_pending() => {
                return Err(StoreError::Conflict(format!(
                    "spend request {} is already {}",
                    request.id, stored.status
                )))
            }
            Some(_) => {}
        }
        self.begin_write()?;
        tables.characters.insert(character.id, character.clone());
        if let Some(stored) = tables.request_mut(request.id) {
            *stored = request.clone();
        }
        self.finish_write();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AppliedTrait;
    use crate::domain::value_objects::{Archetype, Category, PointPool, UserId};

    fn request_for(character: &Character) -> SpendRequest {
        SpendRequest::pending(
            character.id,
            PointPool::Freebies,
            Category::Willpower,
            AppliedTrait {
                trait_name: "Willpower".into(),
                trait_key: "willpower".into(),
                value: 4,
                previous_value: 3,
            },
            1,
            character.owner,
        )
    }

    #[tokio::test]
    async fn test_failed_commit_writes_nothing() {
        let store = InMemorySpendStore::new();
        let character = Character::new("Jo", UserId::new(), Archetype::Human);
        store.save(&character).await.unwrap();

        let mut spent = character.clone();
        spent.freebies = 14;
        store.fail_after_commits(0);
        let err = store.commit_spend(&spent, &request_for(&spent)).await.unwrap_err();
        assert!(matches!(err, StoreError::Injected(_)));
        assert_eq!(store.get(character.id).await.unwrap().unwrap().freebies, 15);
        assert_eq!(store.pending_count().await.unwrap(), 0);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_decision_on_decided_request_conflicts() {
        let store = InMemorySpendStore::new();
        let character = Character::new("Jo", UserId::new(), Archetype::Human);
        let mut request = request_for(&character);
        store.commit_spend(&character, &request).await.unwrap();

        request.approve(UserId::new()).unwrap();
        store.commit_decision(&character, &request).await.unwrap();
        let err = store.commit_decision(&character, &request).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert!(store.pending(character.id).await.unwrap().is_empty());
        assert_eq!(store.history(character.id).await.unwrap().len(), 1);
    }
}
