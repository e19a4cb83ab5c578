//! Creation Service - Walks a character through its archetype's creation steps
//!
//! `advance` runs the step under the cursor, moves past it once its gate
//! passes, then skips background-detail steps with nothing to describe.
//! Every cursor increment is saved on its own, so an interrupted scan resumes
//! from the last saved step.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{
    CharacterRepositoryPort, CreationStepHandler, StepCompletion, StepError, StoreError,
};
use crate::application::services::LockRegistry;
use crate::domain::entities::Character;
use crate::domain::rules::{self, CreationStep};
use crate::domain::value_objects::CharacterId;

#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

/// What happened to the step under the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Creation was already over; nothing ran
    Finished,
    /// The step ran but its gate did not pass
    Incomplete,
    /// The step ran and the cursor moved past it
    Completed,
    /// An interrupted skip scan was picked up without running a step
    Resumed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvanceReport {
    pub outcome: AdvanceOutcome,
    /// Step that was under the cursor on entry
    pub step: Option<CreationStep>,
    /// Steps passed over by the skip scan, in order
    pub skipped: Vec<CreationStep>,
    /// Cursor on exit
    pub cursor: u32,
    /// Step now waiting, `None` when creation is done
    pub next: Option<CreationStep>,
}

impl AdvanceReport {
    pub fn is_finished(&self) -> bool {
        self.next.is_none()
    }
}

pub struct CreationService {
    store: Arc<dyn CharacterRepositoryPort>,
    handler: Arc<dyn CreationStepHandler>,
    locks: Arc<LockRegistry<CharacterId>>,
}

impl CreationService {
    pub fn new(
        store: Arc<dyn CharacterRepositoryPort>,
        handler: Arc<dyn CreationStepHandler>,
        locks: Arc<LockRegistry<CharacterId>>,
    ) -> Self {
        Self {
            store,
            handler,
            locks,
        }
    }

    #[instrument(skip(self))]
    pub async fn advance(&self, character_id: CharacterId) -> Result<AdvanceReport, CreationError> {
        let _guard = self.locks.acquire(&character_id).await;
        let mut character = self
            .store
            .get(character_id)
            .await?
            .ok_or(CreationError::CharacterNotFound(character_id))?;

        let Some(step) = rules::step_at(character.archetype, character.creation_cursor) else {
            debug!(cursor = character.creation_cursor, "Creation already finished");
            return Ok(report(AdvanceOutcome::Finished, None, Vec::new(), &character));
        };

        let outcome = if step.is_skippable() && step.should_skip(&character) {
            info!(step = %step, cursor = character.creation_cursor, "Resuming skip scan");
            AdvanceOutcome::Resumed
        } else {
            let completion = self.handler.run_step(step, &mut character).await?;
            let done = step
                .gate(&character)
                .unwrap_or(completion == StepCompletion::Completed);
            if !done {
                self.store.save(&character).await?;
                debug!(step = %step, "Step not complete yet");
                return Ok(report(AdvanceOutcome::Incomplete, Some(step), Vec::new(), &character));
            }

            character.creation_cursor += 1;
            self.store.save(&character).await?;
            info!(step = %step, cursor = character.creation_cursor, "Completed creation step");
            AdvanceOutcome::Completed
        };

        let skipped = self.skip_scan(&mut character).await?;
        Ok(report(outcome, Some(step), skipped, &character))
    }

    /// Step past consecutive skippable steps, saving after each one
    async fn skip_scan(&self, character: &mut Character) -> Result<Vec<CreationStep>, CreationError> {
        let mut skipped = Vec::new();
        while let Some(step) = rules::step_at(character.archetype, character.creation_cursor) {
            if !(step.is_skippable() && step.should_skip(character)) {
                break;
            }
            character.creation_cursor += 1;
            self.store.save(character).await?;
            debug!(step = %step, cursor = character.creation_cursor, "Skipped creation step");
            skipped.push(step);
        }
        Ok(skipped)
    }
}

fn report(
    outcome: AdvanceOutcome,
    step: Option<CreationStep>,
    skipped: Vec<CreationStep>,
    character: &Character,
) -> AdvanceReport {
    AdvanceReport {
        outcome,
        step,
        skipped,
        cursor: character.creation_cursor,
        next: rules::step_at(character.archetype, character.creation_cursor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::MockCreationStepHandler;
    use crate::domain::entities::BackgroundRating;
    use crate::domain::value_objects::{Archetype, BackgroundKind, TraitKind, UserId};
    use crate::infrastructure::persistence::InMemorySpendStore;

    fn service(
        store: Arc<InMemorySpendStore>,
        handler: MockCreationStepHandler,
    ) -> CreationService {
        CreationService::new(store, Arc::new(handler), Arc::new(LockRegistry::new()))
    }

    /// A mage sitting on Rotes with every rote point spent and one Wonder
    /// still to describe
    fn mage_at_rotes() -> Character {
        let mut mage = Character::new("Ilse", UserId::new(), Archetype::Mage)
            .with_rating(TraitKind::RotePoints, 0)
            .with_background(BackgroundRating::new(BackgroundKind::Wonder, 1).incomplete());
        mage.creation_cursor = 9;
        mage
    }

    async fn stored(store: &InMemorySpendStore, id: CharacterId) -> Character {
        store.get(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_completed_step_then_skips_to_first_pending_detail() {
        let store = Arc::new(InMemorySpendStore::new());
        let mage = mage_at_rotes();
        let id = mage.id;
        store.save(&mage).await.unwrap();

        let mut handler = MockCreationStepHandler::new();
        handler
            .expect_run_step()
            .withf(|step, _| *step == CreationStep::Rotes)
            .times(1)
            .returning(|_, _| Ok(StepCompletion::Completed));

        let writes = store.write_count();
        let report = service(store.clone(), handler).advance(id).await.unwrap();
        assert_eq!(report.outcome, AdvanceOutcome::Completed);
        assert_eq!(
            report.skipped,
            vec![
                CreationStep::Detail(BackgroundKind::Node),
                CreationStep::Detail(BackgroundKind::Library),
                CreationStep::Detail(BackgroundKind::Familiar),
            ]
        );
        assert_eq!(report.cursor, 13);
        assert_eq!(report.next, Some(CreationStep::Detail(BackgroundKind::Wonder)));
        assert_eq!(stored(&store, id).await.creation_cursor, 13);
        // one save for the step and one per skip
        assert_eq!(store.write_count() - writes, 4);
    }

    #[tokio::test]
    async fn test_interrupted_scan_resumes_without_rerunning_the_step() {
        let store = Arc::new(InMemorySpendStore::new());
        let mage = mage_at_rotes();
        let id = mage.id;
        store.save(&mage).await.unwrap();

        let mut handler = MockCreationStepHandler::new();
        handler
            .expect_run_step()
            .times(1)
            .returning(|_, _| Ok(StepCompletion::Completed));
        let service = service(store.clone(), handler);

        // crash after the step commit and the first skip commit
        store.fail_after_commits(2);
        let err = service.advance(id).await.unwrap_err();
        assert!(matches!(err, CreationError::Storage(_)));
        assert_eq!(stored(&store, id).await.creation_cursor, 11);

        store.clear_failures();
        let report = service.advance(id).await.unwrap();
        assert_eq!(report.outcome, AdvanceOutcome::Resumed);
        assert_eq!(
            report.skipped,
            vec![
                CreationStep::Detail(BackgroundKind::Library),
                CreationStep::Detail(BackgroundKind::Familiar),
            ]
        );
        assert_eq!(report.cursor, 13);
        assert_eq!(stored(&store, id).await.creation_cursor, 13);
    }

    #[tokio::test]
    async fn test_gate_overrides_handler() {
        let store = Arc::new(InMemorySpendStore::new());
        let mage = mage_at_rotes().with_rating(TraitKind::RotePoints, 4);
        let id = mage.id;
        store.save(&mage).await.unwrap();

        let mut handler = MockCreationStepHandler::new();
        handler
            .expect_run_step()
            .returning(|_, _| Ok(StepCompletion::Completed));

        let report = service(store.clone(), handler).advance(id).await.unwrap();
        assert_eq!(report.outcome, AdvanceOutcome::Incomplete);
        assert_eq!(report.cursor, 9);
        assert!(report.skipped.is_empty());
        assert_eq!(stored(&store, id).await.creation_cursor, 9);
    }

    #[tokio::test]
    async fn test_handler_reports_incomplete() {
        let store = Arc::new(InMemorySpendStore::new());
        let human = Character::new("Jo", UserId::new(), Archetype::Human);
        let id = human.id;
        store.save(&human).await.unwrap();

        let mut handler = MockCreationStepHandler::new();
        handler
            .expect_run_step()
            .withf(|step, _| *step == CreationStep::Attributes)
            .returning(|_, _| Ok(StepCompletion::Incomplete));

        let report = service(store.clone(), handler).advance(id).await.unwrap();
        assert_eq!(report.outcome, AdvanceOutcome::Incomplete);
        assert_eq!(report.next, Some(CreationStep::Attributes));
        assert_eq!(stored(&store, id).await.creation_cursor, 1);
    }

    #[tokio::test]
    async fn test_skips_run_off_the_end() {
        let store = Arc::new(InMemorySpendStore::new());
        let mut human = Character::new("Jo", UserId::new(), Archetype::Human).with_freebies(0);
        human.creation_cursor = 5;
        let id = human.id;
        store.save(&human).await.unwrap();

        let mut handler = MockCreationStepHandler::new();
        handler
            .expect_run_step()
            .returning(|_, _| Ok(StepCompletion::Completed));
        let service = service(store.clone(), handler);

        // Freebies, then Languages
        service.advance(id).await.unwrap();
        let report = service.advance(id).await.unwrap();
        assert_eq!(report.step, Some(CreationStep::Languages));
        assert_eq!(report.skipped.len(), 4);
        assert_eq!(report.next, Some(CreationStep::Specialties));

        let report = service.advance(id).await.unwrap();
        assert!(report.is_finished());

        let report = service.advance(id).await.unwrap();
        assert_eq!(report.outcome, AdvanceOutcome::Finished);
        assert_eq!(report.cursor, 12);
    }

    #[tokio::test]
    async fn test_step_error_leaves_cursor() {
        let store = Arc::new(InMemorySpendStore::new());
        let human = Character::new("Jo", UserId::new(), Archetype::Human);
        let id = human.id;
        store.save(&human).await.unwrap();

        let mut handler = MockCreationStepHandler::new();
        handler.expect_run_step().returning(|step, _| {
            Err(StepError {
                step,
                message: "allocation over budget".into(),
            })
        });

        let err = service(store.clone(), handler).advance(id).await.unwrap_err();
        assert!(matches!(err, CreationError::Step(_)));
        assert_eq!(stored(&store, id).await.creation_cursor, 1);
    }

    #[tokio::test]
    async fn test_unknown_character() {
        let store = Arc::new(InMemorySpendStore::new());
        let handler = MockCreationStepHandler::new();
        let err = service(store, handler)
            .advance(CharacterId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CreationError::CharacterNotFound(_)));
    }
}
