//! Creation step handlers

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::outbound::{CreationStepHandler, StepCompletion, StepError};
use crate::domain::entities::Character;
use crate::domain::rules::CreationStep;

/// Reports every step complete and leaves the sheet alone.
///
/// Used when the sheet is filled in elsewhere; the built-in gates (freebies
/// spent, rote points spent, backgrounds described) still hold the cursor.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughStepHandler;

#[async_trait]
impl CreationStepHandler for PassThroughStepHandler {
    async fn run_step(
        &self,
        step: CreationStep,
        character: &mut Character,
    ) -> Result<StepCompletion, StepError> {
        debug!(step = %step, character_id = %character.id, "Passing through creation step");
        Ok(StepCompletion::Completed)
    }
}
