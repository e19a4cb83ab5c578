//! Creation step port - The collaborator that runs one creation step

use async_trait::async_trait;

use crate::domain::entities::Character;
use crate::domain::rules::CreationStep;

/// What a step handler reports after running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCompletion {
    Completed,
    /// The player still has work to do on this step
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{step} step failed: {message}")]
pub struct StepError {
    pub step: CreationStep,
    pub message: String,
}

/// Runs the work of one creation step (collecting an attribute allocation,
/// describing a node, ...). May mutate the character.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreationStepHandler: Send + Sync {
    async fn run_step(
        &self,
        step: CreationStep,
        character: &mut Character,
    ) -> Result<StepCompletion, StepError>;
}
