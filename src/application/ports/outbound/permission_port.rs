//! Permission port - Who may review a character's spending

use crate::domain::entities::Character;
use crate::domain::value_objects::UserId;

/// Decides whether an actor may approve, deny or award XP for a character.
///
/// Permission is scoped to the character's chronicle: a storyteller of one
/// chronicle has no say over characters in another.
#[cfg_attr(test, mockall::automock)]
pub trait PermissionGate: Send + Sync {
    fn can_approve(&self, actor: UserId, character: &Character) -> bool;
}
