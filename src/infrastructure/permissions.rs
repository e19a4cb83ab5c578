//! Chronicle roster - Storytellers per chronicle
//!
//! A storyteller reviews spending for characters in the chronicles they run.
//! Admins review everything. Characters outside any chronicle can only be
//! reviewed by an admin.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::application::ports::outbound::PermissionGate;
use crate::domain::entities::Character;
use crate::domain::value_objects::{ChronicleId, UserId};

#[derive(Default)]
pub struct ChronicleRoster {
    storytellers: RwLock<HashMap<ChronicleId, HashSet<UserId>>>,
    admins: RwLock<HashSet<UserId>>,
}

impl ChronicleRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_storyteller(&self, chronicle: ChronicleId, user: UserId) {
        debug!(chronicle = %chronicle, user = %user, "Added storyteller");
        self.storytellers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(chronicle)
            .or_default()
            .insert(user);
    }

    pub fn remove_storyteller(&self, chronicle: ChronicleId, user: UserId) {
        if let Some(users) = self
            .storytellers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&chronicle)
        {
            users.remove(&user);
        }
    }

    pub fn add_admin(&self, user: UserId) {
        self.admins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user);
    }

    pub fn is_admin(&self, user: UserId) -> bool {
        self.admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&user)
    }

    pub fn is_storyteller(&self, chronicle: ChronicleId, user: UserId) -> bool {
        self.storytellers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chronicle)
            .is_some_and(|users| users.contains(&user))
    }
}

impl PermissionGate for ChronicleRoster {
    fn can_approve(&self, actor: UserId, character: &Character) -> bool {
        if self.is_admin(actor) {
            return true;
        }
        character
            .chronicle
            .is_some_and(|chronicle| self.is_storyteller(chronicle, actor))
    }
}
