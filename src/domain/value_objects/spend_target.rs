//! What a spend is aimed at

use serde::{Deserialize, Serialize};

use super::{AbilityKind, AttributeKind, BackgroundKind, BackgroundRatingId, SphereKind};

/// The trait a caller wants to raise.
///
/// Which variant a category accepts is decided by its handler; a mismatch is
/// rejected as an invalid target before anything is priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SpendTarget {
    Attribute(AttributeKind),
    Ability(AbilityKind),
    Sphere(SphereKind),
    /// A background the character does not hold yet
    Background(BackgroundKind),
    /// A background rating already on the sheet
    BackgroundRating(BackgroundRatingId),
    /// A merit, flaw, path, resonance, advantage, arcanos, ritual or charm by name
    Named(String),
    /// A scalar stored on the sheet itself (willpower, arete, pathos, ...)
    Character,
}

/// A spend as submitted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendOrder {
    pub target: SpendTarget,
    /// Requested rating for merits, flaws and advantages; level for rituals
    pub value: Option<i32>,
    /// Free-text note, also used as the description of a new background
    pub note: String,
    /// New backgrounds only: whether the rating is shared with a group
    pub pooled: bool,
}

impl SpendOrder {
    pub fn new(target: SpendTarget) -> Self {
        Self {
            target,
            value: None,
            note: String::new(),
            pooled: false,
        }
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn pooled(mut self) -> Self {
        self.pooled = true;
        self
    }
}
