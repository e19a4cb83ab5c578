//! Creation step sequences per archetype

use serde::{Deserialize, Serialize};

use crate::domain::entities::Character;
use crate::domain::value_objects::{Archetype, BackgroundKind};

/// One stage of character creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationStep {
    Attributes,
    Abilities,
    Backgrounds,
    Extras,
    Freebies,
    Languages,
    Specialties,
    // Mage
    Spheres,
    Focus,
    Rotes,
    // Sorcerer
    Psychic,
    Paths,
    Rituals,
    // Wraith
    Arcanoi,
    Passions,
    Fetters,
    /// Fill in the details of every new rating of one background
    Detail(BackgroundKind),
}

use BackgroundKind as Bg;
use CreationStep::*;

const HUMAN_STEPS: &[CreationStep] = &[
    Attributes,
    Abilities,
    Backgrounds,
    Extras,
    Freebies,
    Languages,
    Detail(Bg::Allies),
    Detail(Bg::Mentor),
    Detail(Bg::Contacts),
    Detail(Bg::Retainers),
    Specialties,
];

const MAGE_STEPS: &[CreationStep] = &[
    Attributes,
    Abilities,
    Backgrounds,
    Spheres,
    Focus,
    Extras,
    Freebies,
    Languages,
    Rotes,
    Detail(Bg::Node),
    Detail(Bg::Library),
    Detail(Bg::Familiar),
    Detail(Bg::Wonder),
    Detail(Bg::Enhancement),
    Detail(Bg::Sanctum),
    Detail(Bg::Allies),
    Detail(Bg::Mentor),
    Detail(Bg::Contacts),
    Detail(Bg::Retainers),
    Detail(Bg::Chantry),
    Specialties,
];

const SORCERER_STEPS: &[CreationStep] = &[
    Attributes,
    Abilities,
    Backgrounds,
    Psychic,
    Paths,
    Rituals,
    Extras,
    Freebies,
    Languages,
    Detail(Bg::Node),
    Detail(Bg::Library),
    Detail(Bg::Familiar),
    Detail(Bg::Artifact),
    Detail(Bg::Enhancement),
    Detail(Bg::Sanctum),
    Detail(Bg::Allies),
    Detail(Bg::Chantry),
    Specialties,
];

const COMPANION_STEPS: &[CreationStep] = &[
    Attributes,
    Abilities,
    Backgrounds,
    Extras,
    Freebies,
    Languages,
    Detail(Bg::Node),
    Detail(Bg::Library),
    Detail(Bg::Wonder),
    Detail(Bg::Enhancement),
    Detail(Bg::Sanctum),
    Detail(Bg::Allies),
    Detail(Bg::Chantry),
    Specialties,
];

const WRAITH_STEPS: &[CreationStep] = &[
    Attributes,
    Abilities,
    Backgrounds,
    Arcanoi,
    Passions,
    Fetters,
    Extras,
    Freebies,
    Languages,
    Detail(Bg::Allies),
    Detail(Bg::Mentor),
    Detail(Bg::Contacts),
    Detail(Bg::Retainers),
    Specialties,
];

impl CreationStep {
    pub fn name(self) -> &'static str {
        match self {
            Attributes => "Attributes",
            Abilities => "Abilities",
            Backgrounds => "Backgrounds",
            Extras => "Extras",
            Freebies => "Freebies",
            Languages => "Languages",
            Specialties => "Specialties",
            Spheres => "Spheres",
            Focus => "Focus",
            Rotes => "Rotes",
            Psychic => "Psychic",
            Paths => "Paths",
            Rituals => "Rituals",
            Arcanoi => "Arcanoi",
            Passions => "Passions",
            Fetters => "Fetters",
            Detail(kind) => kind.name(),
        }
    }

    pub fn is_skippable(self) -> bool {
        matches!(self, Detail(_))
    }

    /// A skippable step is skipped when nothing is left for it to describe
    pub fn should_skip(self, character: &Character) -> bool {
        match self {
            Detail(kind) => !character.has_incomplete_background(kind),
            _ => false,
        }
    }

    /// Completion gate checked after the step handler has run.
    ///
    /// `None` defers to whatever the handler reported.
    pub fn gate(self, character: &Character) -> Option<bool> {
        match self {
            Freebies => Some(character.freebies == 0),
            Rotes => Some(character.sheet.rote_points == 0),
            Detail(kind) => Some(!character.has_incomplete_background(kind)),
            _ => None,
        }
    }
}

impl std::fmt::Display for CreationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The ordered steps an archetype walks through
pub fn steps(archetype: Archetype) -> &'static [CreationStep] {
    match archetype {
        Archetype::Human => HUMAN_STEPS,
        Archetype::Mage => MAGE_STEPS,
        Archetype::Sorcerer => SORCERER_STEPS,
        Archetype::Companion => COMPANION_STEPS,
        Archetype::Wraith => WRAITH_STEPS,
    }
}

/// Step under a 1-based cursor, `None` once creation is finished
pub fn step_at(archetype: Archetype, cursor: u32) -> Option<CreationStep> {
    let index = usize::try_from(cursor).ok()?.checked_sub(1)?;
    steps(archetype).get(index).copied()
}

pub fn is_finished(archetype: Archetype, cursor: u32) -> bool {
    usize::try_from(cursor).map_or(true, |c| c > steps(archetype).len())
}
