//! Trait mutator - Apply a priced change to a character, and undo it
//!
//! Applying is infallible: handlers validate and price a [`TraitChange`]
//! before it gets here. Undoing is not, because the sheet may have moved on
//! since the change was applied, so every revert reports a [`RevertOutcome`].

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    AppliedTrait, BackgroundRating, Character, NamedRating, NamedTrait, Ritual,
};
use crate::domain::value_objects::{BackgroundKind, BackgroundRatingId, TraitKind};

/// A validated change to one trait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitChange {
    Rating {
        kind: TraitKind,
        from: i32,
        to: i32,
    },
    NewBackground {
        background: BackgroundKind,
        note: String,
        pooled: bool,
    },
    BackgroundRating {
        id: BackgroundRatingId,
        from: i32,
        to: i32,
    },
    Named {
        list: NamedTrait,
        name: String,
        from: i32,
        to: i32,
    },
    Ritual {
        name: String,
        level: i32,
    },
    Charm {
        name: String,
    },
}

/// Result of undoing a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum RevertOutcome {
    Reverted,
    Failed(String),
}

impl RevertOutcome {
    fn failed(reason: impl Into<String>) -> Self {
        RevertOutcome::Failed(reason.into())
    }

    pub fn is_reverted(&self) -> bool {
        matches!(self, RevertOutcome::Reverted)
    }
}

pub fn apply(character: &mut Character, change: TraitChange) -> AppliedTrait {
    match change {
        TraitChange::Rating { kind, from, to } => {
            character.sheet.set_rating(kind, to);
            AppliedTrait {
                trait_name: kind.name().to_string(),
                trait_key: kind.key(),
                value: to,
                previous_value: from,
            }
        }
        TraitChange::NewBackground {
            background,
            note,
            pooled,
        } => {
            let mut rating = BackgroundRating::new(background, 1).with_note(note);
            rating.pooled = pooled;
            let applied = AppliedTrait {
                trait_name: rating.display_name(),
                trait_key: rating.id.to_string(),
                value: 1,
                previous_value: 0,
            };
            character.backgrounds.push(rating);
            applied
        }
        TraitChange::BackgroundRating { id, from, to } => {
            let trait_name = match character.background_mut(id) {
                Some(rating) => {
                    rating.rating = to;
                    rating.display_name()
                }
                None => id.to_string(),
            };
            AppliedTrait {
                trait_name,
                trait_key: id.to_string(),
                value: to,
                previous_value: from,
            }
        }
        TraitChange::Named {
            list,
            name,
            from,
            to,
        } => {
            set_named(character, list, &name, to);
            AppliedTrait {
                trait_name: name.clone(),
                trait_key: name,
                value: to,
                previous_value: from,
            }
        }
        TraitChange::Ritual { name, level } => {
            character.rituals.push(Ritual {
                name: name.clone(),
                level,
            });
            AppliedTrait {
                trait_name: name.clone(),
                trait_key: name,
                value: level,
                previous_value: 0,
            }
        }
        TraitChange::Charm { name } => {
            character.charms.push(name.clone());
            AppliedTrait {
                trait_name: name.clone(),
                trait_key: name,
                value: 1,
                previous_value: 0,
            }
        }
    }
}

/// Upsert a named rating; a rating of 0 removes the entry
fn set_named(character: &mut Character, list: NamedTrait, name: &str, rating: i32) {
    let entries = character.named_mut(list);
    let position = entries.iter().position(|entry| entry.name == name);
    match (position, rating) {
        (Some(index), 0) => {
            entries.remove(index);
        }
        (Some(index), _) => entries[index].rating = rating,
        (None, 0) => {}
        (None, _) => entries.push(NamedRating::new(name, rating)),
    }
}

/// Take back `applied - previous` dots from a sheet rating
pub fn revert_rating(
    character: &mut Character,
    kind: TraitKind,
    applied: i32,
    previous: i32,
    min: i32,
) -> RevertOutcome {
    let current = character.sheet.rating(kind);
    let target = current - (applied - previous);
    if target < min {
        return RevertOutcome::failed(format!(
            "{} is at {}; removing {} would drop it below {}",
            kind.name(),
            current,
            applied - previous,
            min
        ));
    }
    character.sheet.set_rating(kind, target);
    RevertOutcome::Reverted
}

/// Delete a background rating created by a spend, as long as it is untouched
pub fn revert_new_background(character: &mut Character, id: BackgroundRatingId) -> RevertOutcome {
    let Some(index) = character.backgrounds.iter().position(|bg| bg.id == id) else {
        return RevertOutcome::failed(format!("Background rating {} no longer exists", id));
    };
    let rating = &character.backgrounds[index];
    if rating.rating != 1 {
        return RevertOutcome::failed(format!(
            "{} has been raised to {} since it was bought",
            rating.display_name(),
            rating.rating
        ));
    }
    character.backgrounds.remove(index);
    RevertOutcome::Reverted
}

pub fn revert_background_rating(
    character: &mut Character,
    id: BackgroundRatingId,
    applied: i32,
    previous: i32,
) -> RevertOutcome {
    let Some(index) = character.backgrounds.iter().position(|bg| bg.id == id) else {
        return RevertOutcome::failed(format!("Background rating {} no longer exists", id));
    };
    let target = character.backgrounds[index].rating - (applied - previous);
    if target < 0 {
        return RevertOutcome::failed(format!(
            "{} is already below the rating being reverted",
            character.backgrounds[index].display_name()
        ));
    }
    if target == 0 {
        character.backgrounds.remove(index);
    } else {
        character.backgrounds[index].rating = target;
    }
    RevertOutcome::Reverted
}

/// Take back `applied - previous` dots from a path, resonance, advantage or arcanos
pub fn revert_named(
    character: &mut Character,
    list: NamedTrait,
    name: &str,
    applied: i32,
    previous: i32,
) -> RevertOutcome {
    if !character.named(list).iter().any(|entry| entry.name == name) {
        return RevertOutcome::failed(format!("{} is no longer on the sheet", name));
    }
    let target = character.named_rating(list, name) - (applied - previous);
    if target < 0 {
        return RevertOutcome::failed(format!("{} is already below the reverted rating", name));
    }
    set_named(character, list, name, target);
    RevertOutcome::Reverted
}

/// Restore a merit or flaw to exactly its prior rating
pub fn revert_merit_flaw(
    character: &mut Character,
    name: &str,
    applied: i32,
    previous: i32,
) -> RevertOutcome {
    let current = character.named_rating(NamedTrait::MeritFlaw, name);
    if current != applied {
        return RevertOutcome::failed(format!(
            "{} changed from {} to {} since the request",
            name, applied, current
        ));
    }
    set_named(character, NamedTrait::MeritFlaw, name, previous);
    RevertOutcome::Reverted
}

pub fn revert_ritual(character: &mut Character, name: &str) -> RevertOutcome {
    match character.rituals.iter().position(|r| r.name == name) {
        Some(index) => {
            character.rituals.remove(index);
            RevertOutcome::Reverted
        }
        None => RevertOutcome::failed(format!("Ritual {} is not known", name)),
    }
}

pub fn revert_charm(character: &mut Character, name: &str) -> RevertOutcome {
    match character.charms.iter().position(|c| c == name) {
        Some(index) => {
            character.charms.remove(index);
            RevertOutcome::Reverted
        }
        None => RevertOutcome::failed(format!("Charm {} is not known", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Archetype, AttributeKind, UserId};

    fn character() -> Character {
        Character::new("Rook", UserId::new(), Archetype::Sorcerer)
    }

    const STRENGTH: TraitKind = TraitKind::Attribute(AttributeKind::Strength);

    #[test]
    fn test_rating_apply_then_revert() {
        let mut c = character();
        let applied = apply(
            &mut c,
            TraitChange::Rating {
                kind: STRENGTH,
                from: 1,
                to: 2,
            },
        );
        assert_eq!(applied.trait_key, "attribute.strength");
        assert_eq!(c.sheet.rating(STRENGTH), 2);

        let outcome = revert_rating(&mut c, STRENGTH, 2, 1, 1);
        assert_eq!(outcome, RevertOutcome::Reverted);
        assert_eq!(c.sheet.rating(STRENGTH), 1);
    }

    #[test]
    fn test_rating_revert_refuses_to_cross_minimum() {
        let mut c = character();
        let outcome = revert_rating(&mut c, STRENGTH, 2, 1, 1);
        assert!(!outcome.is_reverted());
        assert_eq!(c.sheet.rating(STRENGTH), 1);
    }

    #[test]
    fn test_willpower_revert_restores_temporary_pairing() {
        let mut c = character();
        apply(
            &mut c,
            TraitChange::Rating {
                kind: TraitKind::Willpower,
                from: 3,
                to: 4,
            },
        );
        c.sheet.temporary_willpower = 1;
        revert_rating(&mut c, TraitKind::Willpower, 4, 3, 1);
        assert_eq!(c.sheet.willpower, 3);
        assert_eq!(c.sheet.temporary_willpower, 3);
    }

    #[test]
    fn test_new_background_revert_deletes_untouched_rating() {
        let mut c = character();
        let applied = apply(
            &mut c,
            TraitChange::NewBackground {
                background: BackgroundKind::Library,
                note: "Hermetic texts".into(),
                pooled: false,
            },
        );
        assert_eq!(applied.trait_name, "Library (Hermetic texts)");
        let id: BackgroundRatingId = applied.trait_key.parse().unwrap();
        assert!(!c.backgrounds[0].complete);

        assert_eq!(revert_new_background(&mut c, id), RevertOutcome::Reverted);
        assert!(c.backgrounds.is_empty());
        assert!(!revert_new_background(&mut c, id).is_reverted());
    }

    #[test]
    fn test_new_background_revert_fails_once_raised() {
        let mut c = character();
        let applied = apply(
            &mut c,
            TraitChange::NewBackground {
                background: BackgroundKind::Resources,
                note: String::new(),
                pooled: true,
            },
        );
        c.backgrounds[0].rating = 2;
        let id = applied.trait_key.parse().unwrap();
        assert!(matches!(revert_new_background(&mut c, id), RevertOutcome::Failed(_)));
        assert_eq!(c.backgrounds.len(), 1);
    }

    #[test]
    fn test_merit_flaw_revert_removes_new_entry() {
        let mut c = character();
        apply(
            &mut c,
            TraitChange::Named {
                list: NamedTrait::MeritFlaw,
                name: "Nightmares".into(),
                from: 0,
                to: -1,
            },
        );
        assert_eq!(c.total_flaws(), -1);
        assert_eq!(revert_merit_flaw(&mut c, "Nightmares", -1, 0), RevertOutcome::Reverted);
        assert!(c.merits_flaws.is_empty());
    }

    #[test]
    fn test_merit_flaw_revert_restores_bought_off_flaw() {
        let mut c = character().with_named(NamedTrait::MeritFlaw, "Enemy", -2);
        apply(
            &mut c,
            TraitChange::Named {
                list: NamedTrait::MeritFlaw,
                name: "Enemy".into(),
                from: -2,
                to: 0,
            },
        );
        assert!(c.merits_flaws.is_empty());
        assert_eq!(revert_merit_flaw(&mut c, "Enemy", 0, -2), RevertOutcome::Reverted);
        assert_eq!(c.named_rating(NamedTrait::MeritFlaw, "Enemy"), -2);
    }

    #[test]
    fn test_named_revert_drops_entry_at_zero() {
        let mut c = character();
        apply(
            &mut c,
            TraitChange::Named {
                list: NamedTrait::Path,
                name: "Alchemy".into(),
                from: 0,
                to: 1,
            },
        );
        assert_eq!(revert_named(&mut c, NamedTrait::Path, "Alchemy", 1, 0), RevertOutcome::Reverted);
        assert!(c.paths.is_empty());
        assert!(!revert_named(&mut c, NamedTrait::Path, "Alchemy", 1, 0).is_reverted());
    }

    #[test]
    fn test_ritual_and_charm_revert() {
        let mut c = character();
        apply(
            &mut c,
            TraitChange::Ritual {
                name: "Ward".into(),
                level: 2,
            },
        );
        apply(&mut c, TraitChange::Charm { name: "Materialize".into() });
        assert_eq!(revert_ritual(&mut c, "Ward"), RevertOutcome::Reverted);
        assert_eq!(revert_charm(&mut c, "Materialize"), RevertOutcome::Reverted);
        assert!(!revert_charm(&mut c, "Materialize").is_reverted());
    }
}
