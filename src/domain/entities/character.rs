//! Character entity - A player character and the ratings it spends points on

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    AbilityKind, Archetype, AttributeKind, BackgroundKind, BackgroundRatingId, CharacterId,
    ChronicleId, PointPool, PoolError, SphereKind, TraitKind, UserId, STARTING_FREEBIES,
};

/// A player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// The player account that owns this character
    pub owner: UserId,
    /// Chronicle the character plays in; reviewers are scoped to it
    pub chronicle: Option<ChronicleId>,
    pub archetype: Archetype,

    pub sheet: TraitSheet,
    pub backgrounds: Vec<BackgroundRating>,
    pub merits_flaws: Vec<NamedRating>,
    // Sorcerer
    pub paths: Vec<NamedRating>,
    pub rituals: Vec<Ritual>,
    // Mage
    pub resonance: Vec<NamedRating>,
    pub affinity_sphere: Option<SphereKind>,
    // Companion
    pub advantages: Vec<NamedRating>,
    pub charms: Vec<String>,
    // Wraith
    pub arcanoi: Vec<NamedRating>,

    pub freebies: i32,
    pub xp: i32,
    /// 1-based index into the archetype's creation steps
    pub creation_cursor: u32,
}

impl Character {
    pub fn new(name: impl Into<String>, owner: UserId, archetype: Archetype) -> Self {
        let mut sheet = TraitSheet::default();
        match archetype {
            Archetype::Mage => sheet.arete = 1,
            Archetype::Wraith => {
                sheet.corpus = 10;
                sheet.pathos = 5;
            }
            Archetype::Human | Archetype::Sorcerer | Archetype::Companion => {}
        }

        Self {
            id: CharacterId::new(),
            name: name.into(),
            owner,
            chronicle: None,
            archetype,
            sheet,
            backgrounds: Vec::new(),
            merits_flaws: Vec::new(),
            paths: Vec::new(),
            rituals: Vec::new(),
            resonance: Vec::new(),
            affinity_sphere: None,
            advantages: Vec::new(),
            charms: Vec::new(),
            arcanoi: Vec::new(),
            freebies: STARTING_FREEBIES,
            xp: 0,
            creation_cursor: 1,
        }
    }

    pub fn with_chronicle(mut self, chronicle: ChronicleId) -> Self {
        self.chronicle = Some(chronicle);
        self
    }

    pub fn with_freebies(mut self, freebies: i32) -> Self {
        self.freebies = freebies;
        self
    }

    pub fn with_xp(mut self, xp: i32) -> Self {
        self.xp = xp;
        self
    }

    pub fn with_affinity_sphere(mut self, sphere: SphereKind) -> Self {
        self.affinity_sphere = Some(sphere);
        self
    }

    pub fn with_rating(mut self, kind: TraitKind, value: i32) -> Self {
        self.sheet.set_rating(kind, value);
        self
    }

    pub fn with_background(mut self, rating: BackgroundRating) -> Self {
        self.backgrounds.push(rating);
        self
    }

    pub fn with_named(mut self, list: NamedTrait, name: impl Into<String>, rating: i32) -> Self {
        self.named_mut(list).push(NamedRating::new(name, rating));
        self
    }

    pub fn balance(&self, pool: PointPool) -> i32 {
        match pool {
            PointPool::Freebies => self.freebies,
            PointPool::Xp => self.xp,
        }
    }

    fn balance_mut(&mut self, pool: PointPool) -> &mut i32 {
        match pool {
            PointPool::Freebies => &mut self.freebies,
            PointPool::Xp => &mut self.xp,
        }
    }

    /// Deduct `cost` from a pool. Negative costs (flaws) credit it.
    /// The pool is left untouched if the result would be negative or would
    /// not fit in an `i32`.
    pub fn apply_cost(&mut self, pool: PointPool, cost: i32) -> Result<(), PoolError> {
        let balance = self.balance(pool);
        let next = balance
            .checked_sub(cost)
            .ok_or(PoolError::OutOfRange { pool, balance, cost })?;
        if next < 0 {
            return Err(PoolError::Overdrawn { pool, balance, cost });
        }
        *self.balance_mut(pool) = next;
        Ok(())
    }

    /// Return `amount` to a pool, the inverse of [`Character::apply_cost`]
    pub fn credit(&mut self, pool: PointPool, amount: i32) -> Result<(), PoolError> {
        let cost = amount.checked_neg().ok_or(PoolError::OutOfRange {
            pool,
            balance: self.balance(pool),
            cost: amount,
        })?;
        self.apply_cost(pool, cost)
    }

    pub fn named(&self, list: NamedTrait) -> &[NamedRating] {
        match list {
            NamedTrait::MeritFlaw => &self.merits_flaws,
            NamedTrait::Path => &self.paths,
            NamedTrait::Resonance => &self.resonance,
            NamedTrait::Advantage => &self.advantages,
            NamedTrait::Arcanos => &self.arcanoi,
        }
    }

    pub fn named_mut(&mut self, list: NamedTrait) -> &mut Vec<NamedRating> {
        match list {
            NamedTrait::MeritFlaw => &mut self.merits_flaws,
            NamedTrait::Path => &mut self.paths,
            NamedTrait::Resonance => &mut self.resonance,
            NamedTrait::Advantage => &mut self.advantages,
            NamedTrait::Arcanos => &mut self.arcanoi,
        }
    }

    /// Rating of a named trait, 0 when the character does not have it
    pub fn named_rating(&self, list: NamedTrait, name: &str) -> i32 {
        self.named(list)
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.rating)
            .unwrap_or(0)
    }

    /// Sum of all flaw ratings (zero or negative)
    pub fn total_flaws(&self) -> i32 {
        self.merits_flaws
            .iter()
            .filter(|mf| mf.rating < 0)
            .map(|mf| mf.rating)
            .sum()
    }

    pub fn background(&self, id: BackgroundRatingId) -> Option<&BackgroundRating> {
        self.backgrounds.iter().find(|bg| bg.id == id)
    }

    pub fn background_mut(&mut self, id: BackgroundRatingId) -> Option<&mut BackgroundRating> {
        self.backgrounds.iter_mut().find(|bg| bg.id == id)
    }

    /// Whether any rating of `kind` still waits for its creation-step details
    pub fn has_incomplete_background(&self, kind: BackgroundKind) -> bool {
        self.backgrounds
            .iter()
            .any(|bg| bg.background == kind && !bg.complete)
    }

    pub fn has_ritual(&self, name: &str) -> bool {
        self.rituals.iter().any(|r| r.name == name)
    }

    pub fn has_charm(&self, name: &str) -> bool {
        self.charms.iter().any(|c| c == name)
    }
}

/// Ratings stored directly on the sheet, addressed through [`TraitKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitSheet {
    attributes: [i32; AttributeKind::COUNT],
    abilities: [i32; AbilityKind::COUNT],
    spheres: [i32; SphereKind::COUNT],
    pub willpower: i32,
    pub temporary_willpower: i32,
    pub arete: i32,
    pub quintessence: i32,
    pub rote_points: i32,
    pub pathos: i32,
    pub corpus: i32,
}

impl Default for TraitSheet {
    fn default() -> Self {
        Self {
            attributes: [1; AttributeKind::COUNT],
            abilities: [0; AbilityKind::COUNT],
            spheres: [0; SphereKind::COUNT],
            willpower: 3,
            temporary_willpower: 3,
            arete: 0,
            quintessence: 0,
            rote_points: 0,
            pathos: 0,
            corpus: 0,
        }
    }
}

impl TraitSheet {
    pub fn rating(&self, kind: TraitKind) -> i32 {
        match kind {
            TraitKind::Attribute(k) => self.attributes[k.index()],
            TraitKind::Ability(k) => self.abilities[k.index()],
            TraitKind::Sphere(k) => self.spheres[k.index()],
            TraitKind::Willpower => self.willpower,
            TraitKind::Arete => self.arete,
            TraitKind::Quintessence => self.quintessence,
            TraitKind::RotePoints => self.rote_points,
            TraitKind::Pathos => self.pathos,
            TraitKind::Corpus => self.corpus,
        }
    }

    /// Set a rating. Permanent willpower always drags temporary willpower with it.
    pub fn set_rating(&mut self, kind: TraitKind, value: i32) {
        match kind {
            TraitKind::Attribute(k) => self.attributes[k.index()] = value,
            TraitKind::Ability(k) => self.abilities[k.index()] = value,
            TraitKind::Sphere(k) => self.spheres[k.index()] = value,
            TraitKind::Willpower => {
                self.willpower = value;
                self.temporary_willpower = value;
            }
            TraitKind::Arete => self.arete = value,
            TraitKind::Quintessence => self.quintessence = value,
            TraitKind::RotePoints => self.rote_points = value,
            TraitKind::Pathos => self.pathos = value,
            TraitKind::Corpus => self.corpus = value,
        }
    }
}

/// One held background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundRating {
    pub id: BackgroundRatingId,
    pub background: BackgroundKind,
    pub note: String,
    pub rating: i32,
    /// Shared with a group rather than held personally
    pub pooled: bool,
    /// False until the matching creation step has filled in the details
    pub complete: bool,
}

impl BackgroundRating {
    pub fn new(background: BackgroundKind, rating: i32) -> Self {
        Self {
            id: BackgroundRatingId::new(),
            background,
            note: String::new(),
            rating,
            pooled: false,
            complete: !background.needs_detail(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn incomplete(mut self) -> Self {
        self.complete = false;
        self
    }

    /// "Node (Ley line crossing)" style label
    pub fn display_name(&self) -> String {
        if self.note.is_empty() {
            self.background.name().to_string()
        } else {
            format!("{} ({})", self.background.name(), self.note)
        }
    }
}

/// The named-rating lists a character carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedTrait {
    MeritFlaw,
    Path,
    Resonance,
    Advantage,
    Arcanos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRating {
    pub name: String,
    pub rating: i32,
}

impl NamedRating {
    pub fn new(name: impl Into<String>, rating: i32) -> Self {
        Self {
            name: name.into(),
            rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ritual {
    pub name: String,
    pub level: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mage() -> Character {
        Character::new("Dante", UserId::new(), Archetype::Mage)
    }

    #[test]
    fn test_new_character_defaults() {
        let c = mage();
        assert_eq!(c.freebies, STARTING_FREEBIES);
        assert_eq!(c.xp, 0);
        assert_eq!(c.creation_cursor, 1);
        assert_eq!(c.sheet.rating(TraitKind::Arete), 1);
        assert_eq!(c.sheet.rating(TraitKind::Attribute(AttributeKind::Wits)), 1);
        assert_eq!(c.sheet.rating(TraitKind::Ability(AbilityKind::Occult)), 0);

        let w = Character::new("Moira", UserId::new(), Archetype::Wraith);
        assert_eq!(w.sheet.corpus, 10);
        assert_eq!(w.sheet.arete, 0);
    }

    #[test]
    fn test_apply_cost_never_overdraws() {
        let mut c = mage().with_freebies(3);
        let err = c.apply_cost(PointPool::Freebies, 4).unwrap_err();
        assert!(matches!(err, PoolError::Overdrawn { balance: 3, .. }));
        assert_eq!(c.freebies, 3);

        c.apply_cost(PointPool::Freebies, 3).unwrap();
        assert_eq!(c.freebies, 0);

        // flaws credit the pool
        c.apply_cost(PointPool::Freebies, -2).unwrap();
        assert_eq!(c.freebies, 2);
    }

    #[test]
    fn test_pool_arithmetic_never_wraps() {
        let mut c = mage().with_xp(6);
        let err = c.credit(PointPool::Xp, i32::MAX).unwrap_err();
        assert!(matches!(err, PoolError::OutOfRange { balance: 6, .. }));
        assert!(matches!(
            c.credit(PointPool::Xp, i32::MIN),
            Err(PoolError::OutOfRange { .. })
        ));
        assert!(matches!(
            c.apply_cost(PointPool::Xp, i32::MIN),
            Err(PoolError::OutOfRange { .. })
        ));
        assert_eq!(c.xp, 6);

        c.credit(PointPool::Xp, i32::MAX - 6).unwrap();
        assert_eq!(c.xp, i32::MAX);
    }

    #[test]
    fn test_willpower_keeps_temporary_in_step() {
        let mut sheet = TraitSheet::default();
        sheet.temporary_willpower = 1;
        sheet.set_rating(TraitKind::Willpower, 5);
        assert_eq!(sheet.willpower, 5);
        assert_eq!(sheet.temporary_willpower, 5);
    }

    #[test]
    fn test_total_flaws_ignores_merits() {
        let c = mage()
            .with_named(NamedTrait::MeritFlaw, "Acute Senses", 1)
            .with_named(NamedTrait::MeritFlaw, "Nightmares", -1)
            .with_named(NamedTrait::MeritFlaw, "Enemy", -3);
        assert_eq!(c.total_flaws(), -4);
    }

    #[test]
    fn test_incomplete_backgrounds() {
        let c = mage()
            .with_background(BackgroundRating::new(BackgroundKind::Node, 2))
            .with_background(BackgroundRating::new(BackgroundKind::Resources, 3));
        assert!(c.has_incomplete_background(BackgroundKind::Node));
        assert!(!c.has_incomplete_background(BackgroundKind::Resources));
        assert!(!c.has_incomplete_background(BackgroundKind::Library));
    }
}
