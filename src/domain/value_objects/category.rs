//! Category and trait-type key spaces
//!
//! Two closed sets of string keys are part of the engine's contract:
//!
//! - [`Category`] keys are the human-facing names a caller spends on
//!   (`"Attribute"`, `"New Background"`, ...).
//! - [`TraitType`] keys are the normalized lowercase identifiers written to
//!   every ledger row and used to resolve approve/deny handlers. Rows written
//!   years ago must stay resolvable, so parsing also accepts retired spellings.

use serde::{Deserialize, Serialize};

/// Error returned for a category key outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Error returned for a trait-type key outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown trait type: {0}")]
pub struct UnknownTraitType(pub String);

/// A spending category, keyed by the name callers use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Attribute,
    Ability,
    NewBackground,
    ExistingBackground,
    Willpower,
    MeritFlaw,
    // Mage
    Sphere,
    Arete,
    Quintessence,
    RotePoints,
    Resonance,
    // Sorcerer
    Path,
    Ritual,
    SelectRitual,
    // Companion
    Advantage,
    Charm,
    // Wraith
    Arcanos,
    Pathos,
    Corpus,
}

impl Category {
    pub const ALL: [Category; 19] = [
        Category::Attribute,
        Category::Ability,
        Category::NewBackground,
        Category::ExistingBackground,
        Category::Willpower,
        Category::MeritFlaw,
        Category::Sphere,
        Category::Arete,
        Category::Quintessence,
        Category::RotePoints,
        Category::Resonance,
        Category::Path,
        Category::Ritual,
        Category::SelectRitual,
        Category::Advantage,
        Category::Charm,
        Category::Arcanos,
        Category::Pathos,
        Category::Corpus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Attribute => "Attribute",
            Category::Ability => "Ability",
            Category::NewBackground => "New Background",
            Category::ExistingBackground => "Existing Background",
            Category::Willpower => "Willpower",
            Category::MeritFlaw => "MeritFlaw",
            Category::Sphere => "Sphere",
            Category::Arete => "Arete",
            Category::Quintessence => "Quintessence",
            Category::RotePoints => "Rote Points",
            Category::Resonance => "Resonance",
            Category::Path => "Path",
            Category::Ritual => "Ritual",
            Category::SelectRitual => "Select Ritual",
            Category::Advantage => "Advantage",
            Category::Charm => "Charm",
            Category::Arcanos => "Arcanos",
            Category::Pathos => "Pathos",
            Category::Corpus => "Corpus",
        }
    }

    /// The ledger key written when this category is spent on
    pub fn trait_type(self) -> TraitType {
        match self {
            Category::Attribute => TraitType::Attribute,
            Category::Ability => TraitType::Ability,
            Category::NewBackground => TraitType::NewBackground,
            Category::ExistingBackground => TraitType::Background,
            Category::Willpower => TraitType::Willpower,
            Category::MeritFlaw => TraitType::MeritFlaw,
            Category::Sphere => TraitType::Sphere,
            Category::Arete => TraitType::Arete,
            Category::Quintessence => TraitType::Quintessence,
            Category::RotePoints => TraitType::Rotes,
            Category::Resonance => TraitType::Resonance,
            Category::Path => TraitType::Path,
            Category::Ritual | Category::SelectRitual => TraitType::Ritual,
            Category::Advantage => TraitType::Advantage,
            Category::Charm => TraitType::Charm,
            Category::Arcanos => TraitType::Arcanos,
            Category::Pathos => TraitType::Pathos,
            Category::Corpus => TraitType::Corpus,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Normalized trait type persisted on each ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TraitType {
    Attribute,
    Ability,
    NewBackground,
    Background,
    Willpower,
    MeritFlaw,
    Sphere,
    Arete,
    Quintessence,
    Rotes,
    Resonance,
    Path,
    Ritual,
    Advantage,
    Charm,
    Arcanos,
    Pathos,
    Corpus,
}

impl TraitType {
    pub const ALL: [TraitType; 18] = [
        TraitType::Attribute,
        TraitType::Ability,
        TraitType::NewBackground,
        TraitType::Background,
        TraitType::Willpower,
        TraitType::MeritFlaw,
        TraitType::Sphere,
        TraitType::Arete,
        TraitType::Quintessence,
        TraitType::Rotes,
        TraitType::Resonance,
        TraitType::Path,
        TraitType::Ritual,
        TraitType::Advantage,
        TraitType::Charm,
        TraitType::Arcanos,
        TraitType::Pathos,
        TraitType::Corpus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TraitType::Attribute => "attribute",
            TraitType::Ability => "ability",
            TraitType::NewBackground => "new-background",
            TraitType::Background => "background",
            TraitType::Willpower => "willpower",
            TraitType::MeritFlaw => "meritflaw",
            TraitType::Sphere => "sphere",
            TraitType::Arete => "arete",
            TraitType::Quintessence => "quintessence",
            TraitType::Rotes => "rotes",
            TraitType::Resonance => "resonance",
            TraitType::Path => "path",
            TraitType::Ritual => "ritual",
            TraitType::Advantage => "advantage",
            TraitType::Charm => "charm",
            TraitType::Arcanos => "arcanos",
            TraitType::Pathos => "pathos",
            TraitType::Corpus => "corpus",
        }
    }

    /// Retired spellings still present on historical ledger rows
    fn legacy_alias(key: &str) -> Option<TraitType> {
        match key {
            "new_background" | "new background" => Some(TraitType::NewBackground),
            "merit_flaw" | "merit/flaw" => Some(TraitType::MeritFlaw),
            "rote_points" | "rote points" => Some(TraitType::Rotes),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TraitType {
    type Err = UnknownTraitType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        TraitType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .or_else(|| TraitType::legacy_alias(&key))
            .ok_or_else(|| UnknownTraitType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys_are_stable() {
        assert_eq!("New Background".parse::<Category>().unwrap(), Category::NewBackground);
        assert_eq!("Rote Points".parse::<Category>().unwrap(), Category::RotePoints);
        // Category keys are case sensitive: they are a UI contract
        assert!("attribute".parse::<Category>().is_err());
    }

    #[test]
    fn test_every_category_round_trips() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_ritual_aliases_share_a_trait_type() {
        assert_eq!(Category::Ritual.trait_type(), Category::SelectRitual.trait_type());
    }

    #[test]
    fn test_legacy_trait_types_still_resolve() {
        assert_eq!("new_background".parse::<TraitType>().unwrap(), TraitType::NewBackground);
        assert_eq!("Merit_Flaw".parse::<TraitType>().unwrap(), TraitType::MeritFlaw);
        assert_eq!("rote_points".parse::<TraitType>().unwrap(), TraitType::Rotes);
        assert!("discipline".parse::<TraitType>().is_err());
    }
}
