//! Closed enumerations of the traits a character sheet carries

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned for a trait key that names nothing on the sheet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown trait key: {0}")]
pub struct UnknownTraitKey(pub String);

macro_rules! define_kind {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => ($key:literal, $label:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const COUNT: usize = [$(stringify!($variant)),+].len();

            /// Stable snake_case key
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            /// Display name
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn index(self) -> usize {
                self as usize
            }
        }

        impl FromStr for $name {
            type Err = UnknownTraitKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|k| k.key() == s)
                    .ok_or_else(|| UnknownTraitKey(s.to_string()))
            }
        }
    };
}

define_kind!(
    /// The nine attributes
    AttributeKind {
        Strength => ("strength", "Strength"),
        Dexterity => ("dexterity", "Dexterity"),
        Stamina => ("stamina", "Stamina"),
        Charisma => ("charisma", "Charisma"),
        Manipulation => ("manipulation", "Manipulation"),
        Appearance => ("appearance", "Appearance"),
        Perception => ("perception", "Perception"),
        Intelligence => ("intelligence", "Intelligence"),
        Wits => ("wits", "Wits"),
    }
);

define_kind!(
    /// Talents, skills and knowledges
    AbilityKind {
        Alertness => ("alertness", "Alertness"),
        Athletics => ("athletics", "Athletics"),
        Awareness => ("awareness", "Awareness"),
        Brawl => ("brawl", "Brawl"),
        Empathy => ("empathy", "Empathy"),
        Expression => ("expression", "Expression"),
        Intimidation => ("intimidation", "Intimidation"),
        Leadership => ("leadership", "Leadership"),
        Streetwise => ("streetwise", "Streetwise"),
        Subterfuge => ("subterfuge", "Subterfuge"),
        AnimalKen => ("animal_ken", "Animal Ken"),
        Crafts => ("crafts", "Crafts"),
        Drive => ("drive", "Drive"),
        Etiquette => ("etiquette", "Etiquette"),
        Firearms => ("firearms", "Firearms"),
        Larceny => ("larceny", "Larceny"),
        Melee => ("melee", "Melee"),
        Performance => ("performance", "Performance"),
        Stealth => ("stealth", "Stealth"),
        Survival => ("survival", "Survival"),
        Academics => ("academics", "Academics"),
        Computer => ("computer", "Computer"),
        Finance => ("finance", "Finance"),
        Investigation => ("investigation", "Investigation"),
        Law => ("law", "Law"),
        Medicine => ("medicine", "Medicine"),
        Occult => ("occult", "Occult"),
        Politics => ("politics", "Politics"),
        Science => ("science", "Science"),
        Technology => ("technology", "Technology"),
    }
);

define_kind!(
    /// The nine Spheres of magick
    SphereKind {
        Correspondence => ("correspondence", "Correspondence"),
        Entropy => ("entropy", "Entropy"),
        Forces => ("forces", "Forces"),
        Life => ("life", "Life"),
        Matter => ("matter", "Matter"),
        Mind => ("mind", "Mind"),
        Prime => ("prime", "Prime"),
        Spirit => ("spirit", "Spirit"),
        Time => ("time", "Time"),
    }
);

define_kind!(
    /// Backgrounds a character can hold ratings in
    BackgroundKind {
        Allies => ("allies", "Allies"),
        Arcane => ("arcane", "Arcane"),
        Artifact => ("artifact", "Artifact"),
        Avatar => ("avatar", "Avatar"),
        Chantry => ("chantry", "Chantry"),
        Contacts => ("contacts", "Contacts"),
        Destiny => ("destiny", "Destiny"),
        Enhancement => ("enhancement", "Enhancement"),
        Familiar => ("familiar", "Familiar"),
        Fame => ("fame", "Fame"),
        Influence => ("influence", "Influence"),
        Library => ("library", "Library"),
        Memoriam => ("memoriam", "Memoriam"),
        Mentor => ("mentor", "Mentor"),
        Node => ("node", "Node"),
        Resources => ("resources", "Resources"),
        Retainers => ("retainers", "Retainers"),
        Sanctum => ("sanctum", "Sanctum"),
        Wonder => ("wonder", "Wonder"),
    }
);

impl BackgroundKind {
    /// Cost multiplier applied to both freebie and XP prices
    pub fn multiplier(self) -> i32 {
        match self {
            BackgroundKind::Enhancement | BackgroundKind::Sanctum | BackgroundKind::Chantry => 2,
            _ => 1,
        }
    }

    /// Whether a new rating starts incomplete, waiting for a creation step to
    /// describe it (the node itself, the library's books, ...)
    pub fn needs_detail(self) -> bool {
        matches!(
            self,
            BackgroundKind::Allies
                | BackgroundKind::Artifact
                | BackgroundKind::Chantry
                | BackgroundKind::Contacts
                | BackgroundKind::Enhancement
                | BackgroundKind::Familiar
                | BackgroundKind::Library
                | BackgroundKind::Mentor
                | BackgroundKind::Node
                | BackgroundKind::Retainers
                | BackgroundKind::Sanctum
                | BackgroundKind::Wonder
        )
    }
}

/// Any rating stored directly on the trait sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitKind {
    Attribute(AttributeKind),
    Ability(AbilityKind),
    Sphere(SphereKind),
    Willpower,
    Arete,
    Quintessence,
    RotePoints,
    Pathos,
    Corpus,
}

impl TraitKind {
    /// Stable key written to ledger rows, e.g. `attribute.strength` or `willpower`
    pub fn key(&self) -> String {
        match self {
            TraitKind::Attribute(kind) => format!("attribute.{}", kind.key()),
            TraitKind::Ability(kind) => format!("ability.{}", kind.key()),
            TraitKind::Sphere(kind) => format!("sphere.{}", kind.key()),
            TraitKind::Willpower => "willpower".to_string(),
            TraitKind::Arete => "arete".to_string(),
            TraitKind::Quintessence => "quintessence".to_string(),
            TraitKind::RotePoints => "rote_points".to_string(),
            TraitKind::Pathos => "pathos".to_string(),
            TraitKind::Corpus => "corpus".to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TraitKind::Attribute(kind) => kind.name(),
            TraitKind::Ability(kind) => kind.name(),
            TraitKind::Sphere(kind) => kind.name(),
            TraitKind::Willpower => "Willpower",
            TraitKind::Arete => "Arete",
            TraitKind::Quintessence => "Quintessence",
            TraitKind::RotePoints => "Rote Points",
            TraitKind::Pathos => "Pathos",
            TraitKind::Corpus => "Corpus",
        }
    }
}

impl FromStr for TraitKind {
    type Err = UnknownTraitKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownTraitKey(s.to_string());
        match s.split_once('.') {
            Some(("attribute", key)) => key.parse().map(TraitKind::Attribute).map_err(|_| unknown()),
            Some(("ability", key)) => key.parse().map(TraitKind::Ability).map_err(|_| unknown()),
            Some(("sphere", key)) => key.parse().map(TraitKind::Sphere).map_err(|_| unknown()),
            Some(_) => Err(unknown()),
            None => match s {
                "willpower" => Ok(TraitKind::Willpower),
                "arete" => Ok(TraitKind::Arete),
                "quintessence" => Ok(TraitKind::Quintessence),
                "rote_points" => Ok(TraitKind::RotePoints),
                "pathos" => Ok(TraitKind::Pathos),
                "corpus" => Ok(TraitKind::Corpus),
                _ => Err(unknown()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_counts() {
        assert_eq!(AttributeKind::COUNT, 9);
        assert_eq!(AbilityKind::COUNT, 30);
        assert_eq!(SphereKind::COUNT, 9);
        assert_eq!(AbilityKind::Technology.index(), AbilityKind::COUNT - 1);
    }

    #[test]
    fn test_trait_keys_parse_back() {
        let kinds = [
            TraitKind::Attribute(AttributeKind::Wits),
            TraitKind::Ability(AbilityKind::AnimalKen),
            TraitKind::Sphere(SphereKind::Prime),
            TraitKind::RotePoints,
        ];
        for kind in kinds {
            assert_eq!(kind.key().parse::<TraitKind>().unwrap(), kind);
        }
        assert!("attribute.luck".parse::<TraitKind>().is_err());
        assert!("humanity".parse::<TraitKind>().is_err());
    }

    #[test]
    fn test_background_multipliers() {
        assert_eq!(BackgroundKind::Resources.multiplier(), 1);
        assert_eq!(BackgroundKind::Sanctum.multiplier(), 2);
        assert!(BackgroundKind::Node.needs_detail());
        assert!(!BackgroundKind::Resources.needs_detail());
    }
}
