//! Character archetypes (splats)

use serde::{Deserialize, Serialize};

/// The closed set of character archetypes the engine knows how to build.
///
/// Every archetype other than `Human` composes the human rules and layers its
/// own trait categories and creation steps on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Human,
    Mage,
    Sorcerer,
    Companion,
    Wraith,
}

/// Freebie points granted to every new character
pub const STARTING_FREEBIES: i32 = 15;

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Human,
        Archetype::Mage,
        Archetype::Sorcerer,
        Archetype::Companion,
        Archetype::Wraith,
    ];

    /// The archetype whose rules this one extends
    pub fn parent(self) -> Option<Archetype> {
        match self {
            Archetype::Human => None,
            Archetype::Mage | Archetype::Sorcerer | Archetype::Companion | Archetype::Wraith => {
                Some(Archetype::Human)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Human => "human",
            Archetype::Mage => "mage",
            Archetype::Sorcerer => "sorcerer",
            Archetype::Companion => "companion",
            Archetype::Wraith => "wraith",
        }
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown archetype tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown archetype: {0}")]
pub struct UnknownArchetype(pub String);

impl std::str::FromStr for Archetype {
    type Err = UnknownArchetype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownArchetype(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_splat_extends_human() {
        for archetype in Archetype::ALL {
            match archetype {
                Archetype::Human => assert_eq!(archetype.parent(), None),
                _ => assert_eq!(archetype.parent(), Some(Archetype::Human)),
            }
        }
    }

    #[test]
    fn test_archetype_tag_round_trips() {
        assert_eq!("sorcerer".parse::<Archetype>().unwrap(), Archetype::Sorcerer);
        assert!("vampire".parse::<Archetype>().is_err());
    }
}
