//! Point pools a character spends from

use serde::{Deserialize, Serialize};

/// Which balance a spend draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointPool {
    /// One-time creation points
    Freebies,
    /// Advancement points earned in play
    Xp,
}

impl PointPool {
    pub fn as_str(self) -> &'static str {
        match self {
            PointPool::Freebies => "freebies",
            PointPool::Xp => "xp",
        }
    }
}

impl std::fmt::Display for PointPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown pool tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown point pool: {0}")]
pub struct UnknownPool(pub String);

impl std::str::FromStr for PointPool {
    type Err = UnknownPool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "freebies" => Ok(PointPool::Freebies),
            "xp" => Ok(PointPool::Xp),
            other => Err(UnknownPool(other.to_string())),
        }
    }
}

/// A balance change the pool cannot take
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("{pool} balance {balance} cannot cover {cost}")]
    Overdrawn {
        pool: PointPool,
        balance: i32,
        cost: i32,
    },
    #[error("{pool} balance {balance} cannot absorb a change of {cost}")]
    OutOfRange {
        pool: PointPool,
        balance: i32,
        cost: i32,
    },
}
