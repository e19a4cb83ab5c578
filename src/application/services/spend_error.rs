//! Spend error - Failure outcomes of the spend, approve and deny operations

use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::StoreError;
use crate::domain::entities::SpendStatus;
use crate::domain::rules::AtMaximum;
use crate::domain::value_objects::{
    Category, CharacterId, PointPool, PoolError, SpendRequestId, UnknownCategory,
};

/// Machine-readable failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendErrorKind {
    UnknownCategory,
    InsufficientBalance,
    TraitAtMaximum,
    CategoryUnavailable,
    InvalidTarget,
    FlawLimitExceeded,
    InvalidAmount,
    AlreadyProcessed,
    CrossChronicleDenied,
    CharacterNotFound,
    RequestNotFound,
    Storage,
    InvariantViolated,
}

#[derive(Debug, thiserror::Error)]
pub enum SpendError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Not enough {pool}: {cost} needed, {balance} available")]
    InsufficientBalance {
        pool: PointPool,
        cost: i32,
        balance: i32,
    },

    #[error("{trait_name} is already at its maximum of {max}")]
    TraitAtMaximum { trait_name: String, max: i32 },

    #[error("{category} cannot be bought with {pool}")]
    CategoryUnavailable { category: Category, pool: PointPool },

    #[error("Invalid target for {category}: {reason}")]
    InvalidTarget { category: Category, reason: String },

    #[error("Flaws would total {total}, beyond the limit of {limit}")]
    FlawLimitExceeded { total: i32, limit: i32 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Spend request {id} is already {status}")]
    AlreadyProcessed { id: SpendRequestId, status: SpendStatus },

    #[error("Reviewer has no authority over character {0}")]
    CrossChronicleDenied(CharacterId),

    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Spend request not found: {0}")]
    RequestNotFound(SpendRequestId),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("Invariant violated: {0}")]
    InvariantViolated(String),
}

impl SpendError {
    pub fn kind(&self) -> SpendErrorKind {
        match self {
            SpendError::UnknownCategory(_) => SpendErrorKind::UnknownCategory,
            SpendError::InsufficientBalance { .. } => SpendErrorKind::InsufficientBalance,
            SpendError::TraitAtMaximum { .. } => SpendErrorKind::TraitAtMaximum,
            SpendError::CategoryUnavailable { .. } => SpendErrorKind::CategoryUnavailable,
            SpendError::InvalidTarget { .. } => SpendErrorKind::InvalidTarget,
            SpendError::FlawLimitExceeded { .. } => SpendErrorKind::FlawLimitExceeded,
            SpendError::InvalidAmount(_) => SpendErrorKind::InvalidAmount,
            SpendError::AlreadyProcessed { .. } => SpendErrorKind::AlreadyProcessed,
            SpendError::CrossChronicleDenied(_) => SpendErrorKind::CrossChronicleDenied,
            SpendError::CharacterNotFound(_) => SpendErrorKind::CharacterNotFound,
            SpendError::RequestNotFound(_) => SpendErrorKind::RequestNotFound,
            SpendError::Storage(_) => SpendErrorKind::Storage,
            SpendError::InvariantViolated(_) => SpendErrorKind::InvariantViolated,
        }
    }

    /// Storage failures and broken invariants are not the caller's to handle
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            SpendErrorKind::Storage | SpendErrorKind::InvariantViolated
        )
    }

    pub(crate) fn invalid_target(category: Category, reason: impl Into<String>) -> Self {
        SpendError::InvalidTarget {
            category,
            reason: reason.into(),
        }
    }

    pub(crate) fn at_maximum(trait_name: impl Into<String>, max: i32) -> Self {
        SpendError::TraitAtMaximum {
            trait_name: trait_name.into(),
            max,
        }
    }
}

impl From<UnknownCategory> for SpendError {
    fn from(err: UnknownCategory) -> Self {
        SpendError::UnknownCategory(err.0)
    }
}

impl From<PoolError> for SpendError {
    fn from(err: PoolError) -> Self {
        match err {
            PoolError::Overdrawn {
                pool,
                balance,
                cost,
            } => SpendError::InsufficientBalance {
                pool,
                cost,
                balance,
            },
            out_of_range @ PoolError::OutOfRange { .. } => {
                SpendError::InvalidAmount(out_of_range.to_string())
            }
        }
    }
}

impl From<AtMaximum> for SpendError {
    fn from(err: AtMaximum) -> Self {
        SpendError::at_maximum(err.category.as_str(), err.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_storage_and_invariant_failures_are_fatal() {
        let recoverable = SpendError::InsufficientBalance {
            pool: PointPool::Freebies,
            cost: 5,
            balance: 1,
        };
        assert!(!recoverable.is_fatal());
        assert_eq!(recoverable.kind(), SpendErrorKind::InsufficientBalance);
        assert_eq!(recoverable.to_string(), "Not enough freebies: 5 needed, 1 available");

        assert!(SpendError::Storage(StoreError::Database("locked".into())).is_fatal());
        assert!(SpendError::InvariantViolated("xp below zero".into()).is_fatal());
    }
}
