//! Spend request - One ledgered spend and its review lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Category, CharacterId, PointPool, SpendRequestId, TraitType, UserId,
};

/// Review state of a spend request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendStatus {
    Pending,
    Approved,
    Denied,
}

impl SpendStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SpendStatus::Pending => "pending",
            SpendStatus::Approved => "approved",
            SpendStatus::Denied => "denied",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, SpendStatus::Pending)
    }
}

impl std::fmt::Display for SpendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpendStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SpendStatus::Pending),
            "approved" => Ok(SpendStatus::Approved),
            "denied" => Ok(SpendStatus::Denied),
            other => Err(format!("Unknown spend status: {}", other)),
        }
    }
}

/// What a mutation did to the sheet, enough to undo it later
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTrait {
    /// Display name shown to reviewers
    pub trait_name: String,
    /// Stable machine key of the mutated trait
    pub trait_key: String,
    pub value: i32,
    pub previous_value: i32,
}

/// A request transition attempted on a closed request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Spend request {id} is already {status}")]
pub struct RequestClosed {
    pub id: SpendRequestId,
    pub status: SpendStatus,
}

/// A ledger row
///
/// `category` is the key the row was bought under, kept as written: old rows
/// may carry keys that no longer parse. Handlers are resolved through
/// `trait_type` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendRequest {
    pub id: SpendRequestId,
    pub character_id: CharacterId,
    pub pool: PointPool,
    pub category: String,
    pub trait_name: String,
    pub trait_type: TraitType,
    pub trait_key: String,
    pub trait_value: i32,
    pub previous_value: i32,
    /// Points drawn from the pool; negative for flaws
    pub cost: i32,
    pub status: SpendStatus,
    pub requester: UserId,
    pub approver: Option<UserId>,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl SpendRequest {
    pub fn pending(
        character_id: CharacterId,
        pool: PointPool,
        category: Category,
        applied: AppliedTrait,
        cost: i32,
        requester: UserId,
    ) -> Self {
        Self {
            id: SpendRequestId::new(),
            character_id,
            pool,
            category: category.as_str().to_string(),
            trait_name: applied.trait_name,
            trait_type: category.trait_type(),
            trait_key: applied.trait_key,
            trait_value: applied.value,
            previous_value: applied.previous_value,
            cost,
            status: SpendStatus::Pending,
            requester,
            approver: None,
            note: String::new(),
            created_at: Utc::now(),
            decided_at: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// The category under its current key, `None` for retired keys
    pub fn current_category(&self) -> Option<Category> {
        self.category.parse().ok()
    }

    pub fn is_pending(&self) -> bool {
        self.status == SpendStatus::Pending
    }

    pub fn approve(&mut self, approver: UserId) -> Result<(), RequestClosed> {
        self.decide(SpendStatus::Approved, approver)
    }

    pub fn deny(&mut self, approver: UserId) -> Result<(), RequestClosed> {
        self.decide(SpendStatus::Denied, approver)
    }

    fn decide(&mut self, status: SpendStatus, approver: UserId) -> Result<(), RequestClosed> {
        if self.status.is_terminal() {
            return Err(RequestClosed {
                id: self.id,
                status: self.status,
            });
        }
        self.status = status;
        self.approver = Some(approver);
        self.decided_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SpendRequest {
        SpendRequest::pending(
            CharacterId::new(),
            PointPool::Freebies,
            Category::Attribute,
            AppliedTrait {
                trait_name: "Strength".into(),
                trait_key: "attribute.strength".into(),
                value: 2,
                previous_value: 1,
            },
            5,
            UserId::new(),
        )
    }

    #[test]
    fn test_pending_row_carries_trait_type() {
        let r = request();
        assert!(r.is_pending());
        assert_eq!(r.trait_type, TraitType::Attribute);
        assert_eq!(r.category, "Attribute");
        assert_eq!(r.current_category(), Some(Category::Attribute));
        assert_eq!(r.approver, None);
    }

    #[test]
    fn test_retired_category_key_is_kept_verbatim() {
        let mut r = request();
        r.category = "Merit/Flaw".into();
        assert_eq!(r.current_category(), None);
        r.approve(UserId::new()).unwrap();
        assert_eq!(r.category, "Merit/Flaw");
    }

    #[test]
    fn test_terminal_states_reject_second_decision() {
        let mut r = request();
        let approver = UserId::new();
        r.approve(approver).unwrap();
        assert_eq!(r.status, SpendStatus::Approved);
        let decided_at = r.decided_at;

        let err = r.deny(UserId::new()).unwrap_err();
        assert_eq!(err.status, SpendStatus::Approved);
        assert_eq!(r.approver, Some(approver));
        assert_eq!(r.decided_at, decided_at);
    }
}
