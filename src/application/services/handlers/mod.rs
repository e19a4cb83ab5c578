//! Trait handlers - One handler per spendable category
//!
//! A handler knows how to read its target off a [`SpendOrder`], validate and
//! price the purchase, and undo it again when a reviewer denies the request.
//! Handlers are stateless statics; the archetype tables in the submodules
//! list which handler serves which category.

mod companion;
mod human;
mod mage;
mod sorcerer;
mod wraith;

use serde::Serialize;

use crate::application::services::SpendError;
use crate::domain::entities::{AppliedTrait, Character, SpendRequest};
use crate::domain::rules::{self, CostBasis};
use crate::domain::services::{trait_mutator, RevertOutcome, TraitChange};
use crate::domain::value_objects::{
    Archetype, Category, PointPool, SpendOrder, SpendTarget, TraitType,
};

pub use human::{
    ExistingBackgroundHandler, MeritFlawHandler, NamedHandler, NewBackgroundHandler,
    RatingHandler, RatingSelector,
};
pub use companion::{AdvantageHandler, CharmHandler};
pub use sorcerer::RitualHandler;

/// A static list of category handlers
pub type HandlerTable = &'static [(Category, &'static dyn TraitHandler)];

/// A validated, priced purchase ready to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub trait_name: String,
    pub cost: i32,
    pub change: TraitChange,
}

/// One concrete thing a character could buy right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub target: SpendTarget,
    pub trait_name: String,
    pub cost: i32,
}

pub trait TraitHandler: Send + Sync {
    /// Ledger key written for requests this handler creates
    fn trait_type(&self) -> TraitType;

    /// Validate and price a purchase without touching the character
    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError>;

    fn apply(&self, character: &mut Character, change: TraitChange) -> AppliedTrait {
        trait_mutator::apply(character, change)
    }

    /// Undo what `apply` did for a ledgered request
    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome;

    /// Targets already on (or enumerable for) the sheet
    fn candidates(&self, character: &Character) -> Vec<SpendOrder>;

    /// Cheapest price of a brand-new entry picked from an outside catalog
    /// (a merit, a ritual, a path), for categories whose targets are not
    /// enumerable from the sheet
    fn opening_cost(
        &self,
        _character: &Character,
        _pool: PointPool,
        _category: Category,
    ) -> Option<i32> {
        None
    }

    /// Every candidate that can be bought, with its price. Maxed traits and
    /// unavailable categories drop out because they fail to quote.
    fn offers(&self, character: &Character, pool: PointPool, category: Category) -> Vec<Offer> {
        self.candidates(character)
            .into_iter()
            .filter_map(|order| {
                let quote = self.quote(character, pool, category, &order).ok()?;
                Some(Offer {
                    target: order.target,
                    trait_name: quote.trait_name,
                    cost: quote.cost,
                })
            })
            .collect()
    }
}

/// The handlers an archetype adds to (or overrides in) its parent's table
pub fn archetype_entries(archetype: Archetype) -> HandlerTable {
    match archetype {
        Archetype::Human => human::HUMAN,
        Archetype::Mage => mage::MAGE,
        Archetype::Sorcerer => sorcerer::SORCERER,
        Archetype::Companion => companion::COMPANION,
        Archetype::Wraith => wraith::WRAITH,
    }
}

fn price(
    character: &Character,
    pool: PointPool,
    category: Category,
    basis: CostBasis,
) -> Result<i32, SpendError> {
    rules::cost(pool, category, character.archetype, &basis)
        .points()
        .ok_or(SpendError::CategoryUnavailable { category, pool })
}

fn named_target(category: Category, order: &SpendOrder) -> Result<&str, SpendError> {
    match &order.target {
        SpendTarget::Named(name) if !name.trim().is_empty() => Ok(name.trim()),
        SpendTarget::Named(_) => Err(SpendError::invalid_target(category, "a name is required")),
        other => Err(SpendError::invalid_target(
            category,
            format!("expected a named trait, got {:?}", other),
        )),
    }
}

fn required_value(order: &SpendOrder) -> Result<i32, SpendError> {
    order
        .value
        .ok_or_else(|| SpendError::InvalidAmount("a rating must be given".to_string()))
}

fn named_orders<'a>(names: impl Iterator<Item = &'a str>) -> Vec<SpendOrder> {
    names
        .map(|name| SpendOrder::new(SpendTarget::Named(name.to_string())))
        .collect()
}
