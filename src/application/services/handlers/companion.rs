//! Companion additions: advantages and charms

use super::{named_target, price, required_value, HandlerTable, Quote, TraitHandler};
use crate::application::services::SpendError;
use crate::domain::entities::{Character, NamedTrait, SpendRequest};
use crate::domain::rules::{CostBasis, TraitDefinition};
use crate::domain::services::{trait_mutator, RevertOutcome, TraitChange};
use crate::domain::value_objects::{Category, PointPool, SpendOrder, TraitType};

/// Raises an advantage straight to the requested rating
#[derive(Debug)]
pub struct AdvantageHandler;

impl TraitHandler for AdvantageHandler {
    fn trait_type(&self) -> TraitType {
        TraitType::Advantage
    }

    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError> {
        let name = named_target(category, order)?;
        let requested = required_value(order)?;
        let current = character.named_rating(NamedTrait::Advantage, name);
        let def = TraitDefinition::for_category(category, pool);
        if def.is_maxed(current) {
            return Err(SpendError::at_maximum(name, def.max));
        }
        if requested <= current || requested > def.max {
            return Err(SpendError::InvalidAmount(format!(
                "{} can be raised from {} to at most {}",
                name, current, def.max
            )));
        }
        let cost = price(
            character,
            pool,
            category,
            CostBasis::at(current).requesting(requested),
        )?;

        Ok(Quote {
            trait_name: name.to_string(),
            cost,
            change: TraitChange::Named {
                list: NamedTrait::Advantage,
                name: name.to_string(),
                from: current,
                to: requested,
            },
        })
    }

    /// Advantages can feed derived stats the sheet does not track, so the
    /// revert only restores the rating itself
    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        trait_mutator::revert_named(
            character,
            NamedTrait::Advantage,
            &request.trait_key,
            request.trait_value,
            request.previous_value,
        )
    }

    fn candidates(&self, _character: &Character) -> Vec<SpendOrder> {
        Vec::new()
    }

    fn opening_cost(&self, character: &Character, pool: PointPool, category: Category) -> Option<i32> {
        price(character, pool, category, CostBasis::at(0).requesting(1)).ok()
    }
}

/// Learns a charm; charms are only bought with XP
#[derive(Debug)]
pub struct CharmHandler;

impl TraitHandler for CharmHandler {
    fn trait_type(&self) -> TraitType {
        TraitType::Charm
    }

    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError> {
        let name = named_target(category, order)?;
        if character.has_charm(name) {
            return Err(SpendError::at_maximum(name, 1));
        }
        let cost = price(character, pool, category, CostBasis::at(0))?;

        Ok(Quote {
            trait_name: name.to_string(),
            cost,
            change: TraitChange::Charm {
                name: name.to_string(),
            },
        })
    }

    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        trait_mutator::revert_charm(character, &request.trait_key)
    }

    fn candidates(&self, _character: &Character) -> Vec<SpendOrder> {
        Vec::new()
    }

    fn opening_cost(&self, character: &Character, pool: PointPool, category: Category) -> Option<i32> {
        price(character, pool, category, CostBasis::at(0)).ok()
    }
}

static ADVANTAGE: AdvantageHandler = AdvantageHandler;
static CHARM: CharmHandler = CharmHandler;

pub(super) static COMPANION: HandlerTable = &[
    (Category::Advantage, &ADVANTAGE),
    (Category::Charm, &CHARM),
];
