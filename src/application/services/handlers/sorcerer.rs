//! Sorcerer additions: paths and rituals

use super::{named_target, price, required_value, HandlerTable, NamedHandler, Quote, TraitHandler};
use crate::application::services::SpendError;
use crate::domain::entities::{Character, NamedTrait, SpendRequest};
use crate::domain::rules::{CostBasis, TraitDefinition};
use crate::domain::services::{trait_mutator, RevertOutcome, TraitChange};
use crate::domain::value_objects::{Category, PointPool, SpendOrder, TraitType};

/// Learns a ritual of a given level; each ritual is learned once
#[derive(Debug)]
pub struct RitualHandler;

impl TraitHandler for RitualHandler {
    fn trait_type(&self) -> TraitType {
        TraitType::Ritual
    }

    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError> {
        let name = named_target(category, order)?;
        let level = required_value(order)?;
        let def = TraitDefinition::for_category(category, pool);
        if !def.contains(level) {
            return Err(SpendError::InvalidAmount(format!(
                "ritual level must be between {} and {}",
                def.min, def.max
            )));
        }
        if character.has_ritual(name) {
            return Err(SpendError::at_maximum(name, 1));
        }
        let cost = price(character, pool, category, CostBasis::at(0).with_level(level))?;

        Ok(Quote {
            trait_name: name.to_string(),
            cost,
            change: TraitChange::Ritual {
                name: name.to_string(),
                level,
            },
        })
    }

    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        trait_mutator::revert_ritual(character, &request.trait_key)
    }

    fn candidates(&self, _character: &Character) -> Vec<SpendOrder> {
        Vec::new()
    }

    fn opening_cost(&self, character: &Character, pool: PointPool, category: Category) -> Option<i32> {
        price(character, pool, category, CostBasis::at(0).with_level(1)).ok()
    }
}

static PATH: NamedHandler = NamedHandler::new(NamedTrait::Path, TraitType::Path);
static RITUAL: RitualHandler = RitualHandler;

pub(super) static SORCERER: HandlerTable = &[
    (Category::Path, &PATH),
    (Category::Ritual, &RITUAL),
    (Category::SelectRitual, &RITUAL),
];
