//! Spend dispatcher - Category and trait-type lookup per archetype
//!
//! Each archetype's table is composed once, at construction: the parent's
//! entries first, then the archetype's own, which win on conflict. Two maps
//! come out of that: one keyed by category (to start a spend) and one keyed
//! by trait type (to approve or deny a ledgered request).

use std::collections::{BTreeMap, HashMap};

use crate::application::services::handlers::{
    archetype_entries, HandlerTable, Offer, TraitHandler,
};
use crate::application::services::SpendError;
use crate::domain::entities::Character;
use crate::domain::value_objects::{Archetype, Category, PointPool, TraitType};

struct ArchetypeTable {
    spend: BTreeMap<Category, &'static dyn TraitHandler>,
    finalize: HashMap<TraitType, &'static dyn TraitHandler>,
}

impl ArchetypeTable {
    fn compose(layers: &[HandlerTable]) -> Self {
        let mut spend = BTreeMap::new();
        for layer in layers {
            for (category, handler) in layer.iter() {
                spend.insert(*category, *handler);
            }
        }
        let finalize = spend
            .values()
            .map(|handler| (handler.trait_type(), *handler))
            .collect();
        Self { spend, finalize }
    }
}

pub struct SpendDispatcher {
    tables: HashMap<Archetype, ArchetypeTable>,
}

impl SpendDispatcher {
    pub fn new() -> Self {
        let tables = Archetype::ALL
            .into_iter()
            .map(|archetype| (archetype, ArchetypeTable::compose(&layers(archetype))))
            .collect();
        Self { tables }
    }

    fn table(&self, archetype: Archetype) -> Option<&ArchetypeTable> {
        self.tables.get(&archetype)
    }

    /// Resolve the handler that starts a spend in `category`
    pub fn dispatch(
        &self,
        archetype: Archetype,
        category: &str,
    ) -> Result<(Category, &'static dyn TraitHandler), SpendError> {
        let parsed: Category = category.parse()?;
        self.handler(archetype, parsed)
            .map(|handler| (parsed, handler))
            .ok_or_else(|| SpendError::UnknownCategory(category.to_string()))
    }

    pub fn handler(
        &self,
        archetype: Archetype,
        category: Category,
    ) -> Option<&'static dyn TraitHandler> {
        self.table(archetype)?.spend.get(&category).copied()
    }

    /// Resolve the handler that approves or reverts a ledger row's trait type.
    /// Retired spellings of the trait type resolve too.
    pub fn finalizer(
        &self,
        archetype: Archetype,
        trait_type: &str,
    ) -> Option<&'static dyn TraitHandler> {
        let parsed: TraitType = trait_type.parse().ok()?;
        self.table(archetype)?.finalize.get(&parsed).copied()
    }

    /// Categories the archetype can spend on, in a stable order
    pub fn categories(&self, archetype: Archetype) -> Vec<Category> {
        self.table(archetype)
            .map(|table| table.spend.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Categories with at least one purchase the character can pay for now
    pub fn affordable_categories(&self, character: &Character, pool: PointPool) -> Vec<Category> {
        let balance = character.balance(pool);
        let Some(table) = self.table(character.archetype) else {
            return Vec::new();
        };
        table
            .spend
            .iter()
            .filter(|(category, handler)| {
                let category = **category;
                handler
                    .offers(character, pool, category)
                    .iter()
                    .any(|offer| offer.cost <= balance)
                    || handler
                        .opening_cost(character, pool, category)
                        .is_some_and(|cost| cost <= balance)
            })
            .map(|(category, _)| *category)
            .collect()
    }

    /// Concrete purchases in one category, maxed traits excluded
    pub fn offers(
        &self,
        character: &Character,
        pool: PointPool,
        category: &str,
    ) -> Result<Vec<Offer>, SpendError> {
        let (category, handler) = self.dispatch(character.archetype, category)?;
        Ok(handler.offers(character, pool, category))
    }
}

impl Default for SpendDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Own entries last so they override inherited ones
fn layers(archetype: Archetype) -> Vec<HandlerTable> {
    let mut layers = match archetype.parent() {
        Some(parent) => layers(parent),
        None => Vec::new(),
    };
    layers.push(archetype_entries(archetype));
    layers
}
