//! Cost calculator
//!
//! Pure pricing functions: given a pool, a category, the character's
//! archetype and the numbers that matter for the purchase, return what it
//! costs. Nothing here reads or writes a character, so affordability scans
//! can price every category freely.

use crate::domain::value_objects::{Archetype, Category, PointPool, UnknownCategory};

/// Price of one purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    Points(i32),
    /// The category cannot be bought from this pool by this archetype
    Unavailable,
}

impl Cost {
    pub fn points(self) -> Option<i32> {
        match self {
            Cost::Points(points) => Some(points),
            Cost::Unavailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Cost::Points(_))
    }
}

/// The inputs a price depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostBasis {
    /// Current rating (0 for traits the character lacks)
    pub current: i32,
    /// Rating asked for; merits, flaws and advantages are priced from it
    pub requested: i32,
    /// Background multiplier
    pub multiplier: i32,
    /// Sphere is the mage's affinity sphere
    pub affinity: bool,
    /// Ritual level
    pub level: i32,
}

impl CostBasis {
    pub fn at(current: i32) -> Self {
        Self {
            current,
            requested: current + 1,
            multiplier: 1,
            affinity: false,
            level: 0,
        }
    }

    pub fn requesting(mut self, requested: i32) -> Self {
        self.requested = requested;
        self
    }

    pub fn with_multiplier(mut self, multiplier: i32) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_affinity(mut self, affinity: bool) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

impl From<UnknownCategory> for CostError {
    fn from(err: UnknownCategory) -> Self {
        CostError::UnknownCategory(err.0)
    }
}

/// Price a purchase by category key
pub fn cost_by_key(
    pool: PointPool,
    category: &str,
    archetype: Archetype,
    basis: &CostBasis,
) -> Result<Cost, CostError> {
    let category: Category = category.parse()?;
    Ok(cost(pool, category, archetype, basis))
}

pub fn cost(pool: PointPool, category: Category, archetype: Archetype, basis: &CostBasis) -> Cost {
    match pool {
        PointPool::Freebies => freebie_cost(category, archetype, basis),
        PointPool::Xp => xp_cost(category, archetype, basis),
    }
}

fn freebie_cost(category: Category, archetype: Archetype, basis: &CostBasis) -> Cost {
    let points = match category {
        Category::Attribute => 5,
        Category::Ability => 2,
        Category::NewBackground | Category::ExistingBackground => basis.multiplier,
        Category::Willpower if archetype == Archetype::Wraith => 2,
        Category::Willpower => 1,
        Category::MeritFlaw => basis.requested,
        Category::Sphere => 7,
        Category::Arete => 4,
        // one point buys a block of dots; see bounds
        Category::Quintessence | Category::RotePoints | Category::Pathos => 1,
        Category::Resonance => 3,
        Category::Path => 7,
        Category::Ritual | Category::SelectRitual => 3,
        Category::Advantage => basis.requested - basis.current,
        Category::Arcanos => 5,
        Category::Charm | Category::Corpus => return Cost::Unavailable,
    };
    Cost::Points(points)
}

fn xp_cost(category: Category, archetype: Archetype, basis: &CostBasis) -> Cost {
    let current = basis.current;
    let points = match category {
        Category::NewBackground | Category::ExistingBackground
            if archetype == Archetype::Wraith =>
        {
            return Cost::Unavailable
        }
        Category::Attribute if current == 0 => 10,
        Category::Attribute => 4 * current,
        Category::Ability if current == 0 => 3,
        Category::Ability => 2 * current,
        Category::NewBackground => 5,
        Category::ExistingBackground => 3 * current * basis.multiplier,
        Category::Willpower => current,
        Category::MeritFlaw | Category::Advantage => 3 * (basis.requested - current).abs(),
        Category::Sphere if current == 0 => 10,
        Category::Sphere if basis.affinity => 7 * current,
        Category::Sphere => 8 * current,
        Category::Arete => 8 * current,
        Category::Quintessence => return Cost::Unavailable,
        Category::RotePoints => 1,
        Category::Resonance if current == 0 => 5,
        Category::Resonance => 3 * current,
        Category::Path if current == 0 => 10,
        Category::Path => 7 * current,
        Category::Ritual | Category::SelectRitual => 2 * basis.level,
        Category::Charm => 5,
        Category::Arcanos if current == 0 => 7,
        Category::Arcanos => 3 * current,
        Category::Pathos => 2 * current.max(1),
        Category::Corpus => current.max(1),
    };
    Cost::Points(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freebies(category: Category, basis: CostBasis) -> Cost {
        cost(PointPool::Freebies, category, Archetype::Human, &basis)
    }

    fn xp(category: Category, basis: CostBasis) -> Cost {
        cost(PointPool::Xp, category, Archetype::Mage, &basis)
    }

    #[test]
    fn test_flat_freebie_costs() {
        assert_eq!(freebies(Category::Attribute, CostBasis::at(1)), Cost::Points(5));
        assert_eq!(freebies(Category::Ability, CostBasis::at(3)), Cost::Points(2));
        assert_eq!(freebies(Category::Willpower, CostBasis::at(5)), Cost::Points(1));
        assert_eq!(
            freebies(Category::ExistingBackground, CostBasis::at(2).with_multiplier(2)),
            Cost::Points(2)
        );
    }

    #[test]
    fn test_xp_costs_scale_with_current_rating() {
        assert_eq!(xp(Category::Attribute, CostBasis::at(3)), Cost::Points(12));
        assert_eq!(xp(Category::Attribute, CostBasis::at(0)), Cost::Points(10));
        assert_eq!(xp(Category::Ability, CostBasis::at(0)), Cost::Points(3));
        assert_eq!(xp(Category::Ability, CostBasis::at(2)), Cost::Points(4));
        assert_eq!(xp(Category::Arete, CostBasis::at(2)), Cost::Points(16));
    }

    #[test]
    fn test_new_background_ignores_multiplier() {
        let basis = CostBasis::at(0).with_multiplier(2);
        assert_eq!(xp(Category::NewBackground, basis), Cost::Points(5));
        assert_eq!(
            xp(Category::ExistingBackground, CostBasis::at(2).with_multiplier(2)),
            Cost::Points(12)
        );
    }

    #[test]
    fn test_affinity_sphere_is_cheaper() {
        assert_eq!(xp(Category::Sphere, CostBasis::at(2)), Cost::Points(16));
        assert_eq!(
            xp(Category::Sphere, CostBasis::at(2).with_affinity(true)),
            Cost::Points(14)
        );
        assert_eq!(xp(Category::Sphere, CostBasis::at(0)), Cost::Points(10));
    }

    #[test]
    fn test_merit_and_flaw_pricing() {
        // freebies: the requested rating, flaws credit the pool
        assert_eq!(freebies(Category::MeritFlaw, CostBasis::at(0).requesting(3)), Cost::Points(3));
        assert_eq!(freebies(Category::MeritFlaw, CostBasis::at(0).requesting(-2)), Cost::Points(-2));
        // xp: three per point of change, either direction
        assert_eq!(xp(Category::MeritFlaw, CostBasis::at(-2).requesting(0)), Cost::Points(6));
        assert_eq!(xp(Category::Advantage, CostBasis::at(1).requesting(4)), Cost::Points(9));
        assert_eq!(freebies(Category::Advantage, CostBasis::at(1).requesting(4)), Cost::Points(3));
    }

    #[test]
    fn test_ritual_priced_by_level() {
        assert_eq!(xp(Category::Ritual, CostBasis::at(0).with_level(3)), Cost::Points(6));
        assert_eq!(freebies(Category::SelectRitual, CostBasis::at(0)), Cost::Points(3));
    }

    #[test]
    fn test_unavailable_entries() {
        assert_eq!(freebies(Category::Charm, CostBasis::at(0)), Cost::Unavailable);
        assert_eq!(freebies(Category::Corpus, CostBasis::at(5)), Cost::Unavailable);
        assert_eq!(xp(Category::Quintessence, CostBasis::at(5)), Cost::Unavailable);
        assert_eq!(
            cost(PointPool::Xp, Category::NewBackground, Archetype::Wraith, &CostBasis::at(0)),
            Cost::Unavailable
        );
    }

    #[test]
    fn test_wraith_overrides() {
        let basis = CostBasis::at(5);
        assert_eq!(
            cost(PointPool::Freebies, Category::Willpower, Archetype::Wraith, &basis),
            Cost::Points(2)
        );
        assert_eq!(
            cost(PointPool::Xp, Category::Pathos, Archetype::Wraith, &CostBasis::at(0)),
            Cost::Points(2)
        );
        assert_eq!(
            cost(PointPool::Xp, Category::Corpus, Archetype::Wraith, &CostBasis::at(7)),
            Cost::Points(7)
        );
    }

    #[test]
    fn test_unknown_category_key() {
        let basis = CostBasis::at(1);
        assert_eq!(
            cost_by_key(PointPool::Freebies, "Attribute", Archetype::Human, &basis),
            Ok(Cost::Points(5))
        );
        assert_eq!(
            cost_by_key(PointPool::Freebies, "Discipline", Archetype::Human, &basis),
            Err(CostError::UnknownCategory("Discipline".into()))
        );
    }
}
