//! Trait bounds and purchase steps

use crate::domain::value_objects::{Category, PointPool, TraitKind};

/// The most negative total a character's flaws may reach
pub const FLAW_LIMIT: i32 = -7;

/// Bounds of a category when bought from a given pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitDefinition {
    pub category: Category,
    pub min: i32,
    pub max: i32,
    /// Dots gained by one purchase
    pub step: i32,
}

/// Raised when a purchase is attempted on a trait already at its ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{category} is already at its maximum of {max}")]
pub struct AtMaximum {
    pub category: Category,
    pub max: i32,
}

impl TraitDefinition {
    const fn new(category: Category, min: i32, max: i32) -> Self {
        Self {
            category,
            min,
            max,
            step: 1,
        }
    }

    const fn stepping(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub fn for_category(category: Category, pool: PointPool) -> Self {
        use PointPool::{Freebies, Xp};
        let def = TraitDefinition::new;
        match (category, pool) {
            (Category::Attribute, _) => def(category, 1, 5),
            (Category::Ability, _) => def(category, 0, 5),
            (Category::NewBackground | Category::ExistingBackground, _) => def(category, 0, 5),
            (Category::Willpower, _) => def(category, 1, 10),
            (Category::MeritFlaw, _) => def(category, FLAW_LIMIT, 7),
            (Category::Sphere, _) => def(category, 0, 5),
            (Category::Arete, Freebies) => def(category, 1, 3),
            (Category::Arete, Xp) => def(category, 1, 10),
            (Category::Quintessence, Freebies) => def(category, 0, 20).stepping(4),
            (Category::Quintessence, Xp) => def(category, 0, 20),
            (Category::RotePoints, Freebies) => def(category, 0, i32::MAX).stepping(4),
            (Category::RotePoints, Xp) => def(category, 0, i32::MAX).stepping(3),
            (Category::Resonance | Category::Path | Category::Arcanos, _) => def(category, 0, 5),
            (Category::Ritual | Category::SelectRitual, _) => def(category, 1, 5),
            (Category::Advantage, _) => def(category, 0, 10),
            (Category::Charm, _) => def(category, 0, 1),
            (Category::Pathos, Freebies) => def(category, 0, 10).stepping(2),
            (Category::Pathos, Xp) => def(category, 0, 10),
            (Category::Corpus, _) => def(category, 0, 10),
        }
    }

    pub fn for_kind(kind: TraitKind, pool: PointPool) -> Self {
        Self::for_category(category_of(kind), pool)
    }

    pub fn is_maxed(&self, current: i32) -> bool {
        current >= self.max
    }

    /// Rating after one purchase, clamped to the ceiling
    pub fn next(&self, current: i32) -> Result<i32, AtMaximum> {
        if self.is_maxed(current) {
            return Err(AtMaximum {
                category: self.category,
                max: self.max,
            });
        }
        Ok(current.saturating_add(self.step).min(self.max))
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The spending category that raises a sheet rating
pub fn category_of(kind: TraitKind) -> Category {
    match kind {
        TraitKind::Attribute(_) => Category::Attribute,
        TraitKind::Ability(_) => Category::Ability,
        TraitKind::Sphere(_) => Category::Sphere,
        TraitKind::Willpower => Category::Willpower,
        TraitKind::Arete => Category::Arete,
        TraitKind::Quintessence => Category::Quintessence,
        TraitKind::RotePoints => Category::RotePoints,
        TraitKind::Pathos => Category::Pathos,
        TraitKind::Corpus => Category::Corpus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::AttributeKind;

    #[test]
    fn test_attribute_ceiling() {
        let def = TraitDefinition::for_kind(TraitKind::Attribute(AttributeKind::Wits), PointPool::Xp);
        assert_eq!(def.next(4), Ok(5));
        assert_eq!(
            def.next(5),
            Err(AtMaximum {
                category: Category::Attribute,
                max: 5
            })
        );
    }

    #[test]
    fn test_arete_ceiling_depends_on_pool() {
        assert!(TraitDefinition::for_category(Category::Arete, PointPool::Freebies).is_maxed(3));
        assert!(!TraitDefinition::for_category(Category::Arete, PointPool::Xp).is_maxed(3));
    }

    #[test]
    fn test_block_purchases_clamp_to_ceiling() {
        let quintessence = TraitDefinition::for_category(Category::Quintessence, PointPool::Freebies);
        assert_eq!(quintessence.next(0), Ok(4));
        assert_eq!(quintessence.next(18), Ok(20));

        let pathos = TraitDefinition::for_category(Category::Pathos, PointPool::Freebies);
        assert_eq!(pathos.next(9), Ok(10));

        let rotes = TraitDefinition::for_category(Category::RotePoints, PointPool::Xp);
        assert_eq!(rotes.next(1), Ok(4));
    }

    #[test]
    fn test_merit_flaw_range() {
        let def = TraitDefinition::for_category(Category::MeritFlaw, PointPool::Freebies);
        assert!(def.contains(-7));
        assert!(def.contains(7));
        assert!(!def.contains(-8));
    }
}
