//! Handlers every archetype inherits

use super::{named_orders, named_target, price, required_value, HandlerTable, Quote, TraitHandler};
use crate::application::services::SpendError;
use crate::domain::entities::{BackgroundRating, Character, NamedTrait, SpendRequest};
use crate::domain::rules::{category_of, CostBasis, TraitDefinition, FLAW_LIMIT};
use crate::domain::services::{trait_mutator, RevertOutcome, TraitChange};
use crate::domain::value_objects::{
    AbilityKind, AttributeKind, BackgroundKind, BackgroundRatingId, Category, PointPool,
    SpendOrder, SpendTarget, SphereKind, TraitKind, TraitType,
};

// =============================================================================
// Sheet ratings
// =============================================================================

/// Which sheet ratings a [`RatingHandler`] accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingSelector {
    Attribute,
    Ability,
    Sphere,
    /// A single scalar such as willpower, addressed with [`SpendTarget::Character`]
    Scalar(TraitKind),
}

/// Raises a rating stored on the trait sheet by one purchase step
#[derive(Debug)]
pub struct RatingHandler {
    selector: RatingSelector,
}

impl RatingHandler {
    pub const fn new(selector: RatingSelector) -> Self {
        Self { selector }
    }

    fn kind(&self, category: Category, target: &SpendTarget) -> Result<TraitKind, SpendError> {
        match (self.selector, target) {
            (RatingSelector::Attribute, SpendTarget::Attribute(kind)) => {
                Ok(TraitKind::Attribute(*kind))
            }
            (RatingSelector::Ability, SpendTarget::Ability(kind)) => Ok(TraitKind::Ability(*kind)),
            (RatingSelector::Sphere, SpendTarget::Sphere(kind)) => Ok(TraitKind::Sphere(*kind)),
            (RatingSelector::Scalar(kind), SpendTarget::Character) => Ok(kind),
            (_, other) => Err(SpendError::invalid_target(
                category,
                format!("{:?} is not a {} target", other, category),
            )),
        }
    }
}

impl TraitHandler for RatingHandler {
    fn trait_type(&self) -> TraitType {
        match self.selector {
            RatingSelector::Attribute => TraitType::Attribute,
            RatingSelector::Ability => TraitType::Ability,
            RatingSelector::Sphere => TraitType::Sphere,
            RatingSelector::Scalar(kind) => category_of(kind).trait_type(),
        }
    }

    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError> {
        let kind = self.kind(category, &order.target)?;
        let current = character.sheet.rating(kind);
        let to = TraitDefinition::for_kind(kind, pool)
            .next(current)
            .map_err(|e| SpendError::at_maximum(kind.name(), e.max))?;
        let affinity =
            matches!(kind, TraitKind::Sphere(sphere) if character.affinity_sphere == Some(sphere));
        let cost = price(
            character,
            pool,
            category,
            CostBasis::at(current).with_affinity(affinity),
        )?;

        Ok(Quote {
            trait_name: kind.name().to_string(),
            cost,
            change: TraitChange::Rating {
                kind,
                from: current,
                to,
            },
        })
    }

    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        let kind: TraitKind = match request.trait_key.parse() {
            Ok(kind) => kind,
            Err(e) => return RevertOutcome::Failed(e.to_string()),
        };
        let min = TraitDefinition::for_kind(kind, request.pool).min;
        trait_mutator::revert_rating(
            character,
            kind,
            request.trait_value,
            request.previous_value,
            min,
        )
    }

    fn candidates(&self, _character: &Character) -> Vec<SpendOrder> {
        match self.selector {
            RatingSelector::Attribute => AttributeKind::ALL
                .iter()
                .map(|k| SpendOrder::new(SpendTarget::Attribute(*k)))
                .collect(),
            RatingSelector::Ability => AbilityKind::ALL
                .iter()
                .map(|k| SpendOrder::new(SpendTarget::Ability(*k)))
                .collect(),
            RatingSelector::Sphere => SphereKind::ALL
                .iter()
                .map(|k| SpendOrder::new(SpendTarget::Sphere(*k)))
                .collect(),
            RatingSelector::Scalar(_) => vec![SpendOrder::new(SpendTarget::Character)],
        }
    }
}

// =============================================================================
// Backgrounds
// =============================================================================

/// Buys the first dot of a background the character does not hold
#[derive(Debug)]
pub struct NewBackgroundHandler;

impl TraitHandler for NewBackgroundHandler {
    fn trait_type(&self) -> TraitType {
        TraitType::NewBackground
    }

    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError> {
        let SpendTarget::Background(background) = order.target else {
            return Err(SpendError::invalid_target(category, "expected a background kind"));
        };
        let cost = price(
            character,
            pool,
            category,
            CostBasis::at(0).with_multiplier(background.multiplier()),
        )?;
        let note = order.note.trim().to_string();

        Ok(Quote {
            trait_name: BackgroundRating::new(background, 1)
                .with_note(note.clone())
                .display_name(),
            cost,
            change: TraitChange::NewBackground {
                background,
                note,
                pooled: order.pooled,
            },
        })
    }

    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        match request.trait_key.parse::<BackgroundRatingId>() {
            Ok(id) => trait_mutator::revert_new_background(character, id),
            Err(e) => RevertOutcome::Failed(format!("Bad background rating key: {}", e)),
        }
    }

    fn candidates(&self, _character: &Character) -> Vec<SpendOrder> {
        BackgroundKind::ALL
            .iter()
            .map(|k| SpendOrder::new(SpendTarget::Background(*k)))
            .collect()
    }
}

/// Raises a background rating already on the sheet
#[derive(Debug)]
pub struct ExistingBackgroundHandler;

impl TraitHandler for ExistingBackgroundHandler {
    fn trait_type(&self) -> TraitType {
        TraitType::Background
    }

    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError> {
        let SpendTarget::BackgroundRating(id) = order.target else {
            return Err(SpendError::invalid_target(category, "expected a background rating"));
        };
        let rating = character.background(id).ok_or_else(|| {
            SpendError::invalid_target(category, format!("no background rating {}", id))
        })?;
        let to = TraitDefinition::for_category(category, pool)
            .next(rating.rating)
            .map_err(|e| SpendError::at_maximum(rating.display_name(), e.max))?;
        let cost = price(
            character,
            pool,
            category,
            CostBasis::at(rating.rating).with_multiplier(rating.background.multiplier()),
        )?;

        Ok(Quote {
            trait_name: rating.display_name(),
            cost,
            change: TraitChange::BackgroundRating {
                id,
                from: rating.rating,
                to,
            },
        })
    }

    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        match request.trait_key.parse::<BackgroundRatingId>() {
            Ok(id) => trait_mutator::revert_background_rating(
                character,
                id,
                request.trait_value,
                request.previous_value,
            ),
            Err(e) => RevertOutcome::Failed(format!("Bad background rating key: {}", e)),
        }
    }

    fn candidates(&self, character: &Character) -> Vec<SpendOrder> {
        character
            .backgrounds
            .iter()
            .map(|bg| SpendOrder::new(SpendTarget::BackgroundRating(bg.id)))
            .collect()
    }
}

// =============================================================================
// Named ratings
// =============================================================================

/// Raises a named rating (path, resonance, arcanos) by one dot, adding it at 1
#[derive(Debug)]
pub struct NamedHandler {
    list: NamedTrait,
    trait_type: TraitType,
}

impl NamedHandler {
    pub const fn new(list: NamedTrait, trait_type: TraitType) -> Self {
        Self { list, trait_type }
    }
}

impl TraitHandler for NamedHandler {
    fn trait_type(&self) -> TraitType {
        self.trait_type
    }

    fn quote(
        &self,
        character: &Character,
        pool: PointPool,
        category: Category,
        order: &SpendOrder,
    ) -> Result<Quote, SpendError> {
        let name = named_target(category, order)?;
        let current = character.named_rating(self.list, name);
        let to = TraitDefinition::for_category(category, pool)
            .next(current)
            .map_err(|e| SpendError::at_maximum(name, e.max))?;
        let cost = price(character, pool, category, CostBasis::at(current))?;

        Ok(Quote {
            trait_name: name.to_string(),
            cost,
            change: TraitChange::Named {
                list: self.list,
                name: name.to_string(),
                from: current,
                to,
            },
        })
    }

    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        trait_mutator::revert_named(
            character,
            self.list,
            &request.trait_key,
            request.trait_value,
            request.previous_value,
        )
    }

    fn candidates(&self, character: &Character) -> Vec<SpendOrder> {
        named_orders(character.named(self.list).iter().map(|e| e.name.as_str()))
    }

    fn opening_cost(&self, character: &Character, pool: PointPool, category: Category) -> Option<i32> {
        price(character, pool, category, CostBasis::at(0)).ok()
    }
}

/// Adds a merit or flaw at the requested rating, or moves one to a new rating with XP
#[derive(Debug)]
pub struct MeritFlawHandler;

impl TraitHandler for MeritFlawHandler {
    fn trait_type(&self) -> TraitType {
        TraitType::MeritFlaw
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
        let def = TraitDefinition::for_category(category, pool);
        if !def.contains(requested) {
            return Err(SpendError::InvalidAmount(format!(
                "{} must be rated between {} and {}",
                name, def.min, def.max
            )));
        }

        let current = character.named_rating(NamedTrait::MeritFlaw, name);
        if requested == current {
            return Err(SpendError::InvalidAmount(format!(
                "{} is already rated {}",
                name, current
            )));
        }
        if pool == PointPool::Freebies && current != 0 {
            return Err(SpendError::invalid_target(
                category,
                format!("{} is already on the sheet", name),
            ));
        }

        let total = character.total_flaws() - current.min(0) + requested.min(0);
        if total < FLAW_LIMIT {
            return Err(SpendError::FlawLimitExceeded {
                total,
                limit: FLAW_LIMIT,
            });
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
                list: NamedTrait::MeritFlaw,
                name: name.to_string(),
                from: current,
                to: requested,
            },
        })
    }

    fn revert(&self, character: &mut Character, request: &SpendRequest) -> RevertOutcome {
        trait_mutator::revert_merit_flaw(
            character,
            &request.trait_key,
            request.trait_value,
            request.previous_value,
        )
    }

    /// Merits come from an outside catalog and need a chosen rating
    fn candidates(&self, _character: &Character) -> Vec<SpendOrder> {
        Vec::new()
    }

    fn opening_cost(&self, character: &Character, pool: PointPool, category: Category) -> Option<i32> {
        price(character, pool, category, CostBasis::at(0).requesting(1)).ok()
    }
}

// =============================================================================
// Human table
// =============================================================================

static ATTRIBUTE: RatingHandler = RatingHandler::new(RatingSelector::Attribute);
static ABILITY: RatingHandler = RatingHandler::new(RatingSelector::Ability);
static WILLPOWER: RatingHandler = RatingHandler::new(RatingSelector::Scalar(TraitKind::Willpower));
static NEW_BACKGROUND: NewBackgroundHandler = NewBackgroundHandler;
static EXISTING_BACKGROUND: ExistingBackgroundHandler = ExistingBackgroundHandler;
static MERIT_FLAW: MeritFlawHandler = MeritFlawHandler;

pub(super) static HUMAN: HandlerTable = &[
    (Category::Attribute, &ATTRIBUTE),
    (Category::Ability, &ABILITY),
    (Category::NewBackground, &NEW_BACKGROUND),
    (Category::ExistingBackground, &EXISTING_BACKGROUND),
    (Category::Willpower, &WILLPOWER),
    (Category::MeritFlaw, &MERIT_FLAW),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NamedRating;
    use crate::domain::value_objects::{Archetype, UserId};
    use crate::application::services::SpendErrorKind;

    fn human() -> Character {
        Character::new("Jo", UserId::new(), Archetype::Human)
    }

    fn order(target: SpendTarget) -> SpendOrder {
        SpendOrder::new(target)
    }

    #[test]
    fn test_attribute_quote() {
        let q = ATTRIBUTE
            .quote(
                &human(),
                PointPool::Freebies,
                Category::Attribute,
                &order(SpendTarget::Attribute(AttributeKind::Strength)),
            )
            .unwrap();
        assert_eq!(q.cost, 5);
        assert_eq!(q.trait_name, "Strength");
        assert_eq!(
            q.change,
            TraitChange::Rating {
                kind: TraitKind::Attribute(AttributeKind::Strength),
                from: 1,
                to: 2
            }
        );
    }

    #[test]
    fn test_wrong_target_is_rejected() {
        let err = ATTRIBUTE
            .quote(
                &human(),
                PointPool::Freebies,
                Category::Attribute,
                &order(SpendTarget::Ability(AbilityKind::Brawl)),
            )
            .unwrap_err();
        assert_eq!(err.kind(), SpendErrorKind::InvalidTarget);
    }

    #[test]
    fn test_maxed_attribute_is_not_offered() {
        let c = human().with_rating(TraitKind::Attribute(AttributeKind::Wits), 5);
        let err = ATTRIBUTE
            .quote(
                &c,
                PointPool::Xp,
                Category::Attribute,
                &order(SpendTarget::Attribute(AttributeKind::Wits)),
            )
            .unwrap_err();
        assert_eq!(err.kind(), SpendErrorKind::TraitAtMaximum);

        let offers = ATTRIBUTE.offers(&c, PointPool::Xp, Category::Attribute);
        assert_eq!(offers.len(), AttributeKind::COUNT - 1);
        assert!(offers
            .iter()
            .all(|o| o.target != SpendTarget::Attribute(AttributeKind::Wits)));
    }

    #[test]
    fn test_new_background_uses_note_as_description() {
        let q = NEW_BACKGROUND
            .quote(
                &human(),
                PointPool::Freebies,
                Category::NewBackground,
                &order(SpendTarget::Background(BackgroundKind::Sanctum)).with_note(" Loft "),
            )
            .unwrap();
        assert_eq!(q.cost, 2);
        assert_eq!(q.trait_name, "Sanctum (Loft)");
    }

    #[test]
    fn test_existing_background_xp_cost() {
        let bg = BackgroundRating::new(BackgroundKind::Resources, 2);
        let id = bg.id;
        let c = human().with_background(bg);
        let q = EXISTING_BACKGROUND
            .quote(
                &c,
                PointPool::Xp,
                Category::ExistingBackground,
                &order(SpendTarget::BackgroundRating(id)),
            )
            .unwrap();
        assert_eq!(q.cost, 6);

        let missing = EXISTING_BACKGROUND.quote(
            &human(),
            PointPool::Xp,
            Category::ExistingBackground,
            &order(SpendTarget::BackgroundRating(id)),
        );
        assert_eq!(missing.unwrap_err().kind(), SpendErrorKind::InvalidTarget);
    }

    #[test]
    fn test_flaw_limit() {
        let mut c = human();
        c.merits_flaws.push(NamedRating::new("Enemy", -5));
        let err = MERIT_FLAW
            .quote(
                &c,
                PointPool::Freebies,
                Category::MeritFlaw,
                &order(SpendTarget::Named("Nightmares".into())).with_value(-3),
            )
            .unwrap_err();
        assert_eq!(err.kind(), SpendErrorKind::FlawLimitExceeded);

        let q = MERIT_FLAW
            .quote(
                &c,
                PointPool::Freebies,
                Category::MeritFlaw,
                &order(SpendTarget::Named("Nightmares".into())).with_value(-2),
            )
            .unwrap();
        assert_eq!(q.cost, -2);
    }

    #[test]
    fn test_merit_needs_a_rating() {
        let err = MERIT_FLAW
            .quote(
                &human(),
                PointPool::Freebies,
                Category::MeritFlaw,
                &order(SpendTarget::Named("Acute Senses".into())),
            )
            .unwrap_err();
        assert_eq!(err.kind(), SpendErrorKind::InvalidAmount);
    }

    #[test]
    fn test_buying_off_a_flaw_with_xp() {
        let mut c = human().with_xp(10);
        c.merits_flaws.push(NamedRating::new("Enemy", -2));
        let q = MERIT_FLAW
            .quote(
                &c,
                PointPool::Xp,
                Category::MeritFlaw,
                &order(SpendTarget::Named("Enemy".into())).with_value(0),
            )
            .unwrap();
        assert_eq!(q.cost, 6);
    }
}
