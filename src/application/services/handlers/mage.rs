//! Mage additions: spheres, arete, quintessence, rote points and resonance

use super::{HandlerTable, NamedHandler, RatingHandler, RatingSelector};
use crate::domain::entities::NamedTrait;
use crate::domain::value_objects::{Category, TraitKind, TraitType};

static SPHERE: RatingHandler = RatingHandler::new(RatingSelector::Sphere);
static ARETE: RatingHandler = RatingHandler::new(RatingSelector::Scalar(TraitKind::Arete));
static QUINTESSENCE: RatingHandler =
    RatingHandler::new(RatingSelector::Scalar(TraitKind::Quintessence));
static ROTE_POINTS: RatingHandler =
    RatingHandler::new(RatingSelector::Scalar(TraitKind::RotePoints));
static RESONANCE: NamedHandler = NamedHandler::new(NamedTrait::Resonance, TraitType::Resonance);

pub(super) static MAGE: HandlerTable = &[
    (Category::Sphere, &SPHERE),
    (Category::Arete, &ARETE),
    (Category::Quintessence, &QUINTESSENCE),
    (Category::RotePoints, &ROTE_POINTS),
    (Category::Resonance, &RESONANCE),
];
