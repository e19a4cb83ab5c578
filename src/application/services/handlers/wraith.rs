//! Wraith additions: arcanoi, pathos and corpus

use super::{HandlerTable, NamedHandler, RatingHandler, RatingSelector};
use crate::domain::entities::NamedTrait;
use crate::domain::value_objects::{Category, TraitKind, TraitType};

static ARCANOS: NamedHandler = NamedHandler::new(NamedTrait::Arcanos, TraitType::Arcanos);
static PATHOS: RatingHandler = RatingHandler::new(RatingSelector::Scalar(TraitKind::Pathos));
static CORPUS: RatingHandler = RatingHandler::new(RatingSelector::Scalar(TraitKind::Corpus));

// Wraith willpower pricing lives in the cost table, so the inherited
// handler is kept as is.
pub(super) static WRAITH: HandlerTable = &[
    (Category::Arcanos, &ARCANOS),
    (Category::Pathos, &PATHOS),
    (Category::Corpus, &CORPUS),
];
