//! Value objects - Immutable objects defined by their attributes

mod archetype;
mod category;
mod ids;
mod pool;
mod spend_target;
mod trait_kinds;

pub use archetype::{Archetype, UnknownArchetype, STARTING_FREEBIES};
pub use category::{Category, TraitType, UnknownCategory, UnknownTraitType};
pub use ids::*;
pub use pool::{PointPool, PoolError, UnknownPool};
pub use spend_target::{SpendOrder, SpendTarget};
pub use trait_kinds::{
    AbilityKind, AttributeKind, BackgroundKind, SphereKind, TraitKind, UnknownTraitKey,
};
