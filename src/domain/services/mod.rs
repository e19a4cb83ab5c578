//! Domain services - Operations on entities that don't belong to one of them

pub mod trait_mutator;

pub use trait_mutator::{apply, RevertOutcome, TraitChange};
