//! Game rules - Pure pricing, bounds and creation sequences

pub mod bounds;
pub mod costs;
pub mod creation;

pub use bounds::{category_of, AtMaximum, TraitDefinition, FLAW_LIMIT};
pub use costs::{cost, cost_by_key, Cost, CostBasis, CostError};
pub use creation::{is_finished, step_at, steps, CreationStep};
