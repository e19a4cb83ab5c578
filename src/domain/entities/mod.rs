//! Domain entities - Core business objects with identity

mod character;
mod spend_request;

pub use character::{BackgroundRating, Character, NamedRating, NamedTrait, Ritual, TraitSheet};
pub use spend_request::{AppliedTrait, RequestClosed, SpendRequest, SpendStatus};
