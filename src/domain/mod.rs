//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Character, SpendRequest
//! - Value Objects: ids, archetypes, categories, trait kinds, spend targets
//! - Rules: cost calculator, trait bounds, creation sequences
//! - Domain Services: the trait mutator

pub mod entities;
pub mod rules;
pub mod services;
pub mod value_objects;
