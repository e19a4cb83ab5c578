//! Chargen Engine - Freebie and XP spending for World of Darkness characters
//!
//! The engine:
//! - Prices and applies trait purchases from the freebie and XP pools
//! - Ledgers every purchase for storyteller review, reverting denied ones
//! - Walks new characters through their archetype's creation steps

pub mod application;
pub mod domain;
pub mod infrastructure;
