//! Infrastructure layer - External adapters and implementations
//!
//! - Config: environment-driven settings
//! - Persistence: SQLite and in-memory stores
//! - Permissions: chronicle roster deciding who reviews spending
//! - Step handlers: creation step collaborators
//! - State: wired services

pub mod config;
pub mod permissions;
pub mod persistence;
pub mod state;
pub mod step_handlers;
