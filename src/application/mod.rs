//! Application layer - Use cases over the domain
//!
//! - Ports: store, permission and creation-step interfaces
//! - Services: spend dispatcher, spend orchestrator, creation orchestrator

pub mod ports;
pub mod services;
