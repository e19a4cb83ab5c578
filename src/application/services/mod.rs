//! Application services - Use case implementations
//!
//! The spend side (dispatcher, handlers, spend orchestration) and the
//! creation side (step orchestration) share the per-character lock registry.

pub mod creation_service;
pub mod handlers;
pub mod lock_registry;
pub mod spend_dispatcher;
pub mod spend_error;
pub mod spend_service;

pub use creation_service::{AdvanceReport, CreationError, CreationService};
pub use lock_registry::{KeyGuard, LockRegistry};
pub use spend_dispatcher::SpendDispatcher;
pub use spend_error::{SpendError, SpendErrorKind};
pub use spend_service::{DenialReceipt, SpendReceipt, SpendService};
