//! Outbound ports - Interfaces that the application requires from external systems

mod permission_port;
mod step_handler_port;
mod store_port;

#[cfg(test)]
pub use permission_port::MockPermissionGate;
pub use permission_port::PermissionGate;
#[cfg(test)]
pub use step_handler_port::MockCreationStepHandler;
pub use step_handler_port::{CreationStepHandler, StepCompletion, StepError};
pub use store_port::{CharacterRepositoryPort, SpendLedgerPort, SpendStorePort, StoreError};
