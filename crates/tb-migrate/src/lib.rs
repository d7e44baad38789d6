//! tb-migrate - Migration layer for TackleBox
//!
//! This crate provides the versioned [`MigrationRegistry`], the generic
//! [`copy_all`] routine used by migration steps, the built-in steps, and the
//! [`ModelManager`] that opens, migrates, and switches the active store.

pub mod copy;
pub mod error;
pub mod history;
pub mod manager;
pub mod registry;
pub mod steps;

pub use copy::copy_all;
pub use error::{ManagerError, ManagerResult, MigrationError, MigrationResult};
pub use history::MigrationEntry;
pub use manager::{ContainerEvent, ManagerState, ModelManager, OpenPath, Schemas};
pub use registry::{MigrationRegistry, MigrationStep};
pub use steps::{builtin_registry, builtin_steps, carry_current_records};
