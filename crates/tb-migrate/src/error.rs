//! Error types for migrations and the model manager.

use tb_core::CoreError;
use tb_store::{StoreError, StoreOpenError};
use thiserror::Error;

/// Migration errors
#[derive(Error, Debug)]
pub enum MigrationError {
    /// MG001: Reading records for migration failed
    #[error("[MG001] Failed to fetch '{record_type}' records: {source}")]
    Fetch {
        record_type: String,
        source: StoreError,
    },

    /// MG002: Staging a migrated record failed
    #[error("[MG002] Failed to stage '{record_type}' record: {source}")]
    Stage {
        record_type: String,
        source: StoreError,
    },

    /// MG003: Persisting the migrated batch failed
    #[error("[MG003] Failed to commit migrated records: {0}")]
    Commit(#[source] StoreError),

    /// MG004: A step's own logic failed
    #[error("[MG004] Migration transform failed: {0}")]
    Transform(String),

    /// MG005: Step cannot be registered
    #[error("[MG005] Invalid migration step v{version}: {reason}")]
    InvalidStep { version: u32, reason: String },

    /// MG006: A registered step failed; later steps were not attempted
    #[error("[MG006] Migration v{version} ({description}) failed: {source}")]
    StepFailed {
        version: u32,
        description: String,
        source: Box<MigrationError>,
    },

    /// MG007: Reading or writing migration bookkeeping failed
    #[error("[MG007] Migration bookkeeping failed: {0}")]
    Settings(#[from] CoreError),
}

/// Result type alias for MigrationError
pub type MigrationResult<T> = Result<T, MigrationError>;

/// Model manager errors
#[derive(Error, Debug)]
pub enum ManagerError {
    /// MM001: A store could not be opened
    #[error("[MM001] {0}")]
    StoreOpen(#[from] StoreOpenError),

    /// MM002: Migrating into the new store failed
    #[error("[MM002] {0}")]
    Migration(#[from] MigrationError),

    /// MM003: Another sync mode switch is running
    #[error("[MM003] A sync mode switch is already in progress")]
    SwitchInProgress,

    /// MM004: Reading or writing the sync preference failed
    #[error("[MM004] Settings error: {0}")]
    Settings(#[from] CoreError),

    /// MM005: The background migration task did not finish
    #[error("[MM005] Background store task failed: {0}")]
    Task(String),

    /// MM006: No usable store; the process cannot continue
    #[error("[MM006] Could not open or migrate the store: {source}")]
    Fatal { source: Box<ManagerError> },
}

impl ManagerError {
    /// Whether this error must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ManagerError::Fatal { .. })
    }
}

/// Result type alias for ManagerError
pub type ManagerResult<T> = Result<T, ManagerError>;
