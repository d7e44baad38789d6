//! Error types for tb-store

use tb_core::CoreError;
use thiserror::Error;

/// A store could not be opened or created.
#[derive(Error, Debug)]
pub enum StoreOpenError {
    /// S001: DuckDB refused to open the file
    #[error("[S001] Store connection failed for {path}: {message}")]
    Connection { path: String, message: String },

    /// S002: The file was written for a different schema
    #[error("[S002] Store at {path} has an incompatible layout: expected {expected}, found {found}")]
    IncompatibleLayout {
        path: String,
        expected: String,
        found: String,
    },

    /// S003: Cloud sync was requested but the synced directory is not usable
    #[error("[S003] Cloud sync unavailable: {reason}")]
    SyncUnavailable { reason: String },

    /// S004: Filesystem error while preparing the store location
    #[error("[S004] Failed to prepare store location '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// S005: Schema cannot back a store
    #[error("[S005] {0}")]
    InvalidSchema(#[source] CoreError),

    /// S006: Creating or reading the layout failed
    #[error("[S006] Store layout setup failed for {path}: {message}")]
    Layout { path: String, message: String },
}

impl StoreOpenError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        StoreOpenError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Record-collection operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// S101: Query against the store failed
    #[error("[S101] Store query failed: {0}")]
    Query(String),

    /// S102: Persisting staged changes failed; nothing was written
    #[error("[S102] Store commit failed: {0}")]
    Commit(String),

    /// S103: Record payload could not be (de)serialized
    #[error("[S103] Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// S104: Record type is not part of the store's schema
    #[error("[S104] Record type '{record_type}' is not declared by schema {schema}")]
    UnknownRecordType { record_type: String, schema: String },

    /// S105: Operation needs an identifier the record does not have
    #[error("[S105] Record of type '{record_type}' has no identifier")]
    MissingIdentifier { record_type: String },

    /// S106: Record to update does not exist
    #[error("[S106] Record '{id}' of type '{record_type}' not found")]
    RecordNotFound { record_type: String, id: String },

    /// S107: Store mutex poisoned
    #[error("[S107] Store mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}
