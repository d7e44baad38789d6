//! Error types for tb-core

use thiserror::Error;

/// Core error type for TackleBox
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Schema declaration is not usable for a store
    #[error("[C003] Invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },

    /// C004: Settings value exists but has the wrong shape
    #[error("[C004] Settings key '{key}' holds an unexpected value: {reason}")]
    SettingsValue { key: String, reason: String },

    /// C005: Settings lock poisoned by a panicking writer
    #[error("[C005] Settings lock poisoned")]
    SettingsPoisoned,

    /// C006: IO error with file path context
    #[error("[C006] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C007: YAML parse error
    #[error("[C007] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C008: JSON serialization/deserialization error
    #[error("[C008] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}
