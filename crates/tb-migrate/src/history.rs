//! Migration bookkeeping in the settings store.
//!
//! The last-applied version is authoritative for what is pending. History
//! is an audit log: it is only ever appended to and never consulted when
//! deciding which steps to run.

use crate::error::MigrationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tb_core::settings::keys;
use tb_core::{CoreError, Settings};

/// One applied migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationEntry {
    pub version: u32,
    pub description: String,
    pub applied_at: DateTime<Utc>,
}

/// Highest applied version, or 0 if none.
pub fn last_applied_version(settings: &Settings) -> MigrationResult<u32> {
    Ok(settings.get::<u32>(keys::MIGRATION_VERSION)?.unwrap_or(0))
}

/// Applied migrations, oldest first.
pub fn history(settings: &Settings) -> MigrationResult<Vec<MigrationEntry>> {
    Ok(settings
        .get::<Vec<MigrationEntry>>(keys::MIGRATION_HISTORY)?
        .unwrap_or_default())
}

/// Append `entry` to history and advance the last-applied version, as one
/// settings write.
pub(crate) fn record_applied(settings: &Settings, entry: &MigrationEntry) -> MigrationResult<()> {
    let serialized = serde_json::to_value(entry).map_err(CoreError::from)?;
    settings.update(|values| {
        let history = values
            .entry(keys::MIGRATION_HISTORY.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match history {
            Value::Array(entries) => entries.push(serialized),
            _ => {
                return Err(CoreError::SettingsValue {
                    key: keys::MIGRATION_HISTORY.to_string(),
                    reason: "expected an array".to_string(),
                })
            }
        }
        values.insert(
            keys::MIGRATION_VERSION.to_string(),
            Value::from(entry.version),
        );
        Ok(())
    })?;
    Ok(())
}
