//! Small key-value settings store kept outside any record store.
//!
//! Values live in one JSON object. File-backed settings are rewritten on
//! every change with the write-to-temp-then-rename pattern, so a crash never
//! leaves a half-written file behind.

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Fixed settings keys.
pub mod keys {
    /// Highest migration version applied on this installation.
    pub const MIGRATION_VERSION: &str = "com.tacklebox.migrationVersion";

    /// Append-only list of applied migrations.
    pub const MIGRATION_HISTORY: &str = "com.tacklebox.migrationHistory";

    /// Whether the user asked for cloud sync.
    pub const USE_CLOUD_SYNC: &str = "com.tacklebox.useCloudSync";

    /// Set once the preset categories have been written.
    pub const DID_SEED_CATEGORIES: &str = "com.tacklebox.didSeedCategories";

    /// Preset categories.
    pub const PRESET_CATEGORIES: &str = "com.tacklebox.presetCategories";
}

/// JSON-object settings store.
#[derive(Debug)]
pub struct Settings {
    path: Option<PathBuf>,
    values: Mutex<Map<String, Value>>,
}

impl Settings {
    /// Load settings from `path`, starting empty if the file does not exist.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            Map::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            values: Mutex::new(values),
        })
    }

    /// Settings that are never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: Mutex::new(Map::new()),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read and deserialize a value. Missing keys yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CoreResult<Option<T>> {
        let values = self.lock()?;
        match values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| CoreError::SettingsValue {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Read a boolean, defaulting to `false`.
    pub fn get_bool(&self, key: &str) -> CoreResult<bool> {
        Ok(self.get::<bool>(key)?.unwrap_or(false))
    }

    /// Serialize and store a value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> CoreResult<()> {
        let value = serde_json::to_value(value)?;
        self.update(|values| {
            values.insert(key.to_string(), value);
            Ok(())
        })
    }

    /// Store a boolean.
    pub fn set_bool(&self, key: &str, value: bool) -> CoreResult<()> {
        self.set(key, &value)
    }

    /// Mutate several keys and persist them with a single write.
    ///
    /// If `f` fails, or the write fails, the in-memory values are left as
    /// they were before the call.
    pub fn update<F>(&self, f: F) -> CoreResult<()>
    where
        F: FnOnce(&mut Map<String, Value>) -> CoreResult<()>,
    {
        let mut values = self.lock()?;
        let mut next = values.clone();
        f(&mut next)?;
        self.flush(&next)?;
        *values = next;
        Ok(())
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, Map<String, Value>>> {
        self.values.lock().map_err(|_| CoreError::SettingsPoisoned)
    }

    fn flush(&self, values: &Map<String, Value>) -> CoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }

        let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&temp_path, &json).map_err(|e| CoreError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            CoreError::io(path, e)
        })?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
