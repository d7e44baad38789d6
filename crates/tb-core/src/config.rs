//! Configuration types and parsing for tacklebox.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["tacklebox.yml", "tacklebox.yaml"];

/// Main configuration from tacklebox.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Catalog name
    pub name: String,

    /// Directory holding local stores and settings
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Directory replicated by the platform's sync client.
    ///
    /// Cloud sync is unavailable while this is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_dir: Option<String>,

    /// Settings file, relative to `data_dir`
    #[serde(default = "default_settings_file")]
    pub settings_file: String,

    /// YAML list of preset categories, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories_file: Option<String>,
}

fn default_data_dir() -> String {
    ".tacklebox".to_string()
}

fn default_settings_file() -> String {
    "settings.json".to_string()
}

impl Config {
    /// A config with every optional field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_dir: default_data_dir(),
            cloud_dir: None,
            settings_file: default_settings_file(),
            categories_file: None,
        }
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tacklebox.yml or tacklebox.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Catalog name cannot be empty".to_string(),
            });
        }
        if self.data_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "data_dir cannot be empty".to_string(),
            });
        }
        if self.settings_file.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "settings_file cannot be empty".to_string(),
            });
        }
        if matches!(&self.cloud_dir, Some(dir) if dir.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "cloud_dir cannot be empty when set".to_string(),
            });
        }
        Ok(())
    }

    /// Get absolute data directory relative to a project root
    pub fn data_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }

    /// Get absolute cloud directory relative to a project root
    pub fn cloud_dir_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.cloud_dir.as_ref().map(|dir| root.join(dir))
    }

    /// Get absolute settings file path relative to a project root
    pub fn settings_path(&self, root: &Path) -> PathBuf {
        self.data_dir_absolute(root).join(&self.settings_file)
    }

    /// Get absolute categories file path relative to a project root
    pub fn categories_path(&self, root: &Path) -> Option<PathBuf> {
        self.categories_file.as_ref().map(|file| root.join(file))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
