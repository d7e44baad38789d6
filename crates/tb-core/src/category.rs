//! Preset equipment categories.
//!
//! Categories describe which extra attributes an item of that kind carries.
//! The preset list is written into the settings store on first launch and
//! read back from there afterwards.

use crate::error::{CoreError, CoreResult};
use crate::settings::{keys, Settings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input widget for an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Text,
    Number,
    Picker,
}

/// One category-specific attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Key inside `Equipment::attributes_json`
    pub key: String,
    /// Human-readable label
    pub label: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Choices for `picker` attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// An equipment category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub icon: String,
}

impl Category {
    /// Look up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.key == key)
    }
}

/// The preset category list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Read the default categories from a YAML file.
    ///
    /// A missing file means "no presets". A file that exists but does not
    /// parse is logged and also treated as empty.
    pub fn defaults_from_file(path: Option<&Path>) -> Vec<Category> {
        let Some(path) = path else {
            return Vec::new();
        };
        if !path.exists() {
            return Vec::new();
        }
        match Self::read_defaults(path) {
            Ok(categories) => categories,
            Err(e) => {
                log::warn!("Failed to load default categories from {}: {e}", path.display());
                Vec::new()
            }
        }
    }

    fn read_defaults(path: &Path) -> CoreResult<Vec<Category>> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write the default categories to settings, once per installation.
    ///
    /// Returns the catalog and whether seeding happened on this call. If the
    /// write fails the defaults are still returned, and seeding is retried on
    /// the next launch.
    pub fn seed_if_needed(settings: &Settings, defaults: Vec<Category>) -> (Self, bool) {
        match settings.get_bool(keys::DID_SEED_CATEGORIES) {
            Ok(true) => return (Self::load(settings, defaults), false),
            Ok(false) => {}
            Err(e) => log::warn!("Unreadable category seed flag: {e}"),
        }

        let seeded = settings.update(|values| {
            values.insert(
                keys::PRESET_CATEGORIES.to_string(),
                serde_json::to_value(&defaults)?,
            );
            values.insert(keys::DID_SEED_CATEGORIES.to_string(), true.into());
            Ok(())
        });

        match seeded {
            Ok(()) => (Self { categories: defaults }, true),
            Err(e) => {
                log::warn!("Category seeding failed: {e}");
                (Self { categories: defaults }, false)
            }
        }
    }

    /// Read the stored categories, falling back to `defaults`.
    pub fn load(settings: &Settings, defaults: Vec<Category>) -> Self {
        match settings.get::<Vec<Category>>(keys::PRESET_CATEGORIES) {
            Ok(Some(categories)) => Self { categories },
            Ok(None) => Self { categories: defaults },
            Err(e) => {
                log::warn!("Failed to decode preset categories: {e}");
                Self { categories: defaults }
            }
        }
    }

    /// All categories in preset order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
#[path = "category_test.rs"]
mod tests;
