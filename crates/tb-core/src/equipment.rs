//! Equipment records, in the current and the legacy shape.

use crate::record::{Record, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status given to new equipment.
pub const DEFAULT_STATUS: &str = "in_use";

/// A piece of fishing tackle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Stable identifier
    pub id: RecordId,

    /// Display name
    pub name: String,

    /// Category name (see [`crate::category::Category`])
    #[serde(default)]
    pub category: Option<String>,

    /// When the item was added
    pub timestamp: DateTime<Utc>,

    /// Whether the item is currently packed
    #[serde(default)]
    pub is_equipped: bool,

    /// Number of identical items
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Free-form status, e.g. `in_use` or `retired`
    #[serde(default = "default_status")]
    pub status: String,

    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,

    /// JSON object of category-specific attributes (length, line weight, ...)
    #[serde(default)]
    pub attributes_json: Option<String>,

    /// Encoded thumbnail image for list previews
    #[serde(default)]
    pub thumbnail: Option<Vec<u8>>,
}

fn default_quantity() -> u32 {
    1
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl Equipment {
    /// Create a new item with a fresh identifier and default fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new_v4(),
            name: name.into(),
            category: None,
            timestamp: Utc::now(),
            is_equipped: false,
            quantity: default_quantity(),
            status: default_status(),
            notes: None,
            attributes_json: None,
            thumbnail: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl Record for Equipment {
    const RECORD_TYPE: &'static str = "equipment";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "category",
        "timestamp",
        "is_equipped",
        "quantity",
        "status",
        "notes",
        "attributes_json",
        "thumbnail",
    ];

    fn record_id(&self) -> Option<RecordId> {
        Some(self.id)
    }
}

/// Equipment as written by schema v1 builds.
///
/// Rows from the earliest releases were written before identifiers existed,
/// so `id` may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEquipment {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_equipped: bool,
}

impl Record for LegacyEquipment {
    const RECORD_TYPE: &'static str = "equipment";
    const FIELDS: &'static [&'static str] = &["id", "name", "category", "timestamp", "is_equipped"];

    fn record_id(&self) -> Option<RecordId> {
        self.id
    }
}

impl From<LegacyEquipment> for Equipment {
    fn from(old: LegacyEquipment) -> Self {
        Self {
            id: old.id.unwrap_or_else(RecordId::new_v4),
            name: old.name,
            category: old.category,
            timestamp: old.timestamp,
            is_equipped: old.is_equipped,
            quantity: default_quantity(),
            status: default_status(),
            notes: None,
            attributes_json: None,
            thumbnail: None,
        }
    }
}

#[cfg(test)]
#[path = "equipment_test.rs"]
mod tests;
