//! Schema declarations: which record types a store is built to hold.

use crate::equipment::{Equipment, LegacyEquipment};
use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// Name shared by every TackleBox schema version.
pub const SCHEMA_NAME: &str = "tacklebox";

/// Version of the schema this build reads and writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Version of the schema older builds wrote; only ever a migration source.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Shape of one record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTypeDescriptor {
    /// Collection name
    pub name: &'static str,
    /// Serialized field names
    pub fields: &'static [&'static str],
}

impl RecordTypeDescriptor {
    /// Describe the collection backing record type `R`.
    pub fn of<R: Record>() -> Self {
        Self {
            name: R::RECORD_TYPE,
            fields: R::FIELDS,
        }
    }
}

/// An ordered set of record types plus a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    version: u32,
    record_types: Vec<RecordTypeDescriptor>,
}

impl Schema {
    /// Create a schema from its record type descriptors.
    pub fn new(
        name: impl Into<String>,
        version: u32,
        record_types: Vec<RecordTypeDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            record_types,
        }
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema version
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Record types in declaration order
    pub fn record_types(&self) -> &[RecordTypeDescriptor] {
        &self.record_types
    }

    /// Look up a record type by collection name.
    pub fn record_type(&self, name: &str) -> Option<&RecordTypeDescriptor> {
        self.record_types.iter().find(|rt| rt.name == name)
    }

    /// Whether this schema declares the collection `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.record_type(name).is_some()
    }

    /// Stable SHA-256 fingerprint of the layout this schema describes.
    ///
    /// Two schemas with the same fingerprint can open each other's stores.
    pub fn fingerprint(&self) -> String {
        let mut canonical = format!("{}@{}", self.name, self.version);
        for rt in &self.record_types {
            canonical.push('|');
            canonical.push_str(rt.name);
            canonical.push('(');
            canonical.push_str(&rt.fields.join(","));
            canonical.push(')');
        }
        compute_checksum(&canonical)
    }

    /// Check that the schema can back a store.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| CoreError::InvalidSchema {
            schema: self.to_string(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("schema name cannot be empty".to_string()));
        }
        if self.record_types.is_empty() {
            return Err(invalid("at least one record type is required".to_string()));
        }

        let mut seen = HashSet::new();
        for rt in &self.record_types {
            if !is_identifier(rt.name) {
                return Err(invalid(format!(
                    "record type '{}' must match [a-z][a-z0-9_]*",
                    rt.name
                )));
            }
            if !seen.insert(rt.name) {
                return Err(invalid(format!("duplicate record type '{}'", rt.name)));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// The schema this build opens by default.
pub fn current() -> Schema {
    Schema::new(
        SCHEMA_NAME,
        CURRENT_SCHEMA_VERSION,
        vec![RecordTypeDescriptor::of::<Equipment>()],
    )
}

/// The schema written by earlier builds.
pub fn legacy() -> Schema {
    Schema::new(
        SCHEMA_NAME,
        LEGACY_SCHEMA_VERSION,
        vec![RecordTypeDescriptor::of::<LegacyEquipment>()],
    )
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn compute_checksum(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
