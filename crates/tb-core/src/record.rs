//! The record capability shared by every persisted type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable unique identifier of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a new random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Return the wrapped UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A type that can be stored in a record collection.
///
/// `RECORD_TYPE` names the collection the records live in and `FIELDS`
/// lists the serialized field names; both feed the schema fingerprint, so
/// changing either changes the on-disk layout a store accepts.
///
/// `record_id` is the identity used for deduplication during migration.
/// Returning `None` marks a record with no resolvable identifier: such a
/// record is never treated as a duplicate of anything.
pub trait Record: Serialize + DeserializeOwned + Send + 'static {
    /// Collection name, a lowercase identifier.
    const RECORD_TYPE: &'static str;

    /// Serialized field names, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Identifier of this record, if it has one.
    fn record_id(&self) -> Option<RecordId>;
}
