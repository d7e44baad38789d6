//! Sync mode of a store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a store is local-only or replicated to the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Stored on this device only (default)
    #[default]
    Local,
    /// Stored in the synced cloud directory
    Cloud,
}

impl SyncMode {
    /// Map the persisted boolean preference to a mode.
    pub fn from_cloud_flag(use_cloud: bool) -> Self {
        if use_cloud {
            SyncMode::Cloud
        } else {
            SyncMode::Local
        }
    }

    /// Boolean form of the mode, as persisted in settings.
    pub fn is_cloud(self) -> bool {
        matches!(self, SyncMode::Cloud)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Local => write!(f, "local"),
            SyncMode::Cloud => write!(f, "cloud"),
        }
    }
}
