//! Store factory: decides where a store lives and opens it.

use crate::error::StoreOpenError;
use crate::store::{Store, StoreLocation};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tb_core::{Schema, SyncMode};

/// File name of the canonical store.
pub const STORE_FILE_NAME: &str = "tacklebox.duckdb";

/// File name of a migration destination before promotion.
pub const STAGING_FILE_NAME: &str = "tacklebox.migrating.duckdb";

/// Opens stores for a schema and sync mode.
///
/// Implementations hold no per-store state; every call yields an
/// independent handle.
pub trait StoreFactory: Send + Sync {
    /// Open or create the canonical store for `sync_mode`.
    fn open(&self, schema: &Schema, sync_mode: SyncMode) -> Result<Store, StoreOpenError>;

    /// Create an empty staging store, replacing any stale one.
    fn open_fresh(&self, schema: &Schema, sync_mode: SyncMode) -> Result<Store, StoreOpenError>;

    /// Move a staging store into the canonical location and reopen it.
    ///
    /// Stores that are not staging stores are returned unchanged.
    fn promote(&self, store: Store) -> Result<Store, StoreOpenError>;
}

/// DuckDB-file factory.
///
/// Local stores live under `<data_dir>/local/`. Cloud stores live directly
/// in `cloud_dir`, a directory replicated by the platform's sync client.
#[derive(Debug, Clone)]
pub struct DuckDbStoreFactory {
    data_dir: PathBuf,
    cloud_dir: Option<PathBuf>,
}

impl DuckDbStoreFactory {
    /// Create a factory rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>, cloud_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cloud_dir,
        }
    }

    /// Directory holding the stores for `sync_mode`.
    ///
    /// The local directory is created on demand; the cloud directory must
    /// already exist, since creating it would not make it synced.
    pub fn store_dir(&self, sync_mode: SyncMode) -> Result<PathBuf, StoreOpenError> {
        match sync_mode {
            SyncMode::Local => {
                let dir = self.data_dir.join("local");
                std::fs::create_dir_all(&dir).map_err(|e| StoreOpenError::io(&dir, e))?;
                Ok(dir)
            }
            SyncMode::Cloud => {
                let dir = self
                    .cloud_dir
                    .as_ref()
                    .ok_or_else(|| StoreOpenError::SyncUnavailable {
                        reason: "no cloud_dir configured".to_string(),
                    })?;
                if !dir.is_dir() {
                    return Err(StoreOpenError::SyncUnavailable {
                        reason: format!("cloud directory {} does not exist", dir.display()),
                    });
                }
                Ok(dir.clone())
            }
        }
    }

    /// Path of the canonical store for `sync_mode`.
    pub fn canonical_path(&self, sync_mode: SyncMode) -> Result<PathBuf, StoreOpenError> {
        Ok(self.store_dir(sync_mode)?.join(STORE_FILE_NAME))
    }

    fn staging_path(&self, sync_mode: SyncMode) -> Result<PathBuf, StoreOpenError> {
        Ok(self.store_dir(sync_mode)?.join(STAGING_FILE_NAME))
    }
}

fn wal_path(path: &Path) -> PathBuf {
    let mut wal = path.as_os_str().to_owned();
    wal.push(".wal");
    PathBuf::from(wal)
}

fn remove_if_exists(path: &Path) -> Result<(), StoreOpenError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreOpenError::io(path, e)),
    }
}

fn rename(from: &Path, to: &Path) -> Result<(), StoreOpenError> {
    std::fs::rename(from, to).map_err(|e| StoreOpenError::io(from, e))
}

impl StoreFactory for DuckDbStoreFactory {
    fn open(&self, schema: &Schema, sync_mode: SyncMode) -> Result<Store, StoreOpenError> {
        let path = self.canonical_path(sync_mode)?;
        log::debug!("Opening {schema} ({sync_mode}) at {}", path.display());
        Store::open_at(StoreLocation::File(path), schema, sync_mode)
    }

    fn open_fresh(&self, schema: &Schema, sync_mode: SyncMode) -> Result<Store, StoreOpenError> {
        let path = self.staging_path(sync_mode)?;
        remove_if_exists(&path)?;
        remove_if_exists(&wal_path(&path))?;
        log::debug!("Creating staging store for {schema} at {}", path.display());
        Store::open_at(StoreLocation::Staging(path), schema, sync_mode)
    }

    fn promote(&self, store: Store) -> Result<Store, StoreOpenError> {
        let StoreLocation::Staging(staging) = store.location().clone() else {
            return Ok(store);
        };
        let schema = store.schema().clone();
        let sync_mode = store.sync_mode();
        store.close()?;

        let canonical = self.canonical_path(sync_mode)?;
        if canonical.exists() {
            let backup = canonical.with_file_name(format!(
                "{STORE_FILE_NAME}.bak-{}",
                Utc::now().format("%Y%m%d%H%M%S")
            ));
            rename(&canonical, &backup)?;
            let canonical_wal = wal_path(&canonical);
            if canonical_wal.exists() {
                rename(&canonical_wal, &wal_path(&backup))?;
            }
            log::info!("Previous store kept at {}", backup.display());
        }

        rename(&staging, &canonical)?;
        remove_if_exists(&wal_path(&staging))?;
        self.open(&schema, sync_mode)
    }
}

#[cfg(test)]
#[path = "factory_test.rs"]
mod tests;
