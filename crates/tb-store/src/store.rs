//! Record collections over a DuckDB database.
//!
//! [`Store`] owns one DuckDB [`Connection`] bound to a schema and a sync
//! mode. Mutations are staged in memory and only become visible when
//! [`Store::commit`] applies them in a single transaction.

use crate::error::{StoreError, StoreOpenError, StoreResult};
use crate::layout::{ensure_layout, table_name};
use duckdb::Connection;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tb_core::{Record, RecordId, Schema, SyncMode};

/// Where a store's data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// In-memory database, gone when the store is dropped
    Memory,
    /// The canonical file for its sync mode
    File(PathBuf),
    /// A fresh migration destination waiting to be promoted
    Staging(PathBuf),
}

impl StoreLocation {
    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreLocation::Memory => None,
            StoreLocation::File(path) | StoreLocation::Staging(path) => Some(path),
        }
    }

    fn describe(&self) -> String {
        match self.path() {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }
}

/// A change waiting for the next commit.
#[derive(Debug, Clone)]
enum StagedChange {
    Insert {
        table: String,
        record_id: Option<String>,
        payload: String,
    },
    Update {
        table: String,
        record_type: &'static str,
        record_id: String,
        payload: String,
    },
    Delete {
        table: String,
        record_id: Option<String>,
        payload: String,
    },
}

/// An opened store.
///
/// `Store` is `Send + Sync`; the connection sits behind a mutex so the
/// active store can be shared as an `Arc<Store>`.
pub struct Store {
    conn: Mutex<Connection>,
    staged: Mutex<Vec<StagedChange>>,
    schema: Schema,
    sync_mode: SyncMode,
    location: StoreLocation,
}

impl Store {
    /// Open an in-memory store. Useful for tests that don't need persistence.
    pub fn in_memory(schema: &Schema, sync_mode: SyncMode) -> Result<Self, StoreOpenError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreOpenError::Connection {
            path: ":memory:".to_string(),
            message: e.to_string(),
        })?;
        Self::from_connection(conn, schema, sync_mode, StoreLocation::Memory)
    }

    /// Open (or create) a store file at `location`.
    pub(crate) fn open_at(
        location: StoreLocation,
        schema: &Schema,
        sync_mode: SyncMode,
    ) -> Result<Self, StoreOpenError> {
        let path = location
            .path()
            .ok_or_else(|| StoreOpenError::Connection {
                path: ":memory:".to_string(),
                message: "file location required".to_string(),
            })?
            .to_path_buf();
        let conn = Connection::open(&path).map_err(|e| StoreOpenError::Connection {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_connection(conn, schema, sync_mode, location)
    }

    fn from_connection(
        conn: Connection,
        schema: &Schema,
        sync_mode: SyncMode,
        location: StoreLocation,
    ) -> Result<Self, StoreOpenError> {
        schema.validate().map_err(StoreOpenError::InvalidSchema)?;
        ensure_layout(&conn, schema, &location.describe())?;
        Ok(Self {
            conn: Mutex::new(conn),
            staged: Mutex::new(Vec::new()),
            schema: schema.clone(),
            sync_mode,
            location,
        })
    }

    /// Schema this store was opened with
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Sync mode this store was opened with
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Where the data lives
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.location.path()
    }

    /// Fetch every committed record of type `R`, in insertion order.
    ///
    /// A record type the schema does not declare has no records.
    pub fn fetch_all<R: Record>(&self) -> StoreResult<Vec<R>> {
        if !self.schema.declares(R::RECORD_TYPE) {
            return Ok(Vec::new());
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT payload FROM {} ORDER BY seq",
            table_name(R::RECORD_TYPE)
        ))?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        payloads
            .iter()
            .map(|payload| serde_json::from_str(payload).map_err(StoreError::from))
            .collect()
    }

    /// Fetch the committed record of type `R` with identifier `id`.
    pub fn fetch<R: Record>(&self, id: &RecordId) -> StoreResult<Option<R>> {
        if !self.schema.declares(R::RECORD_TYPE) {
            return Ok(None);
        }
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT payload FROM {} WHERE record_id = ? ORDER BY seq LIMIT 1",
            table_name(R::RECORD_TYPE)
        ))?;
        let mut payloads = stmt
            .query_map(duckdb::params![id.to_string()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        match payloads.pop() {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    /// Number of committed records of type `R`.
    pub fn count<R: Record>(&self) -> StoreResult<usize> {
        if !self.schema.declares(R::RECORD_TYPE) {
            return Ok(0);
        }
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table_name(R::RECORD_TYPE)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Stage an insert.
    pub fn insert<R: Record>(&self, record: &R) -> StoreResult<()> {
        let table = self.table_for::<R>()?;
        let change = StagedChange::Insert {
            table,
            record_id: record.record_id().map(|id| id.to_string()),
            payload: serde_json::to_string(record)?,
        };
        self.staged()?.push(change);
        Ok(())
    }

    /// Stage an in-place update, matched on the record's identifier.
    pub fn update<R: Record>(&self, record: &R) -> StoreResult<()> {
        let table = self.table_for::<R>()?;
        let record_id = record
            .record_id()
            .ok_or_else(|| StoreError::MissingIdentifier {
                record_type: R::RECORD_TYPE.to_string(),
            })?;
        let change = StagedChange::Update {
            table,
            record_type: R::RECORD_TYPE,
            record_id: record_id.to_string(),
            payload: serde_json::to_string(record)?,
        };
        self.staged()?.push(change);
        Ok(())
    }

    /// Stage a delete.
    ///
    /// Records without an identifier are matched on their exact payload.
    pub fn delete<R: Record>(&self, record: &R) -> StoreResult<()> {
        let table = self.table_for::<R>()?;
        let change = StagedChange::Delete {
            table,
            record_id: record.record_id().map(|id| id.to_string()),
            payload: serde_json::to_string(record)?,
        };
        self.staged()?.push(change);
        Ok(())
    }

    /// Whether there are staged changes.
    pub fn has_changes(&self) -> StoreResult<bool> {
        Ok(!self.staged()?.is_empty())
    }

    /// Drop all staged changes.
    pub fn discard_changes(&self) -> StoreResult<()> {
        self.staged()?.clear();
        Ok(())
    }

    /// Apply all staged changes in one transaction.
    ///
    /// Returns the number of changes applied. On failure the transaction is
    /// rolled back, nothing becomes visible, and the staged changes are kept.
    pub fn commit(&self) -> StoreResult<usize> {
        let mut staged = self.staged()?;
        if staged.is_empty() {
            return Ok(0);
        }
        let conn = self.conn()?;

        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| StoreError::Commit(format!("BEGIN failed: {e}")))?;

        let result = staged
            .iter()
            .try_for_each(|change| apply_change(&conn, change));

        match result {
            Ok(()) => {
                if let Err(commit_err) = conn.execute_batch("COMMIT") {
                    let _ = conn.execute_batch("ROLLBACK");
                    return Err(StoreError::Commit(format!("COMMIT failed: {commit_err}")));
                }
            }
            Err(e) => {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(StoreError::Commit(e.to_string()));
            }
        }

        let applied = staged.len();
        staged.clear();
        log::debug!("Committed {applied} change(s) to {}", self.location.describe());
        Ok(applied)
    }

    /// Flush the write-ahead log into the main file and close the store.
    pub(crate) fn close(self) -> Result<(), StoreOpenError> {
        let location = self.location.describe();
        let conn = self
            .conn
            .into_inner()
            .map_err(|e| StoreOpenError::Layout {
                path: location.clone(),
                message: format!("store mutex poisoned: {e}"),
            })?;
        conn.execute_batch("CHECKPOINT")
            .map_err(|e| StoreOpenError::Layout {
                path: location,
                message: format!("checkpoint failed: {e}"),
            })?;
        drop(conn);
        Ok(())
    }

    fn table_for<R: Record>(&self) -> StoreResult<String> {
        if !self.schema.declares(R::RECORD_TYPE) {
            return Err(StoreError::UnknownRecordType {
                record_type: R::RECORD_TYPE.to_string(),
                schema: self.schema.to_string(),
            });
        }
        Ok(table_name(R::RECORD_TYPE))
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::MutexPoisoned(e.to_string()))
    }

    fn staged(&self) -> StoreResult<MutexGuard<'_, Vec<StagedChange>>> {
        self.staged
            .lock()
            .map_err(|e| StoreError::MutexPoisoned(e.to_string()))
    }
}

fn apply_change(conn: &Connection, change: &StagedChange) -> StoreResult<()> {
    match change {
        StagedChange::Insert {
            table,
            record_id,
            payload,
        } => {
            conn.execute(
                &format!("INSERT INTO {table} (record_id, payload) VALUES (?, ?)"),
                duckdb::params![record_id, payload],
            )?;
        }
        StagedChange::Update {
            table,
            record_type,
            record_id,
            payload,
        } => {
            let updated = conn.execute(
                &format!("UPDATE {table} SET payload = ? WHERE record_id = ?"),
                duckdb::params![payload, record_id],
            )?;
            if updated == 0 {
                return Err(StoreError::RecordNotFound {
                    record_type: record_type.to_string(),
                    id: record_id.clone(),
                });
            }
        }
        StagedChange::Delete {
            table,
            record_id: Some(record_id),
            ..
        } => {
            conn.execute(
                &format!("DELETE FROM {table} WHERE record_id = ?"),
                duckdb::params![record_id],
            )?;
        }
        StagedChange::Delete {
            table,
            record_id: None,
            payload,
        } => {
            conn.execute(
                &format!("DELETE FROM {table} WHERE record_id IS NULL AND payload = ?"),
                duckdb::params![payload],
            )?;
        }
    }
    Ok(())
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("schema", &self.schema.to_string())
            .field("sync_mode", &self.sync_mode)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
