//! On-disk layout of a store.
//!
//! Every store carries a one-row stamp table naming the schema it was
//! created for. Opening a store with a schema whose fingerprint differs from
//! the stamp fails, which is how legacy stores are detected.

use crate::error::StoreOpenError;
use chrono::Utc;
use duckdb::Connection;
use tb_core::Schema;

/// Table holding the schema stamp.
pub(crate) const STAMP_TABLE: &str = "_tacklebox_schema";

/// Table backing a record collection.
pub(crate) fn table_name(record_type: &str) -> String {
    format!("rec_{record_type}")
}

fn sequence_name(record_type: &str) -> String {
    format!("seq_rec_{record_type}")
}

/// Stamp found in an existing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Stamp {
    pub schema_name: String,
    pub version: i64,
    pub fingerprint: String,
}

fn read_stamp(conn: &Connection) -> Result<Option<Stamp>, duckdb::Error> {
    let exists: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
        duckdb::params![STAMP_TABLE],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Ok(None);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT schema_name, version, fingerprint FROM {STAMP_TABLE} LIMIT 1"
    ))?;
    let mut stamps = stmt
        .query_map([], |row| {
            Ok(Stamp {
                schema_name: row.get(0)?,
                version: row.get(1)?,
                fingerprint: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stamps.pop())
}

fn create_layout_sql(schema: &Schema) -> String {
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {STAMP_TABLE} (
             schema_name VARCHAR NOT NULL,
             version     INTEGER NOT NULL,
             fingerprint VARCHAR NOT NULL,
             created_at  VARCHAR NOT NULL
         );\n"
    );
    for rt in schema.record_types() {
        let seq = sequence_name(rt.name);
        sql.push_str(&format!(
            "CREATE SEQUENCE IF NOT EXISTS {seq} START 1;
             CREATE TABLE IF NOT EXISTS {table} (
                 seq       BIGINT NOT NULL DEFAULT nextval('{seq}'),
                 record_id VARCHAR,
                 payload   VARCHAR NOT NULL
             );\n",
            table = table_name(rt.name),
        ));
    }
    sql
}

/// Verify the stamp of an existing store, or lay out and stamp a fresh one.
pub(crate) fn ensure_layout(
    conn: &Connection,
    schema: &Schema,
    path: &str,
) -> Result<(), StoreOpenError> {
    let layout_err = |e: duckdb::Error| StoreOpenError::Layout {
        path: path.to_string(),
        message: e.to_string(),
    };

    if let Some(stamp) = read_stamp(conn).map_err(layout_err)? {
        if stamp.fingerprint != schema.fingerprint() {
            return Err(StoreOpenError::IncompatibleLayout {
                path: path.to_string(),
                expected: schema.to_string(),
                found: format!("{} v{}", stamp.schema_name, stamp.version),
            });
        }
        return Ok(());
    }

    log::debug!("Laying out fresh store at {path} for {schema}");
    conn.execute_batch("BEGIN TRANSACTION").map_err(layout_err)?;
    let result = conn
        .execute_batch(&create_layout_sql(schema))
        .and_then(|_| {
            conn.execute(
                &format!("INSERT INTO {STAMP_TABLE} VALUES (?, ?, ?, ?)"),
                duckdb::params![
                    schema.name(),
                    i64::from(schema.version()),
                    schema.fingerprint(),
                    Utc::now().to_rfc3339()
                ],
            )
        });

    match result {
        Ok(_) => conn.execute_batch("COMMIT").map_err(|e| {
            let _ = conn.execute_batch("ROLLBACK");
            layout_err(e)
        }),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(layout_err(e))
        }
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
