//! Generic copy-with-deduplication between two stores.

use crate::error::{MigrationError, MigrationResult};
use std::collections::HashSet;
use tb_core::{Record, RecordId};
use tb_store::Store;

/// Copy every `Old` record in `source` into `dest` as a `New` record.
///
/// Records whose identifier already exists in `dest` are skipped. Records
/// without an identifier are always inserted, so copying them twice
/// duplicates them. All inserts are committed together; on failure nothing
/// becomes visible in `dest`.
///
/// Returns the number of records inserted.
pub fn copy_all<Old, New, F>(source: &Store, dest: &Store, mut transform: F) -> MigrationResult<usize>
where
    Old: Record,
    New: Record,
    F: FnMut(Old) -> New,
{
    let old_records = source
        .fetch_all::<Old>()
        .map_err(|source| MigrationError::Fetch {
            record_type: Old::RECORD_TYPE.to_string(),
            source,
        })?;

    let existing: HashSet<RecordId> = dest
        .fetch_all::<New>()
        .map_err(|source| MigrationError::Fetch {
            record_type: New::RECORD_TYPE.to_string(),
            source,
        })?
        .iter()
        .filter_map(|record| record.record_id())
        .collect();

    let mut inserted = 0;
    let mut skipped = 0;
    for old in old_records {
        if old.record_id().is_some_and(|id| existing.contains(&id)) {
            skipped += 1;
            continue;
        }
        let new = transform(old);
        if let Err(source) = dest.insert(&new) {
            let _ = dest.discard_changes();
            return Err(MigrationError::Stage {
                record_type: New::RECORD_TYPE.to_string(),
                source,
            });
        }
        inserted += 1;
    }

    if let Err(e) = dest.commit() {
        let _ = dest.discard_changes();
        return Err(MigrationError::Commit(e));
    }

    log::debug!(
        "Copied {inserted} '{}' record(s) into '{}', skipped {skipped} already present",
        Old::RECORD_TYPE,
        New::RECORD_TYPE
    );
    Ok(inserted)
}

#[cfg(test)]
#[path = "copy_test.rs"]
mod tests;
