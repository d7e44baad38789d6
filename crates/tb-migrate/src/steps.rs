//! Built-in migration steps.

use crate::copy::copy_all;
use crate::error::MigrationResult;
use crate::registry::{MigrationRegistry, MigrationStep};
use std::sync::Arc;
use tb_core::schema::CURRENT_SCHEMA_VERSION;
use tb_core::{Equipment, LegacyEquipment, Settings};
use tb_store::Store;

/// Every built-in step, in ascending version order.
pub fn builtin_steps() -> Vec<MigrationStep> {
    vec![MigrationStep::new(
        1,
        "Copy v1 equipment rows into the v2 equipment schema",
        copy_equipment,
    )]
}

/// A registry holding [`builtin_steps`], recording progress in `settings`.
pub fn builtin_registry(settings: Arc<Settings>) -> MigrationResult<MigrationRegistry> {
    builtin_steps()
        .into_iter()
        .try_fold(MigrationRegistry::new(settings), MigrationRegistry::with_step)
}

// The source is a legacy store at startup, and the active (already current)
// store when the step is still pending during a sync switch.
fn copy_equipment(source: &Store, dest: &Store) -> MigrationResult<()> {
    let copied = if source.schema().version() < CURRENT_SCHEMA_VERSION {
        copy_all::<LegacyEquipment, Equipment, _>(source, dest, Equipment::from)?
    } else {
        carry_current_records(source, dest)?
    };
    log::info!("Migrated {copied} equipment record(s) from {}", source.schema());
    Ok(())
}

/// Copy every current-schema record in `source` that `dest` lacks.
///
/// Used when switching sync modes so the newly active store holds what the
/// previous one did. Only additions carry over: a record deleted in one store
/// but still present in the other comes back.
pub fn carry_current_records(source: &Store, dest: &Store) -> MigrationResult<usize> {
    copy_all::<Equipment, Equipment, _>(source, dest, |item| item)
}

#[cfg(test)]
#[path = "steps_test.rs"]
mod tests;
