//! Sync command implementation - switches the active store

use anyhow::{Context, Result};
use tb_core::SyncMode;

use crate::cli::{GlobalArgs, SyncArgs};
use crate::context::RuntimeContext;

/// Execute the sync command
pub(crate) async fn execute(args: &SyncArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let requested = SyncMode::from(args.mode);
    let previous = ctx.manager.sync_mode();

    let store = ctx
        .manager
        .update_sync_mode(requested)
        .await
        .with_context(|| format!("Failed to switch to {requested} storage; still using {previous}"))?;

    if requested == previous {
        println!("Already using {requested} storage");
        return Ok(());
    }

    println!("Switched from {previous} to {requested} storage");
    if let Some(path) = store.path() {
        println!("  Store: {}", path.display());
    }
    Ok(())
}
