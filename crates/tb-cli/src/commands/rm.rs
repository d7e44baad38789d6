//! Remove command implementation

use anyhow::{Context, Result};
use tb_core::{Equipment, RecordId};

use crate::cli::{GlobalArgs, RmArgs};
use crate::context::RuntimeContext;

/// Execute the rm command
pub(crate) async fn execute(args: &RmArgs, global: &GlobalArgs) -> Result<()> {
    let id: RecordId = args
        .id
        .trim()
        .parse()
        .with_context(|| format!("Invalid equipment id '{}'", args.id))?;

    let ctx = RuntimeContext::new(global)?;
    let store = ctx.manager.store();
    let item = store
        .fetch::<Equipment>(&id)
        .context("Failed to read equipment")?
        .with_context(|| format!("No equipment with id {id}"))?;

    store.delete(&item).context("Failed to stage removal")?;
    store.commit().context("Failed to save removal")?;

    println!("Removed '{}' ({})", item.name, item.id);
    Ok(())
}
