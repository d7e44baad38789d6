//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use tb_core::{Equipment, SyncMode};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::print_json;
use crate::context::RuntimeContext;

/// Snapshot of the active store
#[derive(Debug, Serialize)]
struct StatusReport {
    catalog: String,
    sync_mode: SyncMode,
    cloud_available: bool,
    state: String,
    schema: String,
    store_path: Option<String>,
    settings_path: Option<String>,
    last_applied_version: u32,
    pending_migrations: usize,
    equipment: usize,
    categories: usize,
}

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let store = ctx.manager.store();
    let registry = ctx.manager.registry();
    let last_applied = registry
        .last_applied_version()
        .context("Failed to read migration progress")?;

    let report = StatusReport {
        catalog: ctx.config.name.clone(),
        sync_mode: store.sync_mode(),
        cloud_available: ctx
            .config
            .cloud_dir_absolute(&ctx.root)
            .is_some_and(|dir| dir.is_dir()),
        state: ctx.manager.state().to_string(),
        schema: store.schema().to_string(),
        store_path: store.path().map(|p| p.display().to_string()),
        settings_path: ctx.settings.path().map(|p| p.display().to_string()),
        last_applied_version: last_applied,
        pending_migrations: registry.pending_steps(last_applied).len(),
        equipment: store
            .count::<Equipment>()
            .context("Failed to count equipment")?,
        categories: ctx.categories.categories().len(),
    };

    match args.output {
        OutputFormat::Table => print_report(&report),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

fn print_report(report: &StatusReport) {
    let none = "-".to_string();
    println!("Catalog:        {}", report.catalog);
    println!(
        "Sync mode:      {}{}",
        report.sync_mode,
        if report.cloud_available { "" } else { " (cloud unavailable)" }
    );
    println!("Store:          {}", report.store_path.as_ref().unwrap_or(&none));
    println!("Schema:         {}", report.schema);
    println!("State:          {}", report.state);
    println!("Settings:       {}", report.settings_path.as_ref().unwrap_or(&none));
    println!(
        "Migrations:     v{:03} applied, {} pending",
        report.last_applied_version, report.pending_migrations
    );
    println!("Equipment:      {}", report.equipment);
    println!("Categories:     {}", report.categories);
}
