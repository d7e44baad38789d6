//! History command implementation - lists applied migrations

use anyhow::{Context, Result};
use tb_migrate::MigrationEntry;

use crate::cli::{GlobalArgs, HistoryArgs, OutputFormat};
use crate::commands::common::{column_width, print_json};
use crate::context::RuntimeContext;

/// Execute the history command
pub(crate) async fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let registry = ctx.manager.registry();
    let history = registry.history().context("Failed to read migration history")?;

    match args.output {
        OutputFormat::Json => print_json(&history)?,
        OutputFormat::Table => {
            let last = registry
                .last_applied_version()
                .context("Failed to read migration progress")?;
            print_table(&history);
            println!();
            println!(
                "Last applied: v{last:03}, {} pending",
                registry.pending_steps(last).len()
            );
        }
    }
    Ok(())
}

fn print_table(history: &[MigrationEntry]) {
    if history.is_empty() {
        println!("No migrations applied");
        return;
    }

    let applied: Vec<String> = history
        .iter()
        .map(|e| e.applied_at.format("%Y-%m-%d %H:%M:%S").to_string())
        .collect();
    let applied_width = column_width("APPLIED_AT", applied.iter().map(String::as_str));

    println!("{:<7}  {:<applied_width$}  DESCRIPTION", "VERSION", "APPLIED_AT");
    println!("{:-<7}  {:-<applied_width$}  {}", "", "", "-".repeat(40));
    for (entry, applied_at) in history.iter().zip(&applied) {
        println!(
            "v{:<6}  {:<applied_width$}  {}",
            format!("{:03}", entry.version),
            applied_at,
            entry.description
        );
    }
}
