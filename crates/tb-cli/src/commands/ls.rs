//! List command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use tb_core::Equipment;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::{column_width, print_json, truncate};
use crate::context::RuntimeContext;

/// Equipment as shown by `tackle ls`
#[derive(Debug, Serialize)]
struct ItemRow {
    id: String,
    name: String,
    category: Option<String>,
    quantity: u32,
    status: String,
    is_equipped: bool,
    notes: Option<String>,
    attributes: Option<serde_json::Value>,
}

impl From<&Equipment> for ItemRow {
    fn from(item: &Equipment) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            status: item.status.clone(),
            is_equipped: item.is_equipped,
            notes: item.notes.clone(),
            attributes: item
                .attributes_json
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok()),
        }
    }
}

/// Execute the ls command
pub(crate) async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let items = ctx
        .manager
        .store()
        .fetch_all::<Equipment>()
        .context("Failed to read equipment")?;

    let rows: Vec<ItemRow> = filter_items(&items, args).map(ItemRow::from).collect();

    match args.output {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
    }
    Ok(())
}

fn filter_items<'a>(items: &'a [Equipment], args: &'a LsArgs) -> impl Iterator<Item = &'a Equipment> {
    items.iter().filter(move |item| {
        let category_matches = match &args.category {
            Some(wanted) => item.category.as_deref() == Some(wanted.as_str()),
            None => true,
        };
        category_matches && (!args.equipped || item.is_equipped)
    })
}

fn print_table(rows: &[ItemRow]) {
    if rows.is_empty() {
        println!("No equipment found");
        return;
    }

    let name_width = column_width("NAME", rows.iter().map(|r| r.name.as_str()));
    let category_width = column_width(
        "CATEGORY",
        rows.iter().map(|r| r.category.as_deref().unwrap_or("-")),
    );
    let status_width = column_width("STATUS", rows.iter().map(|r| r.status.as_str()));

    println!(
        "{:<36}  {:<name_width$}  {:<category_width$}  {:>3}  {:<status_width$}  {:<8}  NOTES",
        "ID", "NAME", "CATEGORY", "QTY", "STATUS", "EQUIPPED"
    );
    println!(
        "{:-<36}  {:-<name_width$}  {:-<category_width$}  {:-<3}  {:-<status_width$}  {:-<8}  {}",
        "",
        "",
        "",
        "",
        "",
        "",
        "-".repeat(20)
    );
    for row in rows {
        println!(
            "{:<36}  {:<name_width$}  {:<category_width$}  {:>3}  {:<status_width$}  {:<8}  {}",
            row.id,
            row.name,
            row.category.as_deref().unwrap_or("-"),
            row.quantity,
            row.status,
            if row.is_equipped { "yes" } else { "no" },
            row.notes.as_deref().map_or_else(|| "-".to_string(), |n| truncate(n, 40)),
        );
    }

    println!();
    println!("{} item(s)", rows.len());
}

#[cfg(test)]
#[path = "ls_test.rs"]
mod tests;
