//! Categories command implementation

use anyhow::Result;
use tb_core::{AttributeType, Category};

use crate::cli::{CategoriesArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{column_width, print_json};
use crate::context::RuntimeContext;

/// Execute the categories command
pub(crate) async fn execute(args: &CategoriesArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let categories = ctx.categories.categories();

    match args.output {
        OutputFormat::Json => print_json(categories)?,
        OutputFormat::Table => print_table(categories),
    }
    Ok(())
}

fn print_table(categories: &[Category]) {
    if categories.is_empty() {
        println!("No preset categories (set categories_file in tacklebox.yml)");
        return;
    }

    let name_width = column_width("NAME", categories.iter().map(|c| c.name.as_str()));
    println!("{:<name_width$}  ATTRIBUTES", "NAME");
    println!("{:-<name_width$}  {}", "", "-".repeat(40));
    for category in categories {
        let attributes: Vec<String> = category.attributes.iter().map(describe).collect();
        println!(
            "{:<name_width$}  {}",
            category.name,
            if attributes.is_empty() {
                "-".to_string()
            } else {
                attributes.join(", ")
            }
        );
    }
}

fn describe(attr: &tb_core::AttributeDefinition) -> String {
    match (attr.attr_type, &attr.options) {
        (AttributeType::Picker, Some(options)) => format!("{} [{}]", attr.key, options.join("|")),
        (AttributeType::Number, _) => format!("{} (number)", attr.key),
        _ => attr.key.clone(),
    }
}
