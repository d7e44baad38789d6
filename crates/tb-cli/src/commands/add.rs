//! Add command implementation

use anyhow::{Context, Result};
use serde_json::{Map, Number, Value};
use tb_core::{AttributeType, Category, CategoryCatalog, Equipment};

use crate::cli::{AddArgs, GlobalArgs};
use crate::context::RuntimeContext;

/// Execute the add command
pub(crate) async fn execute(args: &AddArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let item = build_item(args, &ctx.categories)?;

    let store = ctx.manager.store();
    store.insert(&item).context("Failed to stage equipment")?;
    store.commit().context("Failed to save equipment")?;

    println!("Added '{}' ({})", item.name, item.id);
    Ok(())
}

/// Build a new item from the command line, checking it against the catalog.
pub(crate) fn build_item(args: &AddArgs, catalog: &CategoryCatalog) -> Result<Equipment> {
    let name = args.name.trim();
    if name.is_empty() {
        anyhow::bail!("Equipment name cannot be empty");
    }
    if args.quantity == 0 {
        anyhow::bail!("Quantity must be at least 1");
    }

    let category = match &args.category {
        Some(requested) if !catalog.categories().is_empty() => {
            Some(catalog.get(requested).with_context(|| {
                let known: Vec<&str> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
                format!("Unknown category '{requested}' (known: {})", known.join(", "))
            })?)
        }
        _ => None,
    };

    let mut item = Equipment::new(name);
    item.category = args.category.clone();
    item.quantity = args.quantity;
    item.is_equipped = args.equipped;
    item.notes = args.notes.clone();
    item.attributes_json = parse_attributes(&args.attrs, category)?;
    Ok(item)
}

/// Turn `key=value` pairs into a JSON object string.
///
/// With a category, keys must be declared by it and values must fit the
/// attribute type; without one every value is kept as text.
pub(crate) fn parse_attributes(pairs: &[String], category: Option<&Category>) -> Result<Option<String>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut attributes = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Attribute '{pair}' must be KEY=VALUE"))?;
        let key = key.trim();
        let raw = raw.trim();
        if key.is_empty() {
            anyhow::bail!("Attribute '{pair}' has an empty key");
        }

        let value = match category {
            None => Value::String(raw.to_string()),
            Some(category) => {
                let definition = category.attribute(key).with_context(|| {
                    format!("Category '{}' has no attribute '{key}'", category.name)
                })?;
                typed_value(key, raw, definition.attr_type, definition.options.as_deref())?
            }
        };
        attributes.insert(key.to_string(), value);
    }

    Ok(Some(Value::Object(attributes).to_string()))
}

fn typed_value(key: &str, raw: &str, attr_type: AttributeType, options: Option<&[String]>) -> Result<Value> {
    match attr_type {
        AttributeType::Text => Ok(Value::String(raw.to_string())),
        AttributeType::Number => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .with_context(|| format!("Attribute '{key}' expects a number, got '{raw}'")),
        AttributeType::Picker => {
            let options = options.unwrap_or_default();
            if options.iter().any(|o| o == raw) {
                Ok(Value::String(raw.to_string()))
            } else {
                anyhow::bail!(
                    "Attribute '{key}' must be one of: {} (got '{raw}')",
                    options.join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
