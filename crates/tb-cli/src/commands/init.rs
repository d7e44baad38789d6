//! Init command implementation - scaffolds a TackleBox project

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tb_core::config::CONFIG_FILE_NAMES;
use tb_core::{AttributeDefinition, AttributeType, Category, Config};

use crate::cli::{GlobalArgs, InitArgs};

/// File the preset categories are written to.
const CATEGORIES_FILE: &str = "categories.yml";

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let project_dir = Path::new(&global.project_dir);

    if let Some(existing) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.exists())
    {
        anyhow::bail!("{} already exists", existing.display());
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => default_name(project_dir)?,
    };
    if name.trim().is_empty() {
        anyhow::bail!("Catalog name cannot be empty");
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;

    let mut config = Config::new(name);
    config.cloud_dir = args.cloud_dir.clone();
    if !args.no_categories {
        let presets = serde_yaml::to_string(&preset_categories())
            .context("Failed to serialize preset categories")?;
        fs::write(project_dir.join(CATEGORIES_FILE), presets)
            .with_context(|| format!("Failed to write {CATEGORIES_FILE}"))?;
        config.categories_file = Some(CATEGORIES_FILE.to_string());
    }

    let data_dir = config.data_dir_absolute(project_dir);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    let body = serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
    let content = format!("# TackleBox catalog configuration\n{body}");
    fs::write(project_dir.join(CONFIG_FILE_NAMES[0]), content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAMES[0]))?;

    println!("Created TackleBox catalog '{}' in {}", config.name, project_dir.display());
    if config.cloud_dir.is_none() {
        println!("  Set cloud_dir in {} to enable `tackle sync cloud`", CONFIG_FILE_NAMES[0]);
    }
    Ok(())
}

fn default_name(project_dir: &Path) -> Result<String> {
    let absolute = if project_dir.is_absolute() {
        project_dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(project_dir)
    };
    absolute
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .last()
        .map(String::from)
        .context("Cannot derive a catalog name from the project directory; pass --name")
}

fn attribute(key: &str, label: &str, attr_type: AttributeType) -> AttributeDefinition {
    AttributeDefinition {
        key: key.to_string(),
        label: label.to_string(),
        attr_type,
        options: None,
    }
}

fn picker(key: &str, label: &str, options: &[&str]) -> AttributeDefinition {
    AttributeDefinition {
        options: Some(options.iter().map(|o| o.to_string()).collect()),
        ..attribute(key, label, AttributeType::Picker)
    }
}

fn category(name: &str, icon: &str, attributes: Vec<AttributeDefinition>) -> Category {
    Category {
        name: name.to_string(),
        attributes,
        icon: icon.to_string(),
    }
}

/// Categories written by `tackle init`.
pub(crate) fn preset_categories() -> Vec<Category> {
    vec![
        category(
            "Rods",
            "rod",
            vec![
                attribute("length_ft", "Length (ft)", AttributeType::Number),
                picker("power", "Power", &["ultralight", "light", "medium", "heavy"]),
                picker("action", "Action", &["slow", "moderate", "fast", "extra fast"]),
            ],
        ),
        category(
            "Reels",
            "reel",
            vec![
                picker("kind", "Type", &["spinning", "baitcasting", "fly", "spincast"]),
                attribute("gear_ratio", "Gear ratio", AttributeType::Text),
            ],
        ),
        category(
            "Lures",
            "lure",
            vec![
                picker("kind", "Type", &["crankbait", "jig", "spinner", "soft plastic", "topwater"]),
                attribute("weight_oz", "Weight (oz)", AttributeType::Number),
                attribute("color", "Color", AttributeType::Text),
            ],
        ),
        category(
            "Line",
            "line",
            vec![
                picker("material", "Material", &["mono", "fluorocarbon", "braid"]),
                attribute("test_lb", "Test (lb)", AttributeType::Number),
            ],
        ),
        category("Apparel", "apparel", vec![attribute("size", "Size", AttributeType::Text)]),
    ]
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
