//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use tb_core::SyncMode;

/// TackleBox - catalog your fishing tackle, locally or in a synced folder
#[derive(Parser, Debug)]
#[command(name = "tackle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create tacklebox.yml and a preset category list
    Init(InitArgs),

    /// Show the active store and migration progress
    Status(StatusArgs),

    /// Switch between local and cloud-synced storage
    Sync(SyncArgs),

    /// List applied migrations
    History(HistoryArgs),

    /// Add a piece of equipment
    Add(AddArgs),

    /// List equipment
    Ls(LsArgs),

    /// Remove a piece of equipment
    Rm(RmArgs),

    /// List preset categories and their attributes
    Categories(CategoriesArgs),
}

/// Output formats shared by listing commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Catalog name (default: project directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory replicated by your sync client, enables `tackle sync cloud`
    #[arg(long)]
    pub cloud_dir: Option<String>,

    /// Skip writing the preset categories file
    #[arg(long)]
    pub no_categories: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Sync mode as given on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    /// Store on this device only
    Local,
    /// Store in the configured cloud directory
    Cloud,
}

impl From<SyncTarget> for SyncMode {
    fn from(target: SyncTarget) -> Self {
        match target {
            SyncTarget::Local => SyncMode::Local,
            SyncTarget::Cloud => SyncMode::Cloud,
        }
    }
}

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Mode to switch to
    #[arg(value_enum)]
    pub mode: SyncTarget,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the add command
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Display name
    pub name: String,

    /// Category name
    #[arg(short = 'k', long)]
    pub category: Option<String>,

    /// Number of identical items
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Mark the item as packed
    #[arg(short, long)]
    pub equipped: bool,

    /// Category attribute as key=value (repeatable)
    #[arg(short, long = "attr", value_name = "KEY=VALUE")]
    pub attrs: Vec<String>,
}

/// Arguments for the ls command
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Only show items in this category
    #[arg(short = 'k', long)]
    pub category: Option<String>,

    /// Only show packed items
    #[arg(short, long)]
    pub equipped: bool,
}

/// Arguments for the rm command
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Identifier of the item, as shown by `tackle ls`
    pub id: String,
}

/// Arguments for the categories command
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
