//! TackleBox CLI - catalog fishing tackle in a local or cloud-synced store

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{add, categories, history, init, ls, rm, status, sync};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Init(args) => init::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Sync(args) => sync::execute(args, &cli.global).await,
        cli::Commands::History(args) => history::execute(args, &cli.global).await,
        cli::Commands::Add(args) => add::execute(args, &cli.global).await,
        cli::Commands::Ls(args) => ls::execute(args, &cli.global).await,
        cli::Commands::Rm(args) => rm::execute(args, &cli.global).await,
        cli::Commands::Categories(args) => categories::execute(args, &cli.global).await,
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
