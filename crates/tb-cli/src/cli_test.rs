use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parses_sync_target() {
    let cli = Cli::try_parse_from(["tackle", "sync", "cloud"]).unwrap();
    match cli.command {
        Commands::Sync(args) => assert_eq!(SyncMode::from(args.mode), SyncMode::Cloud),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_sync_target() {
    assert!(Cli::try_parse_from(["tackle", "sync", "icloud"]).is_err());
}

#[test]
fn parses_repeated_attributes() {
    let cli = Cli::try_parse_from([
        "tackle", "add", "Spinning rod", "-k", "Rods", "-a", "length=7", "--attr", "power=medium",
    ])
    .unwrap();
    match cli.command {
        Commands::Add(args) => {
            assert_eq!(args.name, "Spinning rod");
            assert_eq!(args.category.as_deref(), Some("Rods"));
            assert_eq!(args.quantity, 1);
            assert_eq!(args.attrs, vec!["length=7", "power=medium"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["tackle", "ls", "-v", "-p", "/tmp/box"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, "/tmp/box");
}
