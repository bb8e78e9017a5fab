use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_run_collects_repeated_statements_in_order() {
    let cli = Cli::try_parse_from([
        "sfddl",
        "run",
        "--auth-mode",
        "okta",
        "-e",
        "CREATE TABLE a (id INT)",
        "--statement",
        "CREATE TABLE b (id INT)",
        "--dry-run",
    ])
    .unwrap();

    let Commands::Run(args) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(
        args.source.statements,
        vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]
    );
    assert_eq!(args.connection.auth_mode.as_deref(), Some("okta"));
    assert!(args.dry_run);
    assert!(!args.connection.suspend_warehouse);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "sfddl",
        "check",
        "--config",
        "sfddl.yml",
        "--log-dir",
        "/var/log/sfddl",
        "-v",
    ])
    .unwrap();

    assert!(cli.global.verbose);
    assert_eq!(cli.global.config, Some(PathBuf::from("sfddl.yml")));
    assert_eq!(cli.global.log_dir, Some(PathBuf::from("/var/log/sfddl")));
    assert!(matches!(cli.command, Commands::Check(_)));
}

#[test]
fn test_login_timeout_must_be_numeric() {
    let result = Cli::try_parse_from(["sfddl", "check", "--login-timeout", "soon"]);
    assert!(result.is_err());
}
