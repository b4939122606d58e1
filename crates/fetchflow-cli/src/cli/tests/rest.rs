//! Tests for flaky, demo, completions, man and the global flags.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::{CommandFactory, Parser};

#[test]
fn cli_parse_flaky_defaults() {
    match parse(&["fetchflow", "flaky"]) {
        CliCommand::Flaky {
            attempts,
            failure_rate,
        } => {
            assert_eq!(attempts, 3);
            assert!(failure_rate.is_none());
        }
        _ => panic!("expected Flaky"),
    }
}

#[test]
fn cli_parse_flaky_options() {
    match parse(&["fetchflow", "flaky", "--attempts", "5", "--failure-rate", "0.25"]) {
        CliCommand::Flaky {
            attempts,
            failure_rate,
        } => {
            assert_eq!(attempts, 5);
            assert_eq!(failure_rate, Some(0.25));
        }
        _ => panic!("expected Flaky"),
    }
}

#[test]
fn cli_parse_demo() {
    match parse(&["fetchflow", "demo"]) {
        CliCommand::Demo { no_pacing } => assert!(!no_pacing),
        _ => panic!("expected Demo"),
    }
    match parse(&["fetchflow", "demo", "--no-pacing"]) {
        CliCommand::Demo { no_pacing } => assert!(no_pacing),
        _ => panic!("expected Demo"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["fetchflow", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_parse_man() {
    match parse(&["fetchflow", "man"]) {
        CliCommand::Man => {}
        _ => panic!("expected Man"),
    }
}

#[test]
fn cli_global_flags_default_off() {
    let cli = Cli::try_parse_from(["fetchflow", "stats"]).unwrap();
    assert!(!cli.offline);
    assert!(cli.base_url.is_none());
    assert!(cli.config.is_none());
}

#[test]
fn cli_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "fetchflow",
        "active",
        "--offline",
        "--base-url",
        "http://127.0.0.1:8080",
        "--config",
        "/tmp/fetchflow.toml",
    ])
    .unwrap();
    assert!(cli.offline);
    assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:8080"));
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/fetchflow.toml"))
    );
    assert!(matches!(cli.command, CliCommand::Active));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["fetchflow"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn cli_flaky_rejects_zero_attempts() {
    assert!(Cli::try_parse_from(["fetchflow", "flaky", "--attempts", "0"]).is_err());
}

#[test]
fn cli_flaky_rejects_rate_outside_unit_interval() {
    assert!(Cli::try_parse_from(["fetchflow", "flaky", "--failure-rate", "3.0"]).is_err());
    assert!(Cli::try_parse_from(["fetchflow", "flaky", "--failure-rate", "-0.1"]).is_err());
    assert!(Cli::try_parse_from(["fetchflow", "flaky", "--failure-rate", "nope"]).is_err());
    assert!(Cli::try_parse_from(["fetchflow", "flaky", "--failure-rate", "1"]).is_ok());
}
