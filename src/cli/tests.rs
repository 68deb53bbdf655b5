// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Command};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["gitshallow", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "gitshallow",
        "-l",
        "4",
        "--ini",
        "a.toml",
        "--ini",
        "b.toml",
        "-s",
        "git/remote_name=upstream",
        "--timeout",
        "30",
        "options",
    ])
    .unwrap();

    assert_eq!(cli.global.log_level, Some(4));
    assert_eq!(
        cli.global.inis,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "git/remote_name=upstream",
        "global/output_log_level=4",
        "global/file_log_level=4",
        "git/command_timeout_secs=30",
    ]
    "#);
}

#[test]
fn test_file_log_level_overrides_log_level() {
    let cli = Cli::try_parse_from([
        "gitshallow",
        "-l",
        "2",
        "--file-log-level",
        "6",
        "--log-file",
        "sync.log",
        "version",
    ])
    .unwrap();

    assert_eq!(
        cli.global.to_config_overrides(),
        vec![
            "global/output_log_level=2",
            "global/file_log_level=6",
            "global/log_file=sync.log",
        ]
    );
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["gitshallow", "-l", "7", "version"]).is_err());
}

#[test]
fn test_parse_clone() {
    let cli = Cli::try_parse_from([
        "gitshallow",
        "clone",
        "https://github.com/acme/lib.git",
        "vendor/acme/lib",
        "--reference",
        "main",
        "--pretty",
        "dev-main",
    ])
    .unwrap();

    let Some(Command::Clone(args)) = cli.command else {
        panic!("expected clone command");
    };
    let package = args.to_package();
    assert_eq!(package.name, "lib");
    assert_eq!(package.source_url, "https://github.com/acme/lib.git");
    assert_eq!(package.source_reference, "main");
    assert_eq!(package.pretty_version, "dev-main");
    assert_eq!(package.dist_reference, None);
    assert!(!args.json);
}

#[test]
fn test_parse_update_with_mirror() {
    let cli = Cli::try_parse_from([
        "gitshallow",
        "update",
        "/srv/mirror/lib.git",
        "lib",
        "-r",
        "v1.2.0",
        "--source-url",
        "https://github.com/acme/lib.git",
        "--name",
        "acme/lib",
        "--dist-reference",
        "v1.2.0",
        "--release-date",
        "2024-05-01T12:00:00Z",
        "--json",
    ])
    .unwrap();

    let Some(Command::Update(args)) = cli.command else {
        panic!("expected update command");
    };
    assert!(args.json);
    let package = args.to_package();
    assert_eq!(package.name, "acme/lib");
    assert_eq!(package.source_url, "https://github.com/acme/lib.git");
    assert_eq!(package.pretty_version, "v1.2.0");
    assert_eq!(package.dist_reference.as_deref(), Some("v1.2.0"));
    assert_eq!(
        package.release_date.map(|d| d.to_rfc3339()).as_deref(),
        Some("2024-05-01T12:00:00+00:00")
    );
}

#[test]
fn test_reference_is_required() {
    assert!(Cli::try_parse_from(["gitshallow", "clone", "https://x.test/r.git", "r"]).is_err());
}

#[test]
fn test_parse_status_defaults_to_cwd() {
    let cli = Cli::try_parse_from(["gitshallow", "status"]).unwrap();
    let Some(Command::Status(args)) = cli.command else {
        panic!("expected status command");
    };
    assert_eq!(args.path, PathBuf::from("."));
    assert!(!args.json);
}
