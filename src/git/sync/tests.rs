// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    ShallowGitSync, SourceSync, SyncSettings, has_metadata_repository, sync, update_command,
};
use crate::error::GitError;
use crate::git::changes::LocalChangesPolicy;
use crate::git::reference::{PackageSource, TargetRef};
use crate::git::runner::DirectRemote;
use crate::git::test_utils::ScriptedRunner;
use std::fs;
use tempfile::TempDir;

const URL: &str = "https://github.com/acme/lib.git";
const STATUS: &str = "git status --porcelain --untracked-files=no";

fn checkout_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    fs::create_dir(dir.path().join(".git")).expect("failed to create .git");
    dir
}

fn package(reference: &str) -> PackageSource {
    PackageSource {
        name: "acme/lib".to_string(),
        source_url: URL.to_string(),
        source_reference: reference.to_string(),
        dist_reference: None,
        pretty_version: "dev-main".to_string(),
        release_date: None,
    }
}

#[cfg(unix)]
#[test]
fn test_update_command() {
    insta::assert_snapshot!(
        update_command(URL, "composer"),
        @"git remote set-url composer 'https://github.com/acme/lib.git' && git fetch composer && git fetch --tags composer"
    );
}

#[test]
fn test_metadata_detection() {
    let empty = tempfile::tempdir().expect("failed to create temp dir");
    assert!(!has_metadata_repository(empty.path()));

    let gitfile = tempfile::tempdir().expect("failed to create temp dir");
    fs::write(gitfile.path().join(".git"), "gitdir: ../elsewhere").expect("write gitfile");
    assert!(has_metadata_repository(gitfile.path()));

    assert!(has_metadata_repository(checkout_dir().path()));
}

#[tokio::test]
async fn test_missing_repository_runs_nothing() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut git = ShallowGitSync::new(ScriptedRunner::new(), SyncSettings::default());
    let mut wc = git.working_copy(dir.path());
    let mut pkg = package("main");

    let err = git
        .sync_to_reference(&mut wc, &mut pkg, URL)
        .await
        .expect_err("no .git");

    let Some(GitError::MissingRepository { path, help_url }) = err.as_git() else {
        panic!("expected MissingRepository, got {err}");
    };
    assert_eq!(path, &dir.path().display().to_string());
    assert_eq!(help_url, "https://getcomposer.org/commit-deps");
    assert!(git.runner().commands.is_empty());
    assert!(err.to_string().contains("see https://getcomposer.org/commit-deps for more information"));
}

#[tokio::test]
async fn test_plain_sync_checks_metadata_first() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let mut runner = ScriptedRunner::new();
    let wc = crate::git::reference::WorkingCopy::new(dir.path());

    let err = sync(
        &mut runner,
        &DirectRemote,
        &wc,
        URL,
        &TargetRef::new("main", "dev-main"),
        "https://example.com/help",
    )
    .await
    .expect_err("no .git");

    assert!(err.to_string().contains("https://example.com/help"));
    assert!(runner.commands.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_update_to_tracked_branch() {
    let dir = checkout_dir();
    let runner = ScriptedRunner::new().branches(&["composer/main"]);
    let mut git = ShallowGitSync::new(runner, SyncSettings::default());
    let mut wc = git.working_copy(dir.path());
    let mut pkg = package("main");

    let effective = git
        .sync_to_reference(&mut wc, &mut pkg, URL)
        .await
        .expect("sync succeeds");

    assert_eq!(effective, None);
    assert_eq!(pkg.source_reference, "main");
    insta::assert_debug_snapshot!(git.runner().commands, @r#"
    [
        "git status --porcelain --untracked-files=no",
        "git remote set-url composer 'https://github.com/acme/lib.git' && git fetch composer && git fetch --tags composer",
        "git branch -r",
        "git checkout -B main composer/main -- && git reset --hard composer/main --",
    ]
    "#);
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_fetch_is_fatal() {
    let dir = checkout_dir();
    let runner = ScriptedRunner::new().fail(
        &update_command(URL, "composer"),
        "fatal: repository 'https://github.com/acme/lib.git/' not found",
    );
    let mut git = ShallowGitSync::new(runner, SyncSettings::default());
    let mut wc = git.working_copy(dir.path());

    let err = git
        .sync_to_reference(&mut wc, &mut package("main"), URL)
        .await
        .expect_err("fetch fails");

    assert!(matches!(err.as_git(), Some(GitError::RemoteFailed { .. })));
    assert_eq!(git.runner().commands.len(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_stash_policy_wraps_update() {
    let dir = checkout_dir();
    let runner = ScriptedRunner::new()
        .succeed_with(STATUS, " M src/lib.rs\n")
        .branches(&["composer/main"]);
    let settings = SyncSettings {
        local_changes: LocalChangesPolicy::Stash,
        ..SyncSettings::default()
    };
    let mut git = ShallowGitSync::new(runner, settings);
    let mut wc = git.working_copy(dir.path());

    git.sync_to_reference(&mut wc, &mut package("main"), URL)
        .await
        .expect("sync succeeds");

    let commands = &git.runner().commands;
    assert_eq!(commands[1], "git stash --include-untracked");
    assert_eq!(
        commands[4],
        "git checkout -f -B main composer/main -- && git reset --hard composer/main --"
    );
    assert_eq!(commands.last().map(String::as_str), Some("git stash pop"));
    assert!(wc.force_allowed());
    assert!(!wc.has_stashed_changes());
}

#[tokio::test]
async fn test_dirty_copy_fails_by_default() {
    let dir = checkout_dir();
    let runner = ScriptedRunner::new().succeed_with(STATUS, " M src/lib.rs\n");
    let mut git = ShallowGitSync::new(runner, SyncSettings::default());
    let mut wc = git.working_copy(dir.path());

    let err = git
        .sync_to_reference(&mut wc, &mut package("main"), URL)
        .await
        .expect_err("dirty copy");

    assert!(matches!(err.as_git(), Some(GitError::LocalChanges { .. })));
    assert_eq!(git.runner().commands, vec![STATUS]);
}

#[tokio::test]
async fn test_force_survives_across_updates() {
    let dir = checkout_dir();
    let runner = ScriptedRunner::new()
        .succeed_with(STATUS, " M src/lib.rs\n")
        .branches(&["composer/main"]);
    let settings = SyncSettings {
        local_changes: LocalChangesPolicy::Discard,
        ..SyncSettings::default()
    };
    let mut git = ShallowGitSync::new(runner, settings);
    let mut wc = git.working_copy(dir.path());

    git.sync_to_reference(&mut wc, &mut package("main"), URL)
        .await
        .expect("first sync");
    git.sync_to_reference(&mut wc, &mut package("main"), URL)
        .await
        .expect("second sync");

    let forced = git
        .runner()
        .commands
        .iter()
        .filter(|c| c.starts_with("git checkout -f -B main"))
        .count();
    assert_eq!(forced, 2);
    assert!(wc.force_allowed());
}
