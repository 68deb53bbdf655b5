// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for cloning and updating against real repositories.
//!
//! Every test builds an upstream repository in a temp dir and drives
//! `ShallowGitSync` with the real shell runner.

use gitshallow::error::GitError;
use gitshallow::git::changes::LocalChangesPolicy;
use gitshallow::git::query::{current_branch, has_stashed_changes, head_commit, status};
use gitshallow::git::reference::{PackageSource, WorkingCopy};
use gitshallow::git::runner::ShellRunner;
use gitshallow::git::sync::{ShallowGitSync, SourceSync, SyncSettings};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Helper to run git commands in a directory, returning trimmed stdout.
fn run_git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit_file(repo: &Path, name: &str, content: &str, message: &str) -> String {
    fs::write(repo.join(name), content).unwrap();
    run_git(&["add", "."], repo);
    run_git(&["commit", "-q", "-m", message], repo);
    run_git(&["rev-parse", "HEAD"], repo)
}

/// Upstream with two commits on `main` and a `v1.0.0` tag on the first one.
struct Upstream {
    _dir: TempDir,
    path: PathBuf,
    first: String,
    second: String,
}

impl Upstream {
    fn new() -> Self {
        let dir = temp_dir();
        let path = dir.path().join("upstream");
        fs::create_dir(&path).unwrap();
        run_git(&["init", "-q"], &path);
        run_git(&["symbolic-ref", "HEAD", "refs/heads/main"], &path);
        let first = commit_file(&path, "README.md", "# Lib\n", "Initial commit");
        run_git(&["tag", "v1.0.0"], &path);
        let second = commit_file(&path, "src.txt", "one\n", "Add source");
        Self {
            _dir: dir,
            path,
            first,
            second,
        }
    }

    fn url(&self) -> String {
        self.path.display().to_string()
    }

    fn package(&self, reference: &str, pretty: &str) -> PackageSource {
        PackageSource {
            name: "acme/lib".to_string(),
            source_url: self.url(),
            source_reference: reference.to_string(),
            dist_reference: Some(reference.to_string()),
            pretty_version: pretty.to_string(),
            release_date: None,
        }
    }
}

fn driver(policy: LocalChangesPolicy) -> ShallowGitSync {
    let settings = SyncSettings {
        local_changes: policy,
        ..SyncSettings::default()
    };
    ShallowGitSync::new(ShellRunner::new(), settings)
}

async fn clone_at(upstream: &Upstream, target: &Path, reference: &str, pretty: &str) -> WorkingCopy {
    let mut package = upstream.package(reference, pretty);
    let wc = driver(LocalChangesPolicy::Fail)
        .bootstrap(&mut package, target, &upstream.url())
        .await
        .expect("clone should succeed");
    run_git(&["config", "user.email", "test@test.com"], target);
    run_git(&["config", "user.name", "Test"], target);
    wc
}

// =============================================================================
// clone
// =============================================================================

#[tokio::test]
async fn clone_branch_tracks_remote_tip() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");

    clone_at(&upstream, &target, "main", "dev-main").await;

    assert_eq!(current_branch(&target).unwrap().as_deref(), Some("main"));
    assert_eq!(head_commit(&target).unwrap(), Some(upstream.second.clone()));
    assert!(target.join("src.txt").exists());
    assert_eq!(run_git(&["remote"], &target), "composer\norigin");
}

#[tokio::test]
async fn clone_commit_hash_keeps_branch() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");

    clone_at(&upstream, &target, &upstream.first, "dev-main").await;

    assert_eq!(current_branch(&target).unwrap().as_deref(), Some("main"));
    assert_eq!(head_commit(&target).unwrap(), Some(upstream.first.clone()));
    assert!(!target.join("src.txt").exists());
}

#[tokio::test]
async fn clone_tag_detaches_head() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");

    clone_at(&upstream, &target, "v1.0.0", "1.0.0").await;

    assert_eq!(current_branch(&target).unwrap(), None);
    assert_eq!(head_commit(&target).unwrap(), Some(upstream.first.clone()));
}

#[tokio::test]
async fn clone_unknown_reference_fails() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    let mut package = upstream.package("no-such-ref", "dev-no-such-ref");

    let err = driver(LocalChangesPolicy::Fail)
        .bootstrap(&mut package, &target, &upstream.url())
        .await
        .expect_err("unknown reference");

    assert!(
        matches!(err.as_git(), Some(GitError::CheckoutFailed { .. })),
        "{err}"
    );
    assert_eq!(package.source_reference, "no-such-ref");
}

#[tokio::test]
async fn clone_from_unreachable_url_fails() {
    let work = temp_dir();
    let target = work.path().join("lib");
    let missing = work.path().join("missing").display().to_string();
    let mut package = PackageSource {
        name: "acme/lib".to_string(),
        source_url: missing.clone(),
        source_reference: "main".to_string(),
        dist_reference: None,
        pretty_version: "dev-main".to_string(),
        release_date: None,
    };

    let err = driver(LocalChangesPolicy::Fail)
        .bootstrap(&mut package, &target, &missing)
        .await
        .expect_err("nothing to clone");

    assert!(
        matches!(err.as_git(), Some(GitError::CloneFailed { .. })),
        "{err}"
    );
}

// =============================================================================
// update
// =============================================================================

#[tokio::test]
async fn update_follows_new_upstream_commit() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    let mut wc = clone_at(&upstream, &target, "main", "dev-main").await;

    let third = commit_file(&upstream.path, "src.txt", "two\n", "Change source");
    let mut package = upstream.package("main", "dev-main");
    let mut sync = driver(LocalChangesPolicy::Fail);
    sync.sync_to_reference(&mut wc, &mut package, &upstream.url())
        .await
        .expect("update should succeed");

    assert_eq!(head_commit(&target).unwrap(), Some(third));
    assert_eq!(fs::read_to_string(target.join("src.txt")).unwrap(), "two\n");
}

#[tokio::test]
async fn update_is_idempotent() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    let mut wc = clone_at(&upstream, &target, "main", "dev-main").await;
    let mut sync = driver(LocalChangesPolicy::Fail);

    for _ in 0..2 {
        let mut package = upstream.package(&upstream.first, "dev-main");
        sync.sync_to_reference(&mut wc, &mut package, &upstream.url())
            .await
            .expect("update should succeed");
        assert_eq!(package.source_reference, upstream.first);
        assert_eq!(head_commit(&target).unwrap(), Some(upstream.first.clone()));
        assert_eq!(current_branch(&target).unwrap().as_deref(), Some("main"));
    }
}

#[tokio::test]
async fn update_without_git_directory_runs_nothing() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("keep.txt"), "mine").unwrap();

    let mut sync = driver(LocalChangesPolicy::Fail);
    let mut wc = sync.working_copy(&target);
    let mut package = upstream.package("main", "dev-main");
    let err = sync
        .sync_to_reference(&mut wc, &mut package, &upstream.url())
        .await
        .expect_err("missing .git");

    assert!(
        matches!(err.as_git(), Some(GitError::MissingRepository { .. })),
        "{err}"
    );
    assert!(err.to_string().contains("https://getcomposer.org/commit-deps"));
    let entries: Vec<_> = fs::read_dir(&target).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn update_refuses_local_changes_by_default() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    let mut wc = clone_at(&upstream, &target, "main", "dev-main").await;
    fs::write(target.join("README.md"), "edited\n").unwrap();

    let mut package = upstream.package(&upstream.first, "dev-main");
    let err = driver(LocalChangesPolicy::Fail)
        .sync_to_reference(&mut wc, &mut package, &upstream.url())
        .await
        .expect_err("dirty working copy");

    assert!(
        matches!(err.as_git(), Some(GitError::LocalChanges { .. })),
        "{err}"
    );
    assert!(err.to_string().contains("README.md"), "{err}");
    assert_eq!(head_commit(&target).unwrap(), Some(upstream.second.clone()));
}

#[tokio::test]
async fn update_discards_local_changes() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    let mut wc = clone_at(&upstream, &target, "main", "dev-main").await;
    fs::write(target.join("README.md"), "edited\n").unwrap();

    let mut package = upstream.package("main", "dev-main");
    driver(LocalChangesPolicy::Discard)
        .sync_to_reference(&mut wc, &mut package, &upstream.url())
        .await
        .expect("update should succeed");

    assert_eq!(fs::read_to_string(target.join("README.md")).unwrap(), "# Lib\n");
    assert!(wc.force_allowed());
}

#[tokio::test]
async fn update_stashes_and_reapplies_local_changes() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    let mut wc = clone_at(&upstream, &target, "main", "dev-main").await;
    fs::write(target.join("README.md"), "edited\n").unwrap();

    let third = commit_file(&upstream.path, "src.txt", "two\n", "Change source");
    let mut package = upstream.package("main", "dev-main");
    driver(LocalChangesPolicy::Stash)
        .sync_to_reference(&mut wc, &mut package, &upstream.url())
        .await
        .expect("update should succeed");

    assert_eq!(head_commit(&target).unwrap(), Some(third));
    assert_eq!(fs::read_to_string(target.join("README.md")).unwrap(), "edited\n");
    assert!(!wc.has_stashed_changes());
    assert!(!has_stashed_changes(&target).unwrap());
}

#[tokio::test]
async fn update_to_tag_after_branch() {
    let upstream = Upstream::new();
    let work = temp_dir();
    let target = work.path().join("lib");
    let mut wc = clone_at(&upstream, &target, "main", "dev-main").await;

    let mut package = upstream.package("v1.0.0", "1.0.0");
    driver(LocalChangesPolicy::Fail)
        .sync_to_reference(&mut wc, &mut package, &upstream.url())
        .await
        .expect("update should succeed");

    let state = status(&target).unwrap();
    assert!(state.is_repository);
    assert_eq!(state.branch, None);
    assert_eq!(state.head, Some(upstream.first.clone()));
    assert!(!state.has_local_changes);
}
