// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! First-time setup of a working copy.
//!
//! ```text
//! git clone --no-checkout <url> <path>
//!   && cd [/D ]<path>
//!   && git remote add composer <url>
//!   && git fetch composer
//!        |
//!        v
//! git remote set-url origin <source_url>     only if url != source_url, best-effort
//! git remote set-url --push origin <push>    GitHub URLs only, best-effort
//!        |
//!        v
//! resolver::update_to_commit
//! ```
//!
//! The pipeline is a single shell invocation because `cd` only affects the
//! shell it runs in.

use regex::Regex;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::SyncResult;

use super::command::{GitCommand, normalize_path, sanitize_url};
use super::reference::{PackageSource, WorkingCopy};
use super::resolver::update_to_commit;
use super::runner::{CommandRunner, RemoteCommand};
use super::sync::SyncSettings;


/// Renders the clone pipeline for `url` into `path`.
#[must_use]
pub fn clone_command(url: &str, path: &Path, remote: &str) -> String {
    GitCommand::git()
        .word("clone")
        .word("--no-checkout")
        .arg(url)
        .path(path)
        .and_then(GitCommand::cd(path))
        .and_then(
            GitCommand::git()
                .word("remote")
                .word("add")
                .arg(remote)
                .arg(url),
        )
        .and_then(GitCommand::git().word("fetch").arg(remote))
        .render()
}

/// Push URL for a GitHub-hosted `url`, or `None` for any other host.
///
/// SSH form (`git@host:owner/repo.git`) when `ssh` is an allowed protocol,
/// otherwise the https form.
#[must_use]
pub fn push_url(url: &str, settings: &SyncSettings) -> Option<String> {
    if settings.github_domains.is_empty() {
        return None;
    }
    let domains = settings
        .github_domains
        .iter()
        .map(|domain| regex::escape(domain))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = Regex::new(&format!(
        r"^(?:https?|git)://({domains})/([^/]+)/([^/]+?)(?:\.git)?$"
    ))
    .ok()?;

    let captures = pattern.captures(url)?;
    let (host, owner, repo) = (&captures[1], &captures[2], &captures[3]);
    if settings.github_protocols.iter().any(|p| p == "ssh") {
        Some(format!("git@{host}:{owner}/{repo}.git"))
    } else {
        Some(format!("https://{host}/{owner}/{repo}.git"))
    }
}

/// Points the push URL of `origin` at the canonical GitHub repository.
///
/// Failures are logged and ignored.
pub async fn set_push_url(
    runner: &mut dyn CommandRunner,
    path: &Path,
    url: &str,
    settings: &SyncSettings,
) {
    let Some(push) = push_url(url, settings) else {
        return;
    };
    let command = GitCommand::git()
        .word("remote")
        .word("set-url")
        .word("--push")
        .word("origin")
        .arg(&push)
        .render();
    match runner.execute(&command, path).await {
        Ok(result) if result.success() => debug!(push_url = %sanitize_url(&push), "push url set"),
        Ok(_) => debug!(
            stderr = %sanitize_url(runner.last_error_output()),
            "could not set push url"
        ),
        Err(err) => debug!(error = %err, "could not set push url"),
    }
}

/// Repoints `origin` at the canonical source URL after cloning from a mirror.
///
/// The fetch already went through the sync remote, so a failure here only
/// leaves stale metadata behind: it is logged and swallowed.
async fn repoint_origin(runner: &mut dyn CommandRunner, path: &Path, source_url: &str) {
    let command = GitCommand::git()
        .word("remote")
        .word("set-url")
        .word("origin")
        .arg(source_url)
        .render();
    match runner.execute(&command, path).await {
        Ok(result) if result.success() => {}
        Ok(_) => warn!(
            command = %sanitize_url(&command),
            stderr = %sanitize_url(runner.last_error_output()),
            "failed to repoint origin, continuing"
        ),
        Err(err) => warn!(
            command = %sanitize_url(&command),
            error = %err,
            "failed to repoint origin, continuing"
        ),
    }
}

/// Clones `url` into `path` and checks out the package's source reference.
///
/// A reference rewritten by the resolver is written back into `package`.
///
/// # Errors
///
/// Returns [`crate::error::GitError::CloneFailed`] if the clone pipeline fails
/// (the partial clone is left in place) and
/// [`crate::error::GitError::CheckoutFailed`] if the reference cannot be
/// checked out.
pub async fn bootstrap(
    runner: &mut dyn CommandRunner,
    remote: &dyn RemoteCommand,
    package: &mut PackageSource,
    path: &Path,
    url: &str,
    settings: &SyncSettings,
) -> SyncResult<WorkingCopy> {
    let path = normalize_path(path);
    let target = package.target_ref();
    info!(package = %package.name, "Cloning {}", target.reference());

    let remote_name = settings.remote_name.as_str();
    let build = |url: &str| clone_command(url, &path, remote_name);
    remote
        .run_with_fallback(runner, &build, url, Path::new("."), true)
        .await?;

    let wc = WorkingCopy::new(&path).with_remote_name(remote_name);

    if url != package.source_url {
        repoint_origin(runner, wc.path(), &package.source_url).await;
    }
    set_push_url(runner, wc.path(), &package.source_url, settings).await;

    if let Some(reference) = update_to_commit(runner, &wc, &target).await? {
        package.apply_resolved_reference(&reference);
    }
    Ok(wc)
}
