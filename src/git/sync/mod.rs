// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bringing an existing working copy to a package's reference.
//!
//! ```text
//! SourceSync (trait)
//!   bootstrap()          --> bootstrap::bootstrap
//!   sync_to_reference()
//!        |
//!        v
//!   .git present?  no --> MissingRepository (nothing executed)
//!        |
//!   local changes --> fail | discard | stash
//!        |
//!   git remote set-url composer <url>
//!     && git fetch composer && git fetch --tags composer
//!        |
//!   resolver::update_to_commit --> package.apply_resolved_reference
//!        |
//!   git stash pop (if stashed)
//! ```

use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{GitError, SyncResult};

use super::bootstrap;
use super::changes::{LocalChangesPolicy, prepare_working_copy, reapply_changes};
use super::command::GitCommand;
use super::reference::{DEFAULT_REMOTE, PackageSource, TargetRef, WorkingCopy};
use super::resolver::update_to_commit;
use super::runner::{CommandRunner, DirectRemote, RemoteCommand, ShellRunner};

#[cfg(test)]
mod tests;

/// Where to send users whose working copy lost its `.git` directory.
pub const TROUBLESHOOTING_URL: &str = "https://getcomposer.org/commit-deps";

/// Knobs shared by bootstrap and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub remote_name: String,
    pub troubleshooting_url: String,
    pub local_changes: LocalChangesPolicy,
    pub github_domains: Vec<String>,
    pub github_protocols: Vec<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            remote_name: DEFAULT_REMOTE.to_string(),
            troubleshooting_url: TROUBLESHOOTING_URL.to_string(),
            local_changes: LocalChangesPolicy::default(),
            github_domains: vec!["github.com".to_string()],
            github_protocols: vec!["https".to_string(), "ssh".to_string(), "git".to_string()],
        }
    }
}

/// Renders the remote refresh pipeline.
#[must_use]
pub fn update_command(url: &str, remote: &str) -> String {
    GitCommand::git()
        .word("remote")
        .word("set-url")
        .arg(remote)
        .arg(url)
        .and_then(GitCommand::git().word("fetch").arg(remote))
        .and_then(
            GitCommand::git()
                .word("fetch")
                .word("--tags")
                .arg(remote),
        )
        .render()
}

/// True when `path` holds a `.git` directory or gitfile.
#[must_use]
pub fn has_metadata_repository(path: &Path) -> bool {
    path.join(".git").exists()
}

fn ensure_metadata_repository(path: &Path, help_url: &str) -> SyncResult<()> {
    if has_metadata_repository(path) {
        return Ok(());
    }
    Err(GitError::MissingRepository {
        path: path.display().to_string(),
        help_url: help_url.to_string(),
    }
    .into())
}

async fn fetch_and_resolve(
    runner: &mut dyn CommandRunner,
    remote: &dyn RemoteCommand,
    wc: &WorkingCopy,
    url: &str,
    target: &TargetRef,
) -> SyncResult<Option<String>> {
    info!(path = %wc.path().display(), "Checking out {}", target.reference());

    let remote_name = wc.remote_name();
    let build = |url: &str| update_command(url, remote_name);
    remote
        .run_with_fallback(runner, &build, url, wc.path(), false)
        .await?;

    update_to_commit(runner, wc, target).await
}

/// Fetches `url` into an existing working copy and checks out `target`.
///
/// Returns the effective reference when it differs from the requested one.
///
/// # Errors
///
/// Returns [`GitError::MissingRepository`] without running anything when the
/// working copy has no `.git`, [`GitError::RemoteFailed`] when the fetch
/// fails and [`GitError::CheckoutFailed`] when no resolution step succeeds.
pub async fn sync(
    runner: &mut dyn CommandRunner,
    remote: &dyn RemoteCommand,
    wc: &WorkingCopy,
    url: &str,
    target: &TargetRef,
    help_url: &str,
) -> SyncResult<Option<String>> {
    ensure_metadata_repository(wc.path(), help_url)?;
    fetch_and_resolve(runner, remote, wc, url, target).await
}

/// Fetch-and-checkout capability for one kind of source repository.
#[async_trait]
pub trait SourceSync: Send {
    /// Creates a working copy for `package` at `path` from `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if cloning or checking out fails.
    async fn bootstrap(
        &mut self,
        package: &mut PackageSource,
        path: &Path,
        url: &str,
    ) -> SyncResult<WorkingCopy>;

    /// Brings `wc` to the package's source reference, fetching from `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the working copy is missing, dirty under the
    /// `fail` policy, or cannot be fetched or checked out.
    async fn sync_to_reference(
        &mut self,
        wc: &mut WorkingCopy,
        package: &mut PackageSource,
        url: &str,
    ) -> SyncResult<Option<String>>;
}

/// [`SourceSync`] that clones without checkout and resolves references
/// through the `composer` remote.
#[derive(Debug)]
pub struct ShallowGitSync<R = ShellRunner, M = DirectRemote> {
    runner: R,
    remote: M,
    settings: SyncSettings,
}

impl<R: CommandRunner> ShallowGitSync<R, DirectRemote> {
    #[must_use]
    pub const fn new(runner: R, settings: SyncSettings) -> Self {
        Self {
            runner,
            remote: DirectRemote,
            settings,
        }
    }
}

impl<R: CommandRunner, M: RemoteCommand> ShallowGitSync<R, M> {
    /// Swaps the remote-command strategy.
    #[must_use]
    pub fn with_remote<N: RemoteCommand>(self, remote: N) -> ShallowGitSync<R, N> {
        ShallowGitSync {
            runner: self.runner,
            remote,
            settings: self.settings,
        }
    }

    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Opens an existing working copy with the configured remote alias.
    #[must_use]
    pub fn working_copy(&self, path: &Path) -> WorkingCopy {
        WorkingCopy::new(path).with_remote_name(&self.settings.remote_name)
    }
}

#[async_trait]
impl<R: CommandRunner, M: RemoteCommand> SourceSync for ShallowGitSync<R, M> {
    async fn bootstrap(
        &mut self,
        package: &mut PackageSource,
        path: &Path,
        url: &str,
    ) -> SyncResult<WorkingCopy> {
        bootstrap::bootstrap(
            &mut self.runner,
            &self.remote,
            package,
            path,
            url,
            &self.settings,
        )
        .await
    }

    async fn sync_to_reference(
        &mut self,
        wc: &mut WorkingCopy,
        package: &mut PackageSource,
        url: &str,
    ) -> SyncResult<Option<String>> {
        ensure_metadata_repository(wc.path(), &self.settings.troubleshooting_url)?;
        prepare_working_copy(&mut self.runner, wc, self.settings.local_changes).await?;

        let target = package.target_ref();
        let effective =
            match fetch_and_resolve(&mut self.runner, &self.remote, wc, url, &target).await {
                Ok(effective) => effective,
                Err(err) => {
                    if wc.has_stashed_changes() {
                        warn!(
                            path = %wc.path().display(),
                            "local changes are still stashed, restore them with `git stash pop`"
                        );
                    }
                    return Err(err);
                }
            };

        if let Some(reference) = &effective {
            package.apply_resolved_reference(reference);
        }
        reapply_changes(&mut self.runner, wc).await?;
        Ok(effective)
    }
}
