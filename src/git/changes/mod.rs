// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local modifications in an existing working copy.
//!
//! ```text
//! local_changes    git status --porcelain --untracked-files=no
//! discard_changes  git clean -df && git reset --hard      -> force allowed
//! stash_changes    git stash --include-untracked          -> force allowed
//! reapply_changes  git stash pop                          (only if stashed)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{GitError, SyncResult};

use super::command::GitCommand;
use super::reference::WorkingCopy;
use super::runner::CommandRunner;


/// What to do with local modifications before an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalChangesPolicy {
    /// Refuse to touch the working copy.
    #[default]
    Fail,
    /// Throw the modifications away.
    Discard,
    /// Stash them and pop the stash after the update.
    Stash,
}

impl LocalChangesPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Discard => "discard",
            Self::Stash => "stash",
        }
    }
}

impl fmt::Display for LocalChangesPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocalChangesPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "discard" => Ok(Self::Discard),
            "stash" => Ok(Self::Stash),
            other => Err(format!(
                "unknown local changes policy '{other}' (expected fail, discard or stash)"
            )),
        }
    }
}

/// Lists modified tracked files, or `None` for a clean working copy.
///
/// # Errors
///
/// Returns [`GitError::CommandFailed`] if `git status` fails.
pub async fn local_changes(
    runner: &mut dyn CommandRunner,
    wc: &WorkingCopy,
) -> SyncResult<Option<String>> {
    let command = GitCommand::git()
        .word("status")
        .word("--porcelain")
        .word("--untracked-files=no")
        .render();
    let result = runner.execute(&command, wc.path()).await?;
    if !result.success() {
        return Err(GitError::CommandFailed {
            command,
            message: runner.last_error_output().trim().to_string(),
        }
        .into());
    }

    let changes = result.stdout.trim_end();
    Ok((!changes.trim().is_empty()).then(|| changes.to_string()))
}

/// Removes untracked files and resets tracked ones.
///
/// # Errors
///
/// Returns [`GitError::CommandFailed`] if the reset fails.
pub async fn discard_changes(runner: &mut dyn CommandRunner, wc: &mut WorkingCopy) -> SyncResult<()> {
    let command = GitCommand::git()
        .word("clean")
        .word("-df")
        .and_then(GitCommand::git().word("reset").word("--hard"))
        .render();
    let result = runner.execute(&command, wc.path()).await?;
    if !result.success() {
        return Err(GitError::CommandFailed {
            command,
            message: format!("Could not reset changes\n\n{}", runner.last_error_output()),
        }
        .into());
    }

    info!(path = %wc.path().display(), "discarded local changes");
    wc.mark_discarded();
    Ok(())
}

/// Stashes local modifications, untracked files included.
///
/// # Errors
///
/// Returns [`GitError::CommandFailed`] if the stash fails.
pub async fn stash_changes(runner: &mut dyn CommandRunner, wc: &mut WorkingCopy) -> SyncResult<()> {
    let command = GitCommand::git()
        .word("stash")
        .word("--include-untracked")
        .render();
    let result = runner.execute(&command, wc.path()).await?;
    if !result.success() {
        return Err(GitError::CommandFailed {
            command,
            message: format!("Could not stash changes\n\n{}", runner.last_error_output()),
        }
        .into());
    }

    info!(path = %wc.path().display(), "stashed local changes");
    wc.mark_stashed();
    Ok(())
}

/// Pops the stash created by [`stash_changes`]. No-op when nothing was stashed.
///
/// # Errors
///
/// Returns [`GitError::StashReapplyFailed`] if the pop conflicts or fails.
pub async fn reapply_changes(runner: &mut dyn CommandRunner, wc: &mut WorkingCopy) -> SyncResult<()> {
    if !wc.has_stashed_changes() {
        return Ok(());
    }

    let command = GitCommand::git().word("stash").word("pop").render();
    let result = runner.execute(&command, wc.path()).await?;
    if !result.success() {
        warn!(path = %wc.path().display(), "stashed changes could not be re-applied");
        return Err(GitError::StashReapplyFailed {
            path: wc.path().display().to_string(),
            output: runner.last_error_output().to_string(),
        }
        .into());
    }

    wc.mark_stash_reapplied();
    Ok(())
}

/// Detects local modifications and deals with them according to `policy`.
///
/// # Errors
///
/// Returns [`GitError::LocalChanges`] under [`LocalChangesPolicy::Fail`] when
/// the working copy is dirty, or the error of the discard/stash command.
pub async fn prepare_working_copy(
    runner: &mut dyn CommandRunner,
    wc: &mut WorkingCopy,
    policy: LocalChangesPolicy,
) -> SyncResult<()> {
    let Some(changes) = local_changes(runner, wc).await? else {
        return Ok(());
    };
    wc.set_local_modifications(true);

    match policy {
        LocalChangesPolicy::Fail => Err(GitError::LocalChanges {
            path: wc.path().display().to_string(),
            changes,
        }
        .into()),
        LocalChangesPolicy::Discard => discard_changes(runner, wc).await,
        LocalChangesPolicy::Stash => stash_changes(runner, wc).await,
    }
}
