// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only working-copy queries using gix.
//!
//! ```text
//! query.rs --> gix::open --> .git/ (no subprocess)
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{GitError, GixError, SyncResult};

fn open(path: &Path) -> SyncResult<gix::Repository> {
    gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))).into())
}

/// Current branch name, `None` when HEAD is detached.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or HEAD cannot be read.
pub fn current_branch(path: &Path) -> SyncResult<Option<String>> {
    let repo = open(path)?;
    let head = repo
        .head_name()
        .map_err(|e| GitError::Gix(GixError::Reference(e)))?;
    Ok(head.map(|name| name.shorten().to_string()))
}

/// Commit id HEAD points at, `None` for an unborn branch.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened.
pub fn head_commit(path: &Path) -> SyncResult<Option<String>> {
    let repo = open(path)?;
    Ok(repo.head_id().ok().map(|id| id.to_string()))
}

/// Whether tracked files differ from HEAD, staged or not.
///
/// Untracked files are ignored, matching what a checkout may overwrite.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or status fails.
pub fn has_uncommitted_changes(path: &Path) -> SyncResult<bool> {
    use gix::status::UntrackedFiles;

    let repo = open(path)?;
    let has_changes = repo
        .status(gix::progress::Discard)
        .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
        .untracked_files(UntrackedFiles::None)
        .into_iter(None)
        .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
        .next()
        .is_some();

    Ok(has_changes)
}

/// Whether `refs/stash` exists.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or the lookup fails.
pub fn has_stashed_changes(path: &Path) -> SyncResult<bool> {
    let repo = open(path)?;

    match repo.find_reference("refs/stash") {
        Ok(_) => Ok(true),
        Err(gix::reference::find::existing::Error::NotFound { .. }) => Ok(false),
        Err(e) => Err(GitError::Gix(GixError::Reference(e)).into()),
    }
}

/// Snapshot of a working copy, as printed by `gitshallow status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingCopyStatus {
    pub path: PathBuf,
    pub is_repository: bool,
    pub branch: Option<String>,
    pub head: Option<String>,
    pub has_local_changes: bool,
    pub has_stash: bool,
}

/// Collects a [`WorkingCopyStatus`] for `path`.
///
/// A path without `.git` is reported rather than treated as an error.
///
/// # Errors
///
/// Returns a `GitError` if the repository exists but cannot be read.
pub fn status(path: &Path) -> SyncResult<WorkingCopyStatus> {
    if !super::sync::has_metadata_repository(path) {
        return Ok(WorkingCopyStatus {
            path: path.to_path_buf(),
            is_repository: false,
            branch: None,
            head: None,
            has_local_changes: false,
            has_stash: false,
        });
    }

    Ok(WorkingCopyStatus {
        path: path.to_path_buf(),
        is_repository: true,
        branch: current_branch(path)?,
        head: head_commit(path)?,
        has_local_changes: has_uncommitted_changes(path)?,
        has_stash: has_stashed_changes(path)?,
    })
}
