// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference and working-copy value types.
//!
//! ```text
//! TargetRef        reference + pretty branch label + release date
//!   .branch()      "dev-main" -> "main", "1.x-dev" -> "1"
//!   .is_commit()   ^[a-f0-9]{40}$
//! RemoteBranchSet  parsed `git branch -r`, exact-name lookups
//! WorkingCopy      path + remote alias + session force flags
//! ResolutionOutcome Resolved(Option<ref>) | Failed{command, output}
//! ```

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;


/// Remote alias every working copy fetches through.
pub const DEFAULT_REMOTE: &str = "composer";

static COMMIT_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-f0-9]{40}$").expect("valid regex"));

static BRANCH_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^dev-|(?:\.x)?-dev$)").expect("valid regex"));

/// Returns true for a full 40 character lowercase hex commit id.
#[must_use]
pub fn is_commit_hash(reference: &str) -> bool {
    COMMIT_HASH.is_match(reference)
}

/// Strips the `dev-` prefix or `-dev` / `.x-dev` suffix from a version label.
#[must_use]
pub fn strip_branch_label(label: &str) -> String {
    BRANCH_DECORATION.replace_all(label, "").into_owned()
}

/// The state a working copy should be brought to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRef {
    reference: String,
    pretty_branch: String,
    release_timestamp: Option<DateTime<Utc>>,
}

impl TargetRef {
    #[must_use]
    pub fn new(reference: impl Into<String>, pretty_branch: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            pretty_branch: pretty_branch.into(),
            release_timestamp: None,
        }
    }

    #[must_use]
    pub const fn with_release_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.release_timestamp = timestamp;
        self
    }

    /// The requested commit hash, branch or tag.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    #[must_use]
    pub const fn release_timestamp(&self) -> Option<DateTime<Utc>> {
        self.release_timestamp
    }

    /// Local branch name derived from the label.
    #[must_use]
    pub fn branch(&self) -> String {
        strip_branch_label(&self.pretty_branch)
    }

    #[must_use]
    pub fn is_commit(&self) -> bool {
        is_commit_hash(&self.reference)
    }
}

/// Remote-tracking branches as listed by `git branch -r`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteBranchSet {
    names: BTreeSet<String>,
}

impl RemoteBranchSet {
    /// Parses `git branch -r` output.
    ///
    /// Each line is one name. Symbolic lines (`composer/HEAD -> composer/main`)
    /// are skipped, so `HEAD` never counts as a tracked branch.
    #[must_use]
    pub fn parse(listing: &str) -> Self {
        let names = listing
            .lines()
            .filter(|line| !line.contains(" -> "))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        Self { names }
    }

    /// Exact lookup of `<remote>/<branch>`.
    #[must_use]
    pub fn contains(&self, remote: &str, branch: &str) -> bool {
        self.names.contains(&format!("{remote}/{branch}"))
    }
}

/// A working copy plus the per-session flags that govern forced checkouts.
///
/// The force flags only ever go from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingCopy {
    path: PathBuf,
    remote_name: String,
    has_local_modifications: bool,
    discarded_changes: bool,
    stashed_changes: bool,
}

impl WorkingCopy {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            remote_name: DEFAULT_REMOTE.to_string(),
            has_local_modifications: false,
            discarded_changes: false,
            stashed_changes: false,
        }
    }

    #[must_use]
    pub fn with_remote_name(mut self, remote: impl Into<String>) -> Self {
        self.remote_name = remote.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    #[must_use]
    pub const fn has_local_modifications(&self) -> bool {
        self.has_local_modifications
    }

    pub const fn set_local_modifications(&mut self, modified: bool) {
        self.has_local_modifications = modified;
    }

    /// Whether checkouts may overwrite local files.
    #[must_use]
    pub const fn force_allowed(&self) -> bool {
        self.discarded_changes || self.stashed_changes
    }

    #[must_use]
    pub const fn has_stashed_changes(&self) -> bool {
        self.stashed_changes
    }

    pub const fn mark_discarded(&mut self) {
        self.discarded_changes = true;
        self.has_local_modifications = false;
    }

    pub const fn mark_stashed(&mut self) {
        self.stashed_changes = true;
        self.has_local_modifications = false;
    }

    /// Clears the pending stash once it has been re-applied.
    ///
    /// Force stays allowed for the rest of the session.
    pub const fn mark_stash_reapplied(&mut self) {
        self.stashed_changes = false;
        self.discarded_changes = true;
    }
}

/// Result of running the reference resolution protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Checked out; `Some` carries a reference that replaces the requested one.
    Resolved(Option<String>),
    /// Every step failed.
    Failed {
        command: String,
        error_output: String,
        reference_gone: bool,
    },
}

/// Minimal package metadata the sync driver reads and rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSource {
    pub name: String,
    pub source_url: String,
    pub source_reference: String,
    pub dist_reference: Option<String>,
    pub pretty_version: String,
    pub release_date: Option<DateTime<Utc>>,
}

impl PackageSource {
    #[must_use]
    pub fn target_ref(&self) -> TargetRef {
        TargetRef::new(&self.source_reference, &self.pretty_version)
            .with_release_timestamp(self.release_date)
    }

    /// Pins the package to `reference`, carrying the dist reference along when
    /// it mirrored the source reference.
    pub fn apply_resolved_reference(&mut self, reference: &str) {
        if self.dist_reference.as_deref() == Some(self.source_reference.as_str()) {
            self.dist_reference = Some(reference.to_string());
        }
        self.source_reference = reference.to_string();
    }
}
