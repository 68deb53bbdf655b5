// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone and update command implementations for gitshallow.
//!
//! ```text
//! SyncArgs --> PackageSource
//!     |
//!     v
//! ShallowGitSync<ShellRunner>  (settings + timeout from Config)
//!     clone  --> bootstrap()
//!     update --> working_copy() --> sync_to_reference()
//!     |
//!     v
//! SyncReport --> stdout (text or --json)
//! ```

use serde::Serialize;
use std::path::PathBuf;
use tracing::{Instrument, debug};

use crate::cli::sync::SyncArgs;
use crate::config::Config;
use crate::core::process::builder::find_executable;
use crate::error::{ProcessError, Result};
use crate::git::reference::PackageSource;
use crate::git::runner::ShellRunner;
use crate::git::sync::{ShallowGitSync, SourceSync};
use crate::logging::{SyncOperation, package_span};

/// Outcome of a clone or update, as printed with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub path: PathBuf,
    /// Reference the working copy ended up on when it differs from the
    /// requested one.
    pub resolved_reference: Option<String>,
    pub package: PackageSource,
}

impl SyncReport {
    /// One-line summary for text output.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) at {} in {}",
            self.package.name,
            self.package.pretty_version,
            self.package.source_reference,
            self.path.display()
        )
    }
}

/// Fails early when no `git` executable is on `PATH`.
///
/// # Errors
///
/// Returns [`ProcessError::ExecutableNotFound`] when git cannot be found.
pub fn ensure_git() -> std::result::Result<(), ProcessError> {
    let path = find_executable("git").ok_or_else(|| ProcessError::ExecutableNotFound {
        name: "git".to_string(),
    })?;
    debug!(git = %path.display(), "using git");
    Ok(())
}

fn driver(config: &Config) -> ShallowGitSync {
    let runner = ShellRunner::new().with_timeout(config.command_timeout());
    ShallowGitSync::new(runner, config.sync_settings())
}

/// Clones a package source into a new working copy.
///
/// # Errors
///
/// Returns an error if git is missing, the clone fails or the reference
/// cannot be checked out.
pub async fn run_clone_command(args: &SyncArgs, config: &Config) -> Result<()> {
    ensure_git()?;
    let mut package = args.to_package();
    let mut sync = driver(config);

    let span = package_span(&package.name, SyncOperation::Clone);
    let wc = sync
        .bootstrap(&mut package, &args.path, &args.url)
        .instrument(span)
        .await?;

    let resolved_reference = (package.source_reference != args.reference)
        .then(|| package.source_reference.clone());
    print_report(
        &SyncReport {
            path: wc.path().to_path_buf(),
            resolved_reference,
            package,
        },
        args.json,
    )
}

/// Brings an existing working copy to the requested reference.
///
/// # Errors
///
/// Returns an error if git is missing, the working copy has no `.git`, has
/// local changes under the `fail` policy, or cannot be fetched or checked out.
pub async fn run_update_command(args: &SyncArgs, config: &Config) -> Result<()> {
    ensure_git()?;
    let mut package = args.to_package();
    let mut sync = driver(config);
    let mut wc = sync.working_copy(&args.path);

    let span = package_span(&package.name, SyncOperation::Update);
    let resolved_reference = sync
        .sync_to_reference(&mut wc, &mut package, &args.url)
        .instrument(span)
        .await?;

    print_report(
        &SyncReport {
            path: wc.path().to_path_buf(),
            resolved_reference,
            package,
        },
        args.json,
    )
}

fn print_report(report: &SyncReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}
