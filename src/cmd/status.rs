// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status command implementation for gitshallow.

use tracing::Instrument;

use crate::cli::sync::StatusArgs;
use crate::error::Result;
use crate::git::query::{self, WorkingCopyStatus};
use crate::logging::{SyncOperation, package_span};

/// Prints branch, HEAD and local state of a working copy.
///
/// # Errors
///
/// Returns an error if the repository exists but cannot be read.
pub async fn run_status_command(args: &StatusArgs) -> Result<()> {
    let span = package_span(&args.path.display().to_string(), SyncOperation::Status);
    let status = async { query::status(&args.path) }.instrument(span).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        for line in format_status(&status) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Human-readable lines for `status`.
#[must_use]
pub fn format_status(status: &WorkingCopyStatus) -> Vec<String> {
    if !status.is_repository {
        return vec![format!("{}: not a git working copy", status.path.display())];
    }

    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    vec![
        format!("path          {}", status.path.display()),
        format!(
            "branch        {}",
            status.branch.as_deref().unwrap_or("(detached)")
        ),
        format!("head          {}", status.head.as_deref().unwrap_or("(none)")),
        format!("local changes {}", yes_no(status.has_local_changes)),
        format!("stash         {}", yes_no(status.has_stash)),
    ]
}
