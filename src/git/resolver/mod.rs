// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reference resolution: bring a fetched working copy to a reference.
//!
//! ```text
//! git branch -r  -->  RemoteBranchSet (empty if listing fails)
//!        |
//!        v
//! 1. symbolic ref, <remote>/<ref> listed
//!      checkout [-f] -B <branch> <remote>/<ref> -- && reset --hard <remote>/<ref> --
//! 2. 40-hex ref
//!      branch := v<branch> if only <remote>/v<branch> is listed
//!      checkout <branch> --  ||  checkout [-f] -B <branch> <remote>/<branch> --
//!      then reset --hard <ref> --
//! 3. checkout [-f] <ref> -- && reset --hard <ref> --
//! 4. warn if stderr names <ref>, fail with CheckoutFailed
//! ```
//!
//! The `--` terminator keeps git from treating a missing branch name as a path.

use tracing::{debug, warn};

use crate::error::{GitError, SyncResult};

use super::command::{GitCommand, sanitize_url};
use super::reference::{RemoteBranchSet, ResolutionOutcome, TargetRef, WorkingCopy};
use super::runner::CommandRunner;


/// Checks out `target` in `wc`.
///
/// Returns the reference that was actually checked out when it differs from
/// the requested one. The current protocol always lands on the requested
/// reference, so success yields `None`.
///
/// # Errors
///
/// Returns [`GitError::CheckoutFailed`] when every step fails, and propagates
/// runner errors (spawn failures, timeouts) as-is.
pub async fn update_to_commit(
    runner: &mut dyn CommandRunner,
    wc: &WorkingCopy,
    target: &TargetRef,
) -> SyncResult<Option<String>> {
    match resolve(runner, wc, target).await? {
        ResolutionOutcome::Resolved(reference) => Ok(reference),
        ResolutionOutcome::Failed {
            command,
            error_output,
            reference_gone,
        } => Err(GitError::CheckoutFailed {
            command,
            output: error_output,
            reference_gone,
        }
        .into()),
    }
}

/// Runs the resolution steps and reports the outcome without turning failure
/// into an error.
///
/// # Errors
///
/// Only runner errors are returned; git failures end up in
/// [`ResolutionOutcome::Failed`].
pub async fn resolve(
    runner: &mut dyn CommandRunner,
    wc: &WorkingCopy,
    target: &TargetRef,
) -> SyncResult<ResolutionOutcome> {
    let cwd = wc.path();
    let remote = wc.remote_name();
    let force = wc.force_allowed();
    let reference = target.reference();
    let mut branch = target.branch();

    let listing = runner
        .execute(&GitCommand::git().word("branch").word("-r").render(), cwd)
        .await?;
    let branches = if listing.success() {
        RemoteBranchSet::parse(&listing.stdout)
    } else {
        RemoteBranchSet::default()
    };

    if !target.is_commit() && branches.contains(remote, reference) {
        let tracked = format!("{remote}/{reference}");
        let command = GitCommand::git()
            .word("checkout")
            .word_if(force, "-f")
            .word("-B")
            .arg(&branch)
            .arg(&tracked)
            .word("--")
            .and_then(
                GitCommand::git()
                    .word("reset")
                    .word("--hard")
                    .arg(&tracked)
                    .word("--"),
            );
        debug!(reference, branch = %branch, "tracking remote branch");
        if runner.execute(&command.render(), cwd).await?.success() {
            return Ok(ResolutionOutcome::Resolved(None));
        }
    }

    if target.is_commit() {
        let prefixed = format!("v{branch}");
        if !branches.contains(remote, &branch) && branches.contains(remote, &prefixed) {
            branch = prefixed;
        }

        let checkout = GitCommand::git().word("checkout").arg(&branch).word("--");
        let recreate = GitCommand::git()
            .word("checkout")
            .word_if(force, "-f")
            .word("-B")
            .arg(&branch)
            .arg(&format!("{remote}/{branch}"))
            .word("--");
        debug!(reference, branch = %branch, "checking out branch at commit");

        let on_branch = runner.execute(&checkout.render(), cwd).await?.success()
            || runner.execute(&recreate.render(), cwd).await?.success();
        if on_branch {
            let reset = GitCommand::git()
                .word("reset")
                .word("--hard")
                .arg(reference)
                .word("--");
            if runner.execute(&reset.render(), cwd).await?.success() {
                return Ok(ResolutionOutcome::Resolved(None));
            }
        }
    }

    let command = GitCommand::git()
        .word("checkout")
        .word_if(force, "-f")
        .arg(reference)
        .word("--")
        .and_then(
            GitCommand::git()
                .word("reset")
                .word("--hard")
                .arg(reference)
                .word("--"),
        )
        .render();
    debug!(reference, "checking out reference directly");
    if runner.execute(&command, cwd).await?.success() {
        return Ok(ResolutionOutcome::Resolved(None));
    }

    let stderr = runner.last_error_output();
    let reference_gone = stderr.contains(reference);
    let error_output = sanitize_url(stderr);
    if reference_gone {
        warn!(reference, "{reference} is gone (history was rewritten?)");
    }

    Ok(ResolutionOutcome::Failed {
        command: sanitize_url(&command),
        error_output,
        reference_gone,
    })
}
