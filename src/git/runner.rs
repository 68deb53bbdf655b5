// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command execution seams.
//!
//! ```text
//! CommandRunner (trait)          RemoteCommand (trait)
//!   execute(cmd, cwd)              run_with_fallback(build, url, cwd, fresh)
//!   last_error_output()                 |
//!        |                              v
//!        v                         DirectRemote
//!   ShellRunner                    build(url) once, CloneFailed/RemoteFailed
//!   ProcessBuilder::raw + git_env
//! ```

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::core::env::{Env, current_env, git_env};
use crate::core::process::builder::{ProcessBuilder, ProcessOutput};
use crate::error::{GitError, ProcessError, SyncError, SyncResult};

use super::command::sanitize_url;

/// Exit status and captured output of one shell command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<ProcessOutput> for CommandResult {
    fn from(output: ProcessOutput) -> Self {
        let (exit_code, stdout, stderr) = output.into_parts();
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }
}

/// Runs shell command strings one at a time.
#[async_trait]
pub trait CommandRunner: Send {
    /// Runs `command` through the host shell in `cwd`.
    ///
    /// A non-zero exit is reported through [`CommandResult::exit_code`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error when the shell cannot be spawned or the command times out.
    async fn execute(&mut self, command: &str, cwd: &Path) -> SyncResult<CommandResult>;

    /// Standard error of the most recent command.
    fn last_error_output(&self) -> &str;
}

/// [`CommandRunner`] backed by [`ProcessBuilder`].
#[derive(Debug, Clone)]
pub struct ShellRunner {
    env: Env,
    timeout: Option<Duration>,
    last_error: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellRunner {
    /// Creates a runner whose children see a cleaned copy of the current environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(&current_env())
    }

    #[must_use]
    pub fn with_env(base: &Env) -> Self {
        Self {
            env: git_env(base),
            timeout: None,
            last_error: String::new(),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Maps a process-layer failure onto the library error type.
fn process_failure(err: anyhow::Error) -> SyncError {
    match err.downcast::<ProcessError>() {
        Ok(process) => process.into(),
        Err(other) => SyncError::Other(format!("{other:#}").into()),
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn execute(&mut self, command: &str, cwd: &Path) -> SyncResult<CommandResult> {
        let shown = sanitize_url(command);
        debug!(cwd = %cwd.display(), cmd = %shown, "git");

        let output = ProcessBuilder::raw(command)
            .name("git")
            .cwd(cwd)
            .env(self.env.clone())
            .timeout(self.timeout)
            .run()
            .await
            .map_err(process_failure)?;

        if output.timed_out() {
            return Err(ProcessError::Timeout {
                command: shown,
                timeout_secs: self.timeout.map_or(0, |t| t.as_secs()),
            }
            .into());
        }

        let result = CommandResult::from(output);
        self.last_error.clone_from(&result.stderr);
        Ok(result)
    }

    fn last_error_output(&self) -> &str {
        &self.last_error
    }
}

/// Runs a command that talks to a remote, given a builder that renders it for a URL.
///
/// Implementations may try several transports for the same repository; the
/// builder is called once per attempted URL.
#[async_trait]
pub trait RemoteCommand: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GitError::CloneFailed`] for a failed fresh clone and
    /// [`GitError::RemoteFailed`] otherwise.
    async fn run_with_fallback(
        &self,
        runner: &mut dyn CommandRunner,
        build: &(dyn for<'u> Fn(&'u str) -> String + Sync),
        url: &str,
        cwd: &Path,
        fresh_clone: bool,
    ) -> SyncResult<()>;
}

/// Single attempt against the given URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRemote;

#[async_trait]
impl RemoteCommand for DirectRemote {
    async fn run_with_fallback(
        &self,
        runner: &mut dyn CommandRunner,
        build: &(dyn for<'u> Fn(&'u str) -> String + Sync),
        url: &str,
        cwd: &Path,
        fresh_clone: bool,
    ) -> SyncResult<()> {
        let command = build(url);
        let result = runner.execute(&command, cwd).await?;
        if result.success() {
            return Ok(());
        }

        let command = sanitize_url(&command);
        let output = sanitize_url(runner.last_error_output());
        let err = if fresh_clone {
            GitError::CloneFailed {
                url: sanitize_url(url),
                command,
                output,
            }
        } else {
            GitError::RemoteFailed { command, output }
        };
        Err(err.into())
    }
}
