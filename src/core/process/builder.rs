// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shell pipeline configuration.
//!
//! ```text
//! ProcessBuilder
//!  • raw(command)   /bin/sh -c | cmd /C
//!  • cwd/env/name/timeout
//!
//! ProcessOutput { exit_code, stdout, stderr, timed_out }
//! find_executable(name) --> PATH lookup
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::env::Env;

/// Output from a completed process.
///
/// A non-zero exit code is data here; callers decide what failure means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
    timed_out: bool,
}

impl ProcessOutput {
    pub(super) const fn new(exit_code: i32, stdout: String, stderr: String, timed_out: bool) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            timed_out,
        }
    }

    /// Returns the process exit code (0 = success, -1 = killed or no code).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns whether the pipeline was killed after exceeding its timeout.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Splits the output into its captured parts.
    #[must_use]
    pub fn into_parts(self) -> (i32, String, String) {
        (self.exit_code, self.stdout, self.stderr)
    }
}

/// Builder for one shell command line, such as a `&&` chain of git commands.
#[derive(Debug)]
pub struct ProcessBuilder {
    /// Full command line handed to the shell
    command: String,
    /// Working directory
    cwd: Option<PathBuf>,
    /// Environment variables (replaces the inherited environment when set)
    env: Option<Env>,
    /// Display name for logging
    name: Option<String>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Creates a `ProcessBuilder` from a raw shell command string.
    ///
    /// On Windows, this executes the command via `cmd /C`, so `cd /D` and `&&`
    /// behave as git pipelines expect. On Unix, this executes via `/bin/sh -c`.
    pub fn raw(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cwd: None,
            env: None,
            name: None,
            timeout: None,
        }
    }

    /// Sets the working directory for the process.
    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the environment variables for the process.
    #[must_use]
    pub fn env(mut self, env: Env) -> Self {
        self.env = Some(env);
        self
    }

    /// Sets a display name for logging.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Kills the whole pipeline once `duration` has elapsed.
    #[must_use]
    pub const fn timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout = duration;
        self
    }

    pub(super) fn command_line(&self) -> &str {
        &self.command
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) const fn environment(&self) -> Option<&Env> {
        self.env.as_ref()
    }

    pub(super) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("sh")
    }

    pub(super) const fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Full path of `program` on `PATH`, if any.
#[must_use]
pub fn find_executable(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
