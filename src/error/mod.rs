// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            SyncError (~24 bytes)
//!                   |
//!   +--------+------+------+--------+
//!   |        |      |      |        |
//!   v        v      v      v        v
//! Git     Config  Process  Io     Other
//! Box      Box     Box     Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git     MissingRepository, CheckoutFailed, CloneFailed,
//!           RemoteFailed, LocalChanges, StashReapplyFailed, Gix
//!   Config  ParseError, MissingKey, InvalidValue
//!   Process ExecutableNotFound, SpawnFailed, Timeout
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SyncError`].
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl SyncError {
    /// Returns the wrapped [`GitError`], if this is one.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(err) => Some(err),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SyncError {
                fn from(err: $error) -> Self {
                    SyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ConfigError => Config,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to look up a reference.
    #[error("failed to find reference: {0}")]
    Reference(#[from] gix::reference::find::existing::Error),

    /// Repository status could not be computed.
    #[error("failed to compute status: {0}")]
    Status(String),
}

// --- Git Errors ---

/// Git operation errors.
///
/// Every `command` field holds an already redacted command line, see
/// [`crate::git::command::sanitize_url`].
#[derive(Debug, Error)]
pub enum GitError {
    /// The working copy has no `.git` metadata.
    #[error("The .git directory is missing from {path}, see {help_url} for more information")]
    MissingRepository { path: String, help_url: String },

    /// Every step of the reference resolution protocol failed.
    #[error("Failed to execute {command}\n\n{output}")]
    CheckoutFailed {
        command: String,
        output: String,
        /// The error output named the requested reference (history rewritten upstream).
        reference_gone: bool,
    },

    /// The initial clone pipeline failed.
    #[error("failed to clone {url}: {command}\n\n{output}")]
    CloneFailed {
        url: String,
        command: String,
        output: String,
    },

    /// A remote refresh (set-url + fetch) failed.
    #[error("Failed to execute {command}\n\n{output}")]
    RemoteFailed { command: String, output: String },

    /// Local modifications block the update.
    #[error("source directory {path} has uncommitted changes:\n{changes}")]
    LocalChanges { path: String, changes: String },

    /// Stashed changes could not be re-applied after the update.
    #[error("failed to apply stashed changes in {path}:\n{output}")]
    StashReapplyFailed { path: String, output: String },

    /// Generic git command failure.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

impl GitError {
    /// Returns true when the failure indicates the requested reference vanished upstream.
    #[must_use]
    pub const fn is_reference_gone(&self) -> bool {
        matches!(
            self,
            Self::CheckoutFailed {
                reference_gone: true,
                ..
            }
        )
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}
