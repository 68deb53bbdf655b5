// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for gitshallow.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, GitConfig
//! GitConfig.local_changes: fail (default) | discard | stash
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::git::changes::LocalChangesPolicy;
use crate::git::reference::DEFAULT_REMOTE;
use crate::git::sync::TROUBLESHOOTING_URL;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Git sync options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Alias of the remote every fetch goes through.
    pub remote_name: String,
    /// Page linked from the missing `.git` error.
    pub troubleshooting_url: String,
    /// What to do with local modifications before an update.
    pub local_changes: LocalChangesPolicy,
    /// Kill a git command after this many seconds; 0 waits forever.
    pub command_timeout_secs: u64,
    /// Hosts treated as GitHub when setting push URLs.
    pub github_domains: Vec<String>,
    /// Protocols allowed for GitHub push URLs (`ssh` selects the SSH form).
    pub github_protocols: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote_name: DEFAULT_REMOTE.to_string(),
            troubleshooting_url: TROUBLESHOOTING_URL.to_string(),
            local_changes: LocalChangesPolicy::Fail,
            command_timeout_secs: 0,
            github_domains: vec!["github.com".to_string()],
            github_protocols: vec!["https".to_string(), "ssh".to_string(), "git".to_string()],
        }
    }
}
