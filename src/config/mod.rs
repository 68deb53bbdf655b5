// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitshallow.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. local gitshallow.toml (cwd)
//! 3. --ini FILE (repeatable)
//! 4. GITSHALLOW_* env vars
//! 5. --set section/key=value and CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITSHALLOW_GLOBAL__OUTPUT_LOG_LEVEL=4    → global.output_log_level = 4
//! GITSHALLOW_GIT__REMOTE_NAME=upstream     → git.remote_name = "upstream"
//! GITSHALLOW_GIT__LOCAL_CHANGES=stash      → git.local_changes = "stash"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::git::sync::SyncSettings;

use loader::ConfigLoader;
use types::{GitConfig, GlobalConfig};

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "GITSHALLOW";

/// Config file picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "gitshallow.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Git sync options.
    pub git: GitConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitshallow::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitshallow.toml")
    ///     .with_env_prefix("GITSHALLOW")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::InvalidValue`] for an unusable remote name or an
    /// empty troubleshooting URL.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let remote = &self.git.remote_name;
        if remote.is_empty()
            || remote.starts_with('-')
            || remote
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | ':' | '~' | '^' | '\\'))
        {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "remote_name".to_string(),
                message: format!("'{remote}' is not a valid remote name"),
            });
        }
        if self.git.troubleshooting_url.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "git".to_string(),
                key: "troubleshooting_url".to_string(),
            });
        }
        Ok(())
    }

    /// Settings handed to the sync driver.
    #[must_use]
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            remote_name: self.git.remote_name.clone(),
            troubleshooting_url: self.git.troubleshooting_url.clone(),
            local_changes: self.git.local_changes,
            github_domains: self.git.github_domains.clone(),
            github_protocols: self.git.github_protocols.clone(),
        }
    }

    /// Per-command timeout, `None` when commands may run forever.
    #[must_use]
    pub const fn command_timeout(&self) -> Option<Duration> {
        match self.git.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_git_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
        );
    }

    fn format_git_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("git.remote_name".into(), self.git.remote_name.clone());
        options.insert(
            "git.troubleshooting_url".into(),
            self.git.troubleshooting_url.clone(),
        );
        options.insert(
            "git.local_changes".into(),
            self.git.local_changes.to_string(),
        );
        options.insert(
            "git.command_timeout_secs".into(),
            self.git.command_timeout_secs.to_string(),
        );
        options.insert(
            "git.github_domains".into(),
            self.git.github_domains.join(","),
        );
        options.insert(
            "git.github_protocols".into(),
            self.git.github_protocols.join(","),
        );
    }
}
