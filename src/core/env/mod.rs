// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment handed to spawned git processes.
//!
//! ```text
//! current_env() --> Env (BTreeMap, deterministic order)
//!                    |
//!                    v
//!             git_env(&Env)
//!   GIT_ASKPASS=echo         never prompt for credentials
//!   GIT_TERMINAL_PROMPT=0    same, for newer git
//!   GCM_INTERACTIVE=never    credential manager
//!   LANGUAGE=C               predictable error text
//!   -GIT_DIR -GIT_WORK_TREE  leaked from git hooks
//!   -DYLD_LIBRARY_PATH       macOS
//! ```
//!
//! The cleaned copy is passed to `ProcessBuilder::env`, the parent process
//! environment is never mutated.

use std::collections::BTreeMap;


/// A set of environment variables.
///
/// Keys compare case-insensitively on Windows, matching how the OS treats them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    vars: BTreeMap<String, String>,
}

impl Env {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Creates an environment from a map of variables.
    #[must_use]
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        let mut env = Self::new();
        for (key, value) in vars {
            env.set(key, value);
        }
        env
    }

    /// Sets an environment variable, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        self.remove(&key);
        self.vars.insert(key, value.into());
        self
    }

    /// Gets an environment variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find_key(key)
            .and_then(|k| self.vars.get(k))
            .map(String::as_str)
    }

    /// Removes an environment variable.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        if let Some(existing) = self.find_key(key).map(str::to_owned) {
            self.vars.remove(&existing);
        }
        self
    }

    /// Returns an iterator over environment variables.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true if no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    fn find_key(&self, key: &str) -> Option<&str> {
        if cfg!(windows) {
            self.vars
                .keys()
                .find(|k| k.eq_ignore_ascii_case(key))
                .map(String::as_str)
        } else {
            self.vars.get_key_value(key).map(|(k, _)| k.as_str())
        }
    }
}

/// Captures the current process environment.
#[must_use]
pub fn current_env() -> Env {
    Env::from_map(std::env::vars().collect())
}

/// Returns a copy of `base` prepared for non-interactive git invocations.
#[must_use]
pub fn git_env(base: &Env) -> Env {
    let mut env = base.clone();
    env.set("GIT_ASKPASS", "echo")
        .set("GIT_TERMINAL_PROMPT", "0")
        .set("GCM_INTERACTIVE", "never")
        .set("LANGUAGE", "C")
        .remove("GIT_DIR")
        .remove("GIT_WORK_TREE")
        .remove("DYLD_LIBRARY_PATH");
    env
}
