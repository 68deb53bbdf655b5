// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shell command building for git pipelines.
//!
//! ```text
//! GitCommand::git()
//!   .word("checkout")        literal token, never escaped
//!   .arg(branch)             dynamic value, always escaped
//!   .and_then(GitCommand::git().word("reset")...)
//!   .render()  -->  "git checkout main -- && git reset --hard main --"
//!
//! escape()        one quoting rule for URL, ref, branch, path
//! sanitize_url()  ://user:pass@ --> ://user:***@
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;


/// Quotes a dynamic value for the host shell.
///
/// Unix gets POSIX single quoting, Windows gets `cmd` double quoting. Values made
/// only of safe characters are returned unchanged.
#[must_use]
pub fn escape(value: &str) -> Cow<'_, str> {
    shell_escape::escape(Cow::Borrowed(value))
}

/// One stage of a shell pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitCommand {
    words: Vec<String>,
    next: Option<Box<GitCommand>>,
}

impl GitCommand {
    /// Starts a `git ...` stage.
    #[must_use]
    pub fn git() -> Self {
        Self::default().word("git")
    }

    /// Starts a `cd <dir>` stage. Windows needs `/D` to switch drives.
    #[must_use]
    pub fn cd(dir: &Path) -> Self {
        let cmd = Self::default().word("cd");
        let cmd = if cfg!(windows) { cmd.word("/D") } else { cmd };
        cmd.path(dir)
    }

    /// Appends a literal token.
    #[must_use]
    pub fn word(mut self, word: &str) -> Self {
        self.words.push(word.to_string());
        self
    }

    /// Appends a literal token only when `enabled`.
    #[must_use]
    pub fn word_if(self, enabled: bool, word: &str) -> Self {
        if enabled { self.word(word) } else { self }
    }

    /// Appends a dynamic value, escaped.
    #[must_use]
    pub fn arg(mut self, value: &str) -> Self {
        self.words.push(escape(value).into_owned());
        self
    }

    /// Appends a path, escaped.
    #[must_use]
    pub fn path(self, path: &Path) -> Self {
        let display = path.to_string_lossy();
        self.arg(&display)
    }

    /// Chains `next` so it only runs when everything before it succeeded.
    #[must_use]
    pub fn and_then(mut self, next: Self) -> Self {
        match self.next {
            Some(tail) => self.next = Some(Box::new(tail.and_then(next))),
            None => self.next = Some(Box::new(next)),
        }
        self
    }

    /// Renders the pipeline as one shell string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut rendered = self.words.join(" ");
        if let Some(next) = &self.next {
            rendered.push_str(" && ");
            rendered.push_str(&next.render());
        }
        rendered
    }
}

impl std::fmt::Display for GitCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Normalizes a working-copy path to the host separator convention.
///
/// Drops `.` components and trailing separators; `..` is kept since resolving
/// it would require touching the filesystem.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        return PathBuf::from(".");
    }
    if cfg!(windows) {
        PathBuf::from(normalized.to_string_lossy().replace('/', "\\"))
    } else {
        normalized
    }
}

static PASSWORD_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"://([^@/\s:]+):([^@\s]+)@").expect("valid regex"));

static TOKEN_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"://([A-Za-z0-9_]{20,})@").expect("valid regex"));

/// Redacts credentials embedded in URLs anywhere in `text`.
///
/// `://user:secret@host` becomes `://user:***@host`; a bare access token used
/// as the user part (`://ghp_xxx...@host`) becomes `://***@host`.
#[must_use]
pub fn sanitize_url(text: &str) -> String {
    let text = PASSWORD_IN_URL.replace_all(text, "://$1:***@");
    TOKEN_IN_URL.replace_all(&text, "://***@").into_owned()
}
