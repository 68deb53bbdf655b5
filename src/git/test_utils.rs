// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities for the git layer.
//!
//! `ScriptedRunner` records every command and answers from a script; commands
//! without a scripted answer succeed with empty output.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::SyncResult;

use super::runner::{CommandResult, CommandRunner};

#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    script: HashMap<String, CommandResult>,
    pub(crate) commands: Vec<String>,
    pub(crate) cwds: Vec<PathBuf>,
    last_error: String,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers `command` with a successful exit and `stdout`.
    pub(crate) fn succeed_with(mut self, command: &str, stdout: &str) -> Self {
        self.script.insert(
            command.to_string(),
            CommandResult {
                exit_code: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    /// Answers `command` with exit code 1 and `stderr`.
    pub(crate) fn fail(mut self, command: &str, stderr: &str) -> Self {
        self.script.insert(
            command.to_string(),
            CommandResult {
                exit_code: 1,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Scripts the `git branch -r` listing.
    pub(crate) fn branches(self, names: &[&str]) -> Self {
        let listing: String = names.iter().map(|name| format!("  {name}\n")).collect();
        self.succeed_with("git branch -r", &listing)
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn execute(&mut self, command: &str, cwd: &Path) -> SyncResult<CommandResult> {
        self.commands.push(command.to_string());
        self.cwds.push(cwd.to_path_buf());
        let result = self.script.get(command).cloned().unwrap_or_default();
        self.last_error.clone_from(&result.stderr);
        Ok(result)
    }

    fn last_error_output(&self) -> &str {
        &self.last_error
    }
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Awaits `fut` while capturing the warnings and errors it logs.
pub(crate) async fn run_with_warnings<Fut>(fut: Fut) -> (Fut::Output, String)
where
    Fut: std::future::Future,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .with_target(false)
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    let value = fut.await;

    let logs = buffer
        .lock()
        .map(|guard| String::from_utf8_lossy(&guard).to_string())
        .unwrap_or_default();
    (value, logs)
}
