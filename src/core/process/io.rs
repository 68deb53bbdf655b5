// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks (trace + keep)
//!   mpsc channels buffer lines
//!   wait (or timeout -> kill process tree)
//!   --> ProcessOutput { stdout, stderr, exit_code, timed_out }
//! ```

use crate::error::Result;
use anyhow::Context;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput};

/// How long readers may drain after a timeout kill before they are aborted.
const READER_GRACE: Duration = Duration::from_millis(500);

fn spawn_reader<R>(
    stream: Option<R>,
    process_name: &str,
    stream_name: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> Option<JoinHandle<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream.map(|stream| {
        let name = process_name.to_string();
        tokio::spawn(async move {
            read_stream(stream, &name, stream_name, tx).await;
        })
    })
}

/// Collects output from a channel into a string.
fn collect_output(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    let mut output = String::new();
    while let Ok(line) = rx.try_recv() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&line);
    }
    output
}

/// Waits for reader tasks; after a kill, a reader still holding a pipe
/// (a grandchild outside the killed tree) is aborted after `grace`.
async fn await_readers(handles: [Option<JoinHandle<()>>; 2], grace: Option<Duration>) {
    for handle in handles.into_iter().flatten() {
        match grace {
            None => {
                let _ = handle.await;
            }
            Some(grace) => {
                let abort = handle.abort_handle();
                if tokio::time::timeout(grace, handle).await.is_err() {
                    abort.abort();
                }
            }
        }
    }
}

/// Kills the shell and everything it started.
#[cfg(unix)]
async fn kill_tree(child: &mut Child) -> std::io::Result<()> {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) {
        // The shell leads its own process group.
        let _ = killpg(Pid::from_raw(pid), Signal::SIGKILL);
    }
    child.kill().await
}

#[cfg(not(unix))]
async fn kill_tree(child: &mut Child) -> std::io::Result<()> {
    child.kill().await
}

impl ProcessBuilder {
    /// Runs the child process, capturing output and waiting for completion.
    pub(super) async fn run_child(&self, name: &str, child: &mut Child) -> Result<ProcessOutput> {
        // Unbounded: readers must never block on a full channel while we wait on the child.
        let (stdout_tx, mut stdout_rx) = mpsc::unbounded_channel::<String>();
        let (stderr_tx, mut stderr_rx) = mpsc::unbounded_channel::<String>();

        let stdout_handle = spawn_reader(child.stdout.take(), name, "stdout", stdout_tx);
        let stderr_handle = spawn_reader(child.stderr.take(), name, "stderr", stderr_tx);

        let (exit_status, timed_out) = if let Some(timeout_duration) = self.timeout_duration() {
            tokio::select! {
                status = child.wait() => (status?, false),
                () = tokio::time::sleep(timeout_duration) => {
                    warn!(process = %name, timeout = ?timeout_duration, "Process timed out");
                    kill_tree(child)
                        .await
                        .with_context(|| format!("failed to kill process {name}"))?;
                    (child.wait().await?, true)
                }
            }
        } else {
            (child.wait().await?, false)
        };

        await_readers(
            [stdout_handle, stderr_handle],
            timed_out.then_some(READER_GRACE),
        )
        .await;

        Ok(ProcessOutput::new(
            exit_status.code().unwrap_or(-1),
            collect_output(&mut stdout_rx),
            collect_output(&mut stderr_rx),
            timed_out,
        ))
    }
}

/// Reads from a stream line by line, tracing and keeping each line.
async fn read_stream<R>(
    reader: R,
    process_name: &str,
    stream_name: &str,
    tx: mpsc::UnboundedSender<String>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                let _ = tx.send(line);
            }
            Ok(None) => break,
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }
}
