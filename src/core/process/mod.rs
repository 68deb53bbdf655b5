// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning.
//!
//! ```text
//! ProcessBuilder::raw("git clone ... && cd ... && git fetch composer")
//!   .cwd() .env() .timeout()
//!   .run()
//!       --> tokio::process::Command
//!           /bin/sh -c (own process group)  |  cmd /C
//!       --> ProcessOutput { exit_code, stdout, stderr, timed_out }
//! ```

pub mod builder;
mod io;
mod runner;
