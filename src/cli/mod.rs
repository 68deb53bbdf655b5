// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitshallow using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitshallow [global options] <command>
//! clone  URL PATH --reference REF --pretty LABEL
//! update URL PATH --reference REF --pretty LABEL
//! status PATH
//! options
//! version
//! ```

pub mod global;
pub mod sync;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::sync::{StatusArgs, SyncArgs};
use clap::{Parser, Subcommand};

/// Shallow git source sync driver.
///
/// Clones package sources without checkout and moves existing working copies
/// to a requested commit, branch or tag.
#[derive(Debug, Parser)]
#[command(
    name = "gitshallow",
    author,
    version,
    about = "Shallow git source sync driver",
    long_about = "gitshallow Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Clones package sources and brings existing working copies to a\n\
                  commit, branch or tag through a dedicated `composer` remote.\n\n\
                  `gitshallow clone URL PATH --reference REF --pretty LABEL` creates\n\
                  a working copy, `gitshallow update ...` moves an existing one. See\n\
                  `gitshallow <command> --help` for more information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  gitshallow reads `gitshallow.toml` from the current directory when it\n\
                  exists. Additional files can be given with --ini and are loaded after\n\
                  it. GITSHALLOW_<SECTION>__<KEY> environment variables override files,\n\
                  and --set section/key=value overrides everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Clones a package source into a new working copy.
    Clone(SyncArgs),

    /// Brings an existing working copy to a reference.
    Update(SyncArgs),

    /// Shows branch, HEAD and local changes of a working copy.
    Status(StatusArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
