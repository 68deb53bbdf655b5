// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git source synchronisation.
//!
//! ```text
//!              SourceSync (sync.rs)
//!             /                \
//!      bootstrap.rs          sync_to_reference
//!      clone pipeline         changes.rs (fail/discard/stash)
//!             \                /
//!              v              v
//!            resolver.rs (branch -r, checkout, reset)
//!                     |
//!                     v
//!      runner.rs  CommandRunner --> ShellRunner --> core::process
//!      command.rs GitCommand, escape, sanitize_url
//!
//!      query.rs   read-only state through gix, no subprocess
//! ```

pub mod bootstrap;
pub mod changes;
pub mod command;
pub mod query;
pub mod reference;
pub mod resolver;
pub mod runner;
pub mod sync;

#[cfg(test)]
mod test_utils;
