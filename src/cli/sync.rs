// gitshallow: Shallow git source sync driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the `clone`, `update` and `status` commands.

use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

use crate::git::reference::PackageSource;

/// Arguments shared by `clone` and `update`.
#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// URL to fetch from.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Working copy directory.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Commit hash, branch or tag to check out.
    #[arg(short = 'r', long = "reference", value_name = "REF")]
    pub reference: String,

    /// Human-readable version label, such as 'dev-main' or '1.x-dev'.
    /// Defaults to the reference.
    #[arg(short = 'p', long = "pretty", value_name = "LABEL")]
    pub pretty: Option<String>,

    /// Canonical source URL of the package, when URL is a mirror.
    #[arg(long = "source-url", value_name = "URL")]
    pub source_url: Option<String>,

    /// Package name. Defaults to the directory name of PATH.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Dist reference, rewritten along with the source reference when equal.
    #[arg(long = "dist-reference", value_name = "REF")]
    pub dist_reference: Option<String>,

    /// Release date of the version (RFC 3339), carried into the JSON output.
    #[arg(long = "release-date", value_name = "DATE")]
    pub release_date: Option<DateTime<Utc>>,

    /// Prints the resulting package state as JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    /// Package metadata described by these arguments.
    #[must_use]
    pub fn to_package(&self) -> PackageSource {
        let name = self.name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map_or_else(|| self.path.display().to_string(), |n| {
                    n.to_string_lossy().into_owned()
                })
        });

        PackageSource {
            name,
            source_url: self.source_url.clone().unwrap_or_else(|| self.url.clone()),
            source_reference: self.reference.clone(),
            dist_reference: self.dist_reference.clone(),
            pretty_version: self.pretty.clone().unwrap_or_else(|| self.reference.clone()),
            release_date: self.release_date,
        }
    }
}

/// Arguments of `status`.
#[derive(Debug, Clone, Args)]
pub struct StatusArgs {
    /// Working copy directory.
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Prints the status as JSON.
    #[arg(long)]
    pub json: bool,
}
