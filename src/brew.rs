// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Homebrew interaction.
//!
//! Cider never manages packages by itself. Every query and every install is
//! handed over to the `brew` binary through a subprocess. Queries capture
//! output, while installs, upgrades, and removals inherit the terminal so the
//! user can watch brew do its thing.

use crate::{
    config::{FormulaEntry, PackageKind},
    syscall::{command_exists, syscall_interactive, syscall_non_interactive},
};

use std::{
    collections::BTreeMap,
    ffi::{OsStr, OsString},
};
use tracing::instrument;

/// Taps that Homebrew provides on its own.
pub const BUILTIN_TAPS: [&str; 2] = ["homebrew/core", "homebrew/cask"];

/// Package to hand over to the package manager.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Package {
    /// Formula or cask.
    pub kind: PackageKind,

    /// Name of the package.
    pub name: String,

    /// Extra install options.
    pub options: Vec<String>,

    /// Environment variables to set for the install.
    pub env: BTreeMap<String, String>,
}

impl Package {
    /// Construct new package without options.
    pub fn new(kind: PackageKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Construct formula package from bootstrap listing.
    pub fn from_formula(entry: &FormulaEntry) -> Self {
        Self {
            kind: PackageKind::Formula,
            name: entry.name().to_string(),
            options: entry.options(),
            env: entry.env(),
        }
    }
}

/// Package manager operations that Cider relies on.
pub trait PackageManager {
    /// Check if the package manager can be called at all.
    fn is_available(&self) -> bool;

    /// List names of installed packages.
    fn installed(&self, kind: PackageKind) -> Result<Vec<String>>;

    /// List names of installed packages that have newer versions.
    fn outdated(&self, kind: PackageKind) -> Result<Vec<String>>;

    /// List names of installed formulae that depend on target formula.
    fn uses(&self, formula: &str) -> Result<Vec<String>>;

    /// List current taps.
    fn taps(&self) -> Result<Vec<String>>;

    /// Install package.
    fn install(&self, package: &Package, force: bool) -> Result<()>;

    /// Upgrade installed package.
    fn upgrade(&self, package: &Package) -> Result<()>;

    /// Uninstall package.
    fn uninstall(&self, package: &Package) -> Result<()>;

    /// Add a tap.
    fn tap(&self, tap: &str) -> Result<()>;

    /// Remove a tap.
    fn untap(&self, tap: &str) -> Result<()>;
}

/// Package manager access through the brew binary.
#[derive(Debug, Clone)]
pub struct Brew {
    binary: String,
}

impl Brew {
    /// Construct new brew caller for target binary.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn kind_flag(kind: PackageKind) -> &'static str {
        match kind {
            PackageKind::Formula => "--formula",
            PackageKind::Cask => "--cask",
        }
    }

    fn query(&self, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> Result<Vec<String>> {
        let output = syscall_non_interactive(&self.binary, args, &BTreeMap::new())?;
        Ok(split_lines(&output))
    }
}

impl Default for Brew {
    fn default() -> Self {
        Self::new("brew")
    }
}

impl PackageManager for Brew {
    fn is_available(&self) -> bool {
        command_exists(&self.binary)
    }

    #[instrument(skip(self), level = "debug")]
    fn installed(&self, kind: PackageKind) -> Result<Vec<String>> {
        self.query(["list", Self::kind_flag(kind), "-1"])
    }

    #[instrument(skip(self), level = "debug")]
    fn outdated(&self, kind: PackageKind) -> Result<Vec<String>> {
        self.query(["outdated", Self::kind_flag(kind), "--quiet"])
    }

    #[instrument(skip(self), level = "debug")]
    fn uses(&self, formula: &str) -> Result<Vec<String>> {
        self.query(["uses", "--installed", formula])
    }

    #[instrument(skip(self), level = "debug")]
    fn taps(&self) -> Result<Vec<String>> {
        self.query(["tap"])
    }

    #[instrument(skip(self), level = "debug")]
    fn install(&self, package: &Package, force: bool) -> Result<()> {
        let mut args: Vec<OsString> = vec!["install".into()];
        if package.kind == PackageKind::Cask {
            args.push("--cask".into());
        }
        if force {
            args.push("--force".into());
        }
        args.push(package.name.as_str().into());
        args.extend(package.options.iter().map(OsString::from));

        Ok(syscall_interactive(&self.binary, args, &package.env)?)
    }

    #[instrument(skip(self), level = "debug")]
    fn upgrade(&self, package: &Package) -> Result<()> {
        Ok(syscall_interactive(
            &self.binary,
            ["upgrade", Self::kind_flag(package.kind), package.name.as_str()],
            &package.env,
        )?)
    }

    #[instrument(skip(self), level = "debug")]
    fn uninstall(&self, package: &Package) -> Result<()> {
        Ok(syscall_interactive(
            &self.binary,
            ["uninstall", Self::kind_flag(package.kind), package.name.as_str()],
            &BTreeMap::new(),
        )?)
    }

    #[instrument(skip(self), level = "debug")]
    fn tap(&self, tap: &str) -> Result<()> {
        Ok(syscall_interactive(&self.binary, ["tap", tap], &BTreeMap::new())?)
    }

    #[instrument(skip(self), level = "debug")]
    fn untap(&self, tap: &str) -> Result<()> {
        Ok(syscall_interactive(&self.binary, ["untap", tap], &BTreeMap::new())?)
    }
}

fn split_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Package manager error types.
#[derive(Debug, thiserror::Error)]
pub enum BrewError {
    /// Call to brew binary fails.
    #[error(transparent)]
    Syscall(#[from] crate::syscall::SyscallError),
}

/// Friendly result alias :3
pub type Result<T, E = BrewError> = std::result::Result<T, E>;
