// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Homebrew bootstrapping.
//!
//! Cider keeps a declarative bootstrap file of taps, formulae, casks,
//! symlinks, preferences, icons, and scripts inside a support directory, and
//! restores a machine from it. Every command that changes installed
//! packages also updates the bootstrap file, so the file always describes the
//! machine it came from.

pub mod brew;
pub mod cider;
pub mod config;
pub mod host;
pub mod path;
pub mod prompt;
pub mod store;
pub mod symlink;
pub mod syscall;

pub use cider::{Cider, CiderError};
pub use config::{Bootstrap, PackageKind, PreferenceValue, Preferences, Settings};
pub use store::Store;
