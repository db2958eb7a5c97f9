// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for external files that need to be
//! interacted with, or managed in some way.
//!
//! # Support Directory
//!
//! Cider keeps its bootstrap file, defaults file, settings, and symlink
//! sources in one place called the __support directory__. The default
//! location follows the XDG Base Directory convention at
//! `$XDG_CONFIG_HOME/cider`. Older installations kept everything at
//! `~/.cider`, which is still recognized so it can be migrated.
//!
//! # See Also
//!
//! - [XDG Base Directory](https://wiki.archlinux.org/title/XDG_Base_Directory)

use std::{
    env,
    path::{Path, PathBuf},
};

/// Environment variable that overrides the support directory location.
pub const CIDER_DIR_ENV: &str = "CIDER_DIR";

/// Determine absolute path to user's home directory.
///
/// Does not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(NoWayHome)
}

/// Determine default absolute path to support directory.
///
/// Uses `$CIDER_DIR` when set, otherwise the XDG Base Directory path
/// `$XDG_CONFIG_HOME/cider`. Does not check if the path returned actually
/// exists.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_cider_dir() -> Result<PathBuf> {
    if let Some(path) = env::var_os(CIDER_DIR_ENV).filter(|path| !path.is_empty()) {
        return Ok(expand_user(PathBuf::from(path)));
    }

    dirs::config_dir()
        .map(|path| path.join("cider"))
        .ok_or(NoWayHome)
}

/// Determine path of support directory used before XDG compliance.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn legacy_cider_dir() -> Result<PathBuf> {
    home_dir().map(|path| path.join(".cider"))
}

/// Determine default absolute path to cache directory.
///
/// Uses XDG Base Directory path `$XDG_CACHE_HOME/cider`.
///
/// # Errors
///
/// - Return [`NoWayHome`] if home directory path cannot be determined.
pub fn default_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|path| path.join("cider"))
        .ok_or(NoWayHome)
}

/// Expand leading tilde of path into user's home directory.
///
/// Paths without a leading tilde, or paths that cannot be represented as
/// UTF-8, are returned untouched.
pub fn expand_user(path: impl AsRef<Path>) -> PathBuf {
    match path.as_ref().to_str() {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => path.as_ref().to_path_buf(),
    }
}

/// Collapse user's home directory prefix of path back into a tilde.
///
/// Meant for display purposes only.
pub fn collapse_user(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    if let Ok(home) = home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return "~".into();
            }

            return format!("~/{}", rest.display());
        }
    }

    path.display().to_string()
}

/// No way to determine user's home directory.
///
/// # See Also
///
/// - [`dirs::home_dir`](https://docs.rs/dirs/latest/dirs/fn.home_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's home directory")]
pub struct NoWayHome;

/// Friendly result alias :3
pub type Result<T, E = NoWayHome> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("HOME", "/home/blah")])]
    fn collapse_user_replaces_home() {
        assert_eq!(collapse_user("/home/blah/.vimrc"), "~/.vimrc");
        assert_eq!(collapse_user("/home/blah"), "~");
        assert_eq!(collapse_user("/etc/hosts"), "/etc/hosts");
        assert_eq!(collapse_user("/home/blahblah/file"), "/home/blahblah/file");
    }

    #[sealed_test(env = [("HOME", "/home/blah")])]
    fn expand_user_replaces_tilde() {
        assert_eq!(expand_user("~/.config"), PathBuf::from("/home/blah/.config"));
        assert_eq!(expand_user("/opt/~"), PathBuf::from("/opt/~"));
    }

    #[sealed_test(env = [("HOME", "/home/blah"), ("CIDER_DIR", "~/dotfiles/cider")])]
    fn default_cider_dir_honors_override() -> anyhow::Result<()> {
        assert_eq!(default_cider_dir()?, PathBuf::from("/home/blah/dotfiles/cider"));
        Ok(())
    }

    #[sealed_test(env = [("HOME", "/home/blah")])]
    fn legacy_cider_dir_is_hidden_home_dir() -> anyhow::Result<()> {
        assert_eq!(legacy_cider_dir()?, PathBuf::from("/home/blah/.cider"));
        Ok(())
    }
}
