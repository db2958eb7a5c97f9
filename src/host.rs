// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Host machine configuration.
//!
//! Besides packages, a bootstrap can carry preferences written through
//! macOS's `defaults` tool, custom application icons, and shell scripts. All
//! of it is applied to the host through external commands.
//!
//! Icons are set with [fileicon](https://github.com/mklement0/fileicon),
//! which itself can be installed through brew. Icons given as URLs are
//! downloaded through `curl` before being applied.

use crate::{
    config::PreferenceValue,
    path::{expand_user, home_dir},
    syscall::{syscall_interactive_in, syscall_non_interactive},
};

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

/// Host operations that Cider relies on beyond package management.
pub trait Host {
    /// Write preference value into domain.
    fn write_default(&self, domain: &str, key: &str, value: &PreferenceValue) -> Result<()>;

    /// Delete preference key from domain.
    fn delete_default(&self, domain: &str, key: &str) -> Result<()>;

    /// Locate application bundle by name.
    fn app_path(&self, app: &str) -> Option<PathBuf>;

    /// Set custom icon of application bundle.
    fn set_icon(&self, app_path: &Path, icon: &str) -> Result<()>;

    /// Remove custom icon of application bundle.
    fn remove_icon(&self, app_path: &Path) -> Result<()>;

    /// Run shell script from working directory.
    fn run_script(&self, script: &str, cwd: &Path) -> Result<()>;
}

/// Host access on macOS.
#[derive(Debug, Default, Clone)]
pub struct MacHost;

impl MacHost {
    /// Construct new macOS host.
    pub fn new() -> Self {
        Self
    }

    fn download_icon(&self, url: &str) -> Result<PathBuf> {
        let dir = std::env::temp_dir().join("cider-icons");
        mkdirp::mkdirp(&dir).map_err(|err| HostError::CreateDir {
            source: err,
            path: dir.clone(),
        })?;

        let name = url
            .split(['?', '#'])
            .next()
            .and_then(|url| url.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("icon.icns");
        let path = dir.join(name);

        info!("download icon {url}");
        syscall_non_interactive(
            "curl",
            [
                OsStr::new("--fail"),
                OsStr::new("--silent"),
                OsStr::new("--show-error"),
                OsStr::new("--location"),
                OsStr::new("--output"),
                path.as_os_str(),
                OsStr::new(url),
            ],
            &BTreeMap::new(),
        )?;

        Ok(path)
    }
}

impl Host for MacHost {
    #[instrument(skip(self), level = "debug")]
    fn write_default(&self, domain: &str, key: &str, value: &PreferenceValue) -> Result<()> {
        let value = value_arg(value);
        syscall_non_interactive(
            "defaults",
            ["write", domain, key, value.0, value.1.as_str()],
            &BTreeMap::new(),
        )?;

        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn delete_default(&self, domain: &str, key: &str) -> Result<()> {
        syscall_non_interactive("defaults", ["delete", domain, key], &BTreeMap::new())?;
        Ok(())
    }

    fn app_path(&self, app: &str) -> Option<PathBuf> {
        let bundle = if app.ends_with(".app") {
            app.to_string()
        } else {
            format!("{app}.app")
        };

        let direct = expand_user(&bundle);
        if direct.is_absolute() && direct.is_dir() {
            return Some(direct);
        }

        let mut roots = vec![PathBuf::from("/Applications")];
        if let Ok(home) = home_dir() {
            roots.push(home.join("Applications"));
        }

        roots
            .into_iter()
            .map(|root| root.join(&bundle))
            .find(|path| path.is_dir())
    }

    #[instrument(skip(self), level = "debug")]
    fn set_icon(&self, app_path: &Path, icon: &str) -> Result<()> {
        let icon_path = if is_url(icon) {
            self.download_icon(icon)?
        } else {
            expand_user(icon)
        };

        syscall_non_interactive(
            "fileicon",
            [OsStr::new("set"), app_path.as_os_str(), icon_path.as_os_str()],
            &BTreeMap::new(),
        )?;

        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn remove_icon(&self, app_path: &Path) -> Result<()> {
        syscall_non_interactive(
            "fileicon",
            [OsStr::new("rm"), app_path.as_os_str()],
            &BTreeMap::new(),
        )?;

        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn run_script(&self, script: &str, cwd: &Path) -> Result<()> {
        info!("run script {script:?}");
        syscall_interactive_in("sh", ["-c", script], &BTreeMap::new(), Some(cwd))?;
        Ok(())
    }
}

/// Check if icon refers to a remote location.
pub fn is_url(icon: &str) -> bool {
    ["http://", "https://", "ftp://"]
        .iter()
        .any(|scheme| icon.starts_with(scheme))
}

fn value_arg(value: &PreferenceValue) -> (&'static str, String) {
    (value.type_flag(), value.to_string())
}

/// Host configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// External command fails.
    #[error(transparent)]
    Syscall(#[from] crate::syscall::SyscallError),

    /// Directory cannot be created.
    #[error("failed to create directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
pub type Result<T, E = HostError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;

    #[test_case("https://example.com/terminal.icns", true; "https url")]
    #[test_case("http://example.com/terminal.icns", true; "http url")]
    #[test_case("~/icons/terminal.icns", false; "home path")]
    #[test_case("/tmp/terminal.icns", false; "absolute path")]
    #[test]
    fn detect_icon_url(icon: &str, expect: bool) {
        self::assert_eq!(is_url(icon), expect);
    }

    #[test_case(PreferenceValue::Bool(true), ("-bool", "true"); "bool")]
    #[test_case(PreferenceValue::Int(36), ("-int", "36"); "int")]
    #[test_case(PreferenceValue::Float(0.25), ("-float", "0.25"); "float")]
    #[test_case(PreferenceValue::String("Nlsv".into()), ("-string", "Nlsv"); "string")]
    #[test]
    fn defaults_write_arguments(value: PreferenceValue, expect: (&str, &str)) {
        let result = value_arg(&value);
        self::assert_eq!((result.0, result.1.as_str()), expect);
    }

    #[sealed_test]
    fn run_script_in_directory() -> anyhow::Result<()> {
        let dir = std::env::current_dir()?.join("scripts");
        mkdirp::mkdirp(&dir)?;

        MacHost::new().run_script("echo done > marker", &dir)?;
        assert_eq!(std::fs::read_to_string(dir.join("marker"))?, "done\n");
        assert!(!std::env::current_dir()?.join("marker").exists());

        Ok(())
    }
}
