// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Support directory management.
//!
//! Cider groups everything it needs to restore a machine into one place
//! called the __support directory__.
//!
//! # Support Directory Layout
//!
//! The support directory can generally be placed anywhere on the user's file
//! system. However, the default location is `$XDG_CONFIG_HOME/cider`. It
//! houses the following entries:
//!
//! - `bootstrap.yaml`: the bootstrap file. Older `bootstrap.json` and plain
//!   text `bootstrap.txt` files are picked up when no YAML file exists, and
//!   keep their format when modified.
//! - `defaults.yaml`: preferences to write through `defaults`.
//! - `cider.toml`: settings for Cider itself.
//! - `symlinks/`: sources of every symlink listed in the bootstrap file.
//!
//! Symlink targets created by the last relink are cached separately at
//! `$XDG_CACHE_HOME/cider/symlink_targets.json`, so stale links can be
//! cleaned up once they are dropped from the bootstrap file.
//!
//! # Modification
//!
//! Files are only rewritten when a modification actually changes their
//! content. Hand-written formatting and comments survive any command that
//! ends up being a no-op.

use crate::{
    config::{Bootstrap, FileFormat, Preferences, Settings},
    path::{collapse_user, default_cache_dir, default_cider_dir, legacy_cider_dir},
};

use std::{
    collections::BTreeSet,
    fs::{read_to_string, remove_dir, rename, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument};

const BOOTSTRAP_FILES: [&str; 4] = [
    "bootstrap.yaml",
    "bootstrap.yml",
    "bootstrap.json",
    "bootstrap.txt",
];
const DEFAULTS_FILES: [&str; 3] = ["defaults.yaml", "defaults.yml", "defaults.json"];
const SETTINGS_FILE: &str = "cider.toml";
const SYMLINK_TARGETS_FILE: &str = "symlink_targets.json";
const LEGACY_CACHE_DIR: &str = ".cache";

/// Support directory of Cider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    root: PathBuf,
    cache: PathBuf,
}

impl Store {
    /// Open support directory at target path with target cache directory.
    ///
    /// Creates both directories if they do not exist yet.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::CreateDir`] if either directory cannot be
    ///   created, or a relative path cannot be made absolute.
    pub fn open(root: impl Into<PathBuf>, cache: impl Into<PathBuf>) -> Result<Self> {
        // INVARIANT: Keep both paths absolute, symlinks point at sources by
        //   full path.
        let store = Self {
            root: absolute(root.into())?,
            cache: absolute(cache.into())?,
        };

        for dir in [&store.root, &store.cache] {
            mkdirp::mkdirp(dir).map_err(|err| StoreError::CreateDir {
                source: err,
                path: dir.clone(),
            })?;
        }

        Ok(store)
    }

    /// Locate and open support directory.
    ///
    /// Uses target path if given. Otherwise falls back to the default support
    /// directory, moving the legacy `~/.cider` directory over to it first if
    /// needed.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::NoWayHome`] if default paths cannot be
    ///   determined.
    /// - Return [`StoreError::Migrate`] if legacy directory cannot be moved.
    /// - Return [`StoreError::CreateDir`] if directories cannot be created.
    #[instrument(level = "debug")]
    pub fn locate(root: Option<PathBuf>) -> Result<Self> {
        let cache = default_cache_dir()?;
        let (root, migrated) = match root {
            Some(root) => (root, false),
            None => {
                let root = default_cider_dir()?;
                let migrated = migrate_legacy_dir(legacy_cider_dir()?, &root)?;
                (root, migrated)
            }
        };

        debug!("support directory at {}", root.display());
        let store = Self::open(root, cache)?;
        if migrated {
            store.adopt_legacy_cache()?;
        }

        Ok(store)
    }

    /// Move symlink target cache of a migrated legacy directory into the
    /// cache directory.
    ///
    /// Legacy directories kept the cache at `.cache/symlink_targets.json`
    /// inside the support directory itself. An existing cache file wins over
    /// the legacy one.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Migrate`] if the legacy cache cannot be moved.
    pub fn adopt_legacy_cache(&self) -> Result<bool> {
        let legacy_dir = self.root.join(LEGACY_CACHE_DIR);
        let legacy = legacy_dir.join(SYMLINK_TARGETS_FILE);
        let current = self.symlink_targets_path();
        if !legacy.is_file() || current.exists() {
            return Ok(false);
        }

        info!("move symlink target cache to {}", collapse_user(&current));
        rename(&legacy, &current).map_err(|err| StoreError::Migrate {
            source: err,
            from: legacy.clone(),
            to: current.clone(),
        })?;

        if let Err(err) = remove_dir(&legacy_dir) {
            debug!("keep {}: {err}", legacy_dir.display());
        }

        Ok(true)
    }

    /// Path to support directory.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Path to directory holding symlink sources.
    pub fn symlink_dir(&self) -> PathBuf {
        self.root.join("symlinks")
    }

    /// Path to bootstrap file.
    ///
    /// Picks the first existing bootstrap file, or `bootstrap.yaml` if there
    /// is none.
    pub fn bootstrap_path(&self) -> PathBuf {
        self.first_existing(&BOOTSTRAP_FILES)
    }

    /// Path to defaults file.
    pub fn defaults_path(&self) -> PathBuf {
        self.first_existing(&DEFAULTS_FILES)
    }

    /// Path to settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    /// Path to symlink target cache file.
    pub fn symlink_targets_path(&self) -> PathBuf {
        self.cache.join(SYMLINK_TARGETS_FILE)
    }

    /// Read bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::BootstrapMissing`] if there is no bootstrap
    ///   file.
    /// - Return [`StoreError::Read`] if bootstrap file cannot be read.
    /// - Return [`StoreError::Parse`] if bootstrap file is malformed.
    pub fn read_bootstrap(&self) -> Result<Bootstrap> {
        let path = self.bootstrap_path();
        match read_optional(&path)? {
            Some(content) => parse(&path, |format| Bootstrap::parse_as(&content, format)),
            None => Err(StoreError::BootstrapMissing {
                path: collapse_user(&path),
            }),
        }
    }

    /// Edit bootstrap file.
    ///
    /// Reads current bootstrap file, or an empty bootstrap if it does not
    /// exist yet, and lets editor modify it. Bootstrap file is only written
    /// back if editor changed anything. Returns whether bootstrap file was
    /// changed.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Read`] or [`StoreError::Write`] if bootstrap
    ///   file cannot be accessed.
    /// - Return [`StoreError::Parse`] if bootstrap file is malformed or
    ///   cannot hold the new content.
    pub fn edit_bootstrap<E>(&self, editor: E) -> Result<bool>
    where
        E: FnOnce(&mut Bootstrap),
    {
        let path = self.bootstrap_path();
        let current = match read_optional(&path)? {
            Some(content) => parse(&path, |format| Bootstrap::parse_as(&content, format))?,
            None => Bootstrap::default(),
        };

        let mut edited = current.clone();
        editor(&mut edited);
        edited.normalize();

        if edited == current {
            debug!("bootstrap file unchanged");
            return Ok(false);
        }

        let content = parse(&path, |format| edited.render_as(format))?;
        write_file(&path, content)?;

        Ok(true)
    }

    /// Read defaults file.
    ///
    /// Missing defaults file means no preferences.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Read`] if defaults file cannot be read.
    /// - Return [`StoreError::Parse`] if defaults file is malformed.
    pub fn read_preferences(&self) -> Result<Preferences> {
        let path = self.defaults_path();
        match read_optional(&path)? {
            Some(content) => parse(&path, |format| Preferences::parse_as(&content, format)),
            None => Ok(Preferences::default()),
        }
    }

    /// Edit defaults file.
    ///
    /// Follows the same rules as [`Store::edit_bootstrap`].
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Read`] or [`StoreError::Write`] if defaults
    ///   file cannot be accessed.
    /// - Return [`StoreError::Parse`] if defaults file is malformed.
    pub fn edit_preferences<E>(&self, editor: E) -> Result<bool>
    where
        E: FnOnce(&mut Preferences),
    {
        let path = self.defaults_path();
        let current = self.read_preferences()?;
        let mut edited = current.clone();
        editor(&mut edited);

        if edited == current {
            debug!("defaults file unchanged");
            return Ok(false);
        }

        let content = parse(&path, |format| edited.render_as(format))?;
        write_file(&path, content)?;

        Ok(true)
    }

    /// Read settings file.
    ///
    /// Missing settings file means default settings.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Read`] if settings file cannot be read.
    /// - Return [`StoreError::Parse`] if settings file is malformed.
    pub fn read_settings(&self) -> Result<Settings> {
        let path = self.settings_path();
        match read_optional(&path)? {
            Some(content) => parse(&path, |_| content.parse()),
            None => Ok(Settings::default()),
        }
    }

    /// Read symlink targets created by last relink.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Read`] if cache file cannot be read.
    /// - Return [`StoreError::Parse`] if cache file is malformed.
    pub fn read_symlink_targets(&self) -> Result<BTreeSet<PathBuf>> {
        let path = self.symlink_targets_path();
        match read_optional(&path)? {
            Some(content) if !content.trim().is_empty() => {
                parse(&path, |_| Ok(serde_json::from_str(&content)?))
            }
            _ => Ok(BTreeSet::new()),
        }
    }

    /// Record symlink targets created by relink.
    ///
    /// # Errors
    ///
    /// - Return [`StoreError::Write`] if cache file cannot be written.
    /// - Return [`StoreError::Parse`] if targets cannot be serialized.
    pub fn write_symlink_targets(&self, targets: &BTreeSet<PathBuf>) -> Result<()> {
        let path = self.symlink_targets_path();
        let content = parse(&path, |_| Ok(serde_json::to_string_pretty(targets)?))?;
        write_file(&path, content)
    }

    fn first_existing(&self, names: &[&str]) -> PathBuf {
        names
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
            .unwrap_or_else(|| self.root.join(names[0]))
    }
}

/// Move legacy support directory to new location.
///
/// Only moves when the legacy directory exists and the new location does
/// not. Returns whether anything was moved.
///
/// # Errors
///
/// - Return [`StoreError::Migrate`] if the move fails.
/// - Return [`StoreError::CreateDir`] if parent of new location cannot be
///   created.
pub fn migrate_legacy_dir(legacy: impl AsRef<Path>, root: impl AsRef<Path>) -> Result<bool> {
    let (legacy, root) = (legacy.as_ref(), root.as_ref());
    if root.exists() || !legacy.is_dir() {
        return Ok(false);
    }

    if let Some(parent) = root.parent() {
        mkdirp::mkdirp(parent).map_err(|err| StoreError::CreateDir {
            source: err,
            path: parent.to_path_buf(),
        })?;
    }

    info!(
        "move support directory {} to {}",
        collapse_user(legacy),
        collapse_user(root)
    );
    rename(legacy, root).map_err(|err| StoreError::Migrate {
        source: err,
        from: legacy.to_path_buf(),
        to: root.to_path_buf(),
    })?;

    Ok(true)
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }

    std::path::absolute(&path).map_err(|err| StoreError::CreateDir { source: err, path })
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(StoreError::Read {
            source: err,
            path: path.to_path_buf(),
        }),
    }
}

fn write_file(path: &Path, content: String) -> Result<()> {
    debug!("write {}", path.display());
    if let Some(parent) = path.parent() {
        mkdirp::mkdirp(parent).map_err(|err| StoreError::CreateDir {
            source: err,
            path: parent.to_path_buf(),
        })?;
    }

    write(path, content.as_bytes()).map_err(|err| StoreError::Write {
        source: err,
        path: path.to_path_buf(),
    })
}

fn parse<T>(
    path: &Path,
    parser: impl FnOnce(FileFormat) -> std::result::Result<T, crate::config::ConfigError>,
) -> Result<T> {
    parser(FileFormat::from_path(path)).map_err(|err| StoreError::Parse {
        source: err,
        path: path.to_path_buf(),
    })
}

/// All possible error types for support directory interaction.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Bootstrap file does not exist.
    #[error("bootstrap file not found, expected at {path}")]
    BootstrapMissing { path: String },

    /// Directory cannot be created.
    #[error("failed to create directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be read.
    #[error("failed to read {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be written.
    #[error("failed to write {:?}", path.display())]
    Write {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File content cannot be parsed or rendered.
    #[error("malformed content in {:?}", path.display())]
    Parse {
        #[source]
        source: crate::config::ConfigError,
        path: PathBuf,
    },

    /// Legacy support directory cannot be moved.
    #[error("failed to move {:?} to {:?}", from.display(), to.display())]
    Migrate {
        #[source]
        source: std::io::Error,
        from: PathBuf,
        to: PathBuf,
    },

    /// Default paths cannot be determined.
    #[error(transparent)]
    NoWayHome(#[from] crate::path::NoWayHome),
}

/// Friendly result alias :3
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormulaEntry, PackageKind};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    fn store() -> anyhow::Result<Store> {
        let cwd = std::env::current_dir()?;
        Ok(Store::open(cwd.join("cider"), cwd.join("cache"))?)
    }

    #[sealed_test]
    fn open_creates_directories() -> anyhow::Result<()> {
        let store = store()?;
        assert!(store.root().is_dir());
        assert!(store.symlink_targets_path().parent().unwrap().is_dir());
        Ok(())
    }

    #[sealed_test]
    fn missing_bootstrap_is_reported() -> anyhow::Result<()> {
        let store = store()?;
        assert!(matches!(
            store.read_bootstrap(),
            Err(StoreError::BootstrapMissing { .. })
        ));
        Ok(())
    }

    #[sealed_test]
    fn edit_creates_bootstrap() -> anyhow::Result<()> {
        let store = store()?;
        let changed = store.edit_bootstrap(|bootstrap| bootstrap.insert(PackageKind::Formula, "git"))?;
        assert!(changed);
        assert_eq!(store.bootstrap_path(), store.root().join("bootstrap.yaml"));
        assert_eq!(
            store.read_bootstrap()?.formulas,
            vec![FormulaEntry::Plain("git".into())]
        );
        Ok(())
    }

    #[sealed_test]
    fn unchanged_bootstrap_is_not_rewritten() -> anyhow::Result<()> {
        let store = store()?;
        let content = indoc! {r#"
            # my machine
            formulas:
                - wget
                - git   # scm
        "#};
        std::fs::write(store.root().join("bootstrap.yaml"), content)?;

        let changed = store.edit_bootstrap(|bootstrap| bootstrap.insert(PackageKind::Formula, "git"))?;
        assert!(!changed);
        assert_eq!(std::fs::read_to_string(store.bootstrap_path())?, content);

        Ok(())
    }

    #[sealed_test]
    fn legacy_json_bootstrap_keeps_format() -> anyhow::Result<()> {
        let store = store()?;
        std::fs::write(store.root().join("bootstrap.json"), r#"{"formulas": ["git"]}"#)?;

        store.edit_bootstrap(|bootstrap| bootstrap.insert(PackageKind::Cask, "iterm2"))?;
        let content = std::fs::read_to_string(store.root().join("bootstrap.json"))?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        assert_eq!(value["casks"][0], "iterm2");
        assert_eq!(value["formulas"][0], "git");
        assert!(!store.root().join("bootstrap.yaml").exists());

        Ok(())
    }

    #[sealed_test]
    fn plain_text_bootstrap_rejects_other_keys() -> anyhow::Result<()> {
        let store = store()?;
        std::fs::write(store.root().join("bootstrap.txt"), "git\n")?;

        store.edit_bootstrap(|bootstrap| bootstrap.insert(PackageKind::Formula, "wget"))?;
        assert_eq!(
            std::fs::read_to_string(store.root().join("bootstrap.txt"))?,
            "git\nwget\n"
        );

        let result = store.edit_bootstrap(|bootstrap| bootstrap.taps.push("a/b".into()));
        assert!(matches!(result, Err(StoreError::Parse { .. })));

        Ok(())
    }

    #[sealed_test]
    fn symlink_targets_round_trip() -> anyhow::Result<()> {
        let store = store()?;
        assert!(store.read_symlink_targets()?.is_empty());

        let targets = BTreeSet::from([PathBuf::from("/home/blah/.vimrc")]);
        store.write_symlink_targets(&targets)?;
        assert_eq!(store.read_symlink_targets()?, targets);

        Ok(())
    }

    #[sealed_test]
    fn settings_default_when_missing() -> anyhow::Result<()> {
        let store = store()?;
        assert_eq!(store.read_settings()?, Settings::default());

        std::fs::write(store.settings_path(), "[restore]\nskip_failed = true\n")?;
        assert!(store.read_settings()?.restore.skip_failed);

        Ok(())
    }

    #[sealed_test]
    fn migrate_moves_legacy_dir() -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let legacy = cwd.join(".cider");
        let root = cwd.join("config").join("cider");
        std::fs::create_dir(&legacy)?;
        std::fs::write(legacy.join("bootstrap.yaml"), "formulas: [git]\n")?;

        assert!(migrate_legacy_dir(&legacy, &root)?);
        assert!(!legacy.exists());
        assert!(root.join("bootstrap.yaml").is_file());

        // Nothing left to move.
        assert!(!migrate_legacy_dir(&legacy, &root)?);

        Ok(())
    }

    #[sealed_test]
    fn open_makes_relative_paths_absolute() -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let store = Store::open("dot", "cache")?;

        assert_eq!(store.root(), cwd.join("dot"));
        assert_eq!(store.symlink_targets_path(), cwd.join("cache/symlink_targets.json"));

        Ok(())
    }

    #[sealed_test]
    fn migrated_cache_moves_to_cache_dir() -> anyhow::Result<()> {
        let store = store()?;
        let legacy = store.root().join(".cache");
        std::fs::create_dir(&legacy)?;
        std::fs::write(legacy.join("symlink_targets.json"), r#"["/home/user/.vimrc"]"#)?;

        assert!(store.adopt_legacy_cache()?);
        assert_eq!(
            store.read_symlink_targets()?,
            BTreeSet::from([PathBuf::from("/home/user/.vimrc")])
        );
        assert!(!legacy.exists());

        // Nothing left to move.
        assert!(!store.adopt_legacy_cache()?);

        Ok(())
    }
}
