// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Symlink management.
//!
//! Dotfiles and other configuration that should follow the user from machine
//! to machine live inside the support directory at `symlinks/`. The bootstrap
//! file maps glob patterns of these __link sources__ to __link targets__,
//! e.g., `"vim/*": "~/"` links every file in `symlinks/vim/` into the home
//! directory.
//!
//! # Link Targets
//!
//! A target ending with a path separator, or the home directory itself
//! (`~`), is treated as a directory. Each matching source is then linked
//! inside of it under its own file name. Any other target is the exact path
//! of the link, which only makes sense for globs that match one source.
//!
//! # Stale Links
//!
//! Every link created by a relink is remembered in the symlink target cache.
//! When an entry is dropped from the bootstrap file, the next relink removes
//! the links it no longer creates, but only if they still point inside the
//! support directory. Anything else is left alone.

use crate::{
    path::{collapse_user, expand_user, home_dir, legacy_cider_dir},
    store::Store,
};

use glob::Pattern;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs::{self, read_link, remove_dir, remove_file, rename, symlink_metadata},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

/// Outcome of linking one source to one target.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LinkStatus {
    /// Symlink was created.
    Linked,

    /// Symlink already existed and pointed at the source.
    AlreadyLinked,

    /// Target is occupied by something else and was left alone.
    Conflict,
}

impl LinkStatus {
    /// Check if target now links to the source.
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked | Self::AlreadyLinked)
    }
}

/// Create every symlink listed in the bootstrap file.
///
/// Removes stale links created by previous relinks, and records the new set
/// of link targets in the symlink target cache. Broken links into the support
/// directory, or into the legacy `~/.cider` directory it was moved from, are
/// replaced. Other conflicting targets are moved into the trash and replaced
/// when `force` is set, otherwise they are reported and skipped.
///
/// # Errors
///
/// - Return [`SymlinkError::SourceMissing`] if a link source does not exist.
/// - Return [`SymlinkError::Pattern`] if a source glob is invalid.
/// - Return [`SymlinkError::Io`] if file system operations fail.
/// - Return [`SymlinkError::Store`] if the target cache cannot be accessed.
#[instrument(skip(store, symlinks), level = "debug")]
pub fn relink(store: &Store, symlinks: &BTreeMap<String, String>, force: bool) -> Result<()> {
    let previous = store.read_symlink_targets()?;
    let mut current = BTreeSet::new();
    let mut support_dirs = vec![store.root().to_path_buf()];
    if let Ok(legacy) = legacy_cider_dir() {
        support_dirs.push(legacy);
    }

    for (source_glob, target) in symlinks {
        let target_path = expand_target(target)?;
        let parent = if is_dir_target(target) {
            Some(target_path.as_path())
        } else {
            target_path.parent()
        };
        if let Some(parent) = parent {
            mkdirp::mkdirp(parent).map_err(|err| SymlinkError::Io {
                source: err,
                path: parent.to_path_buf(),
            })?;
        }

        for source in expand_sources(store, source_glob)? {
            let link = link_path(&source, target, &target_path);
            remove_broken_link(&link, &support_dirs)?;
            if make_symlink(&source, &link, force)?.is_linked() {
                current.insert(link);
            }
        }
    }

    let dead = previous.difference(&current).cloned().collect::<Vec<_>>();
    remove_dead_targets(store.root(), dead)?;
    store.write_symlink_targets(&current)?;

    Ok(())
}

/// Move items into the support directory and link them back.
///
/// Every item is moved into `symlinks/<name>/`, and a symlink to its new
/// location is left at its old location. All items must share the same
/// parent directory. Returns the source glob and link target that should be
/// recorded in the bootstrap file.
///
/// Either every item is moved, or none is. Items already moved when a later
/// one fails are moved back before the error is returned.
///
/// # Errors
///
/// - Return [`SymlinkError::NoItems`] if no items were given.
/// - Return [`SymlinkError::ItemMissing`] if an item does not exist.
/// - Return [`SymlinkError::NotSiblings`] if items have different parents.
/// - Return [`SymlinkError::SourceExists`] if an item is already inside the
///   support directory.
/// - Return [`SymlinkError::Io`] if file system operations fail.
#[instrument(skip(store), level = "debug")]
pub fn add_link(store: &Store, name: &str, items: &[PathBuf]) -> Result<(String, String)> {
    let cwd = std::env::current_dir().map_err(|err| SymlinkError::Io {
        source: err,
        path: PathBuf::from("."),
    })?;
    let items = items
        .iter()
        .map(|item| absolute(&cwd, &expand_user(item)))
        .collect::<Vec<_>>();

    let parent = shared_parent(&items)?;
    let link_dir = store.symlink_dir().join(name);
    let mut moves = Vec::new();
    for item in &items {
        if symlink_metadata(item).is_err() {
            return Err(SymlinkError::ItemMissing {
                path: collapse_user(item),
            });
        }

        let file_name = item.file_name().ok_or_else(|| SymlinkError::ItemMissing {
            path: collapse_user(item),
        })?;
        let source = link_dir.join(file_name);
        if symlink_metadata(&source).is_ok() {
            return Err(SymlinkError::SourceExists {
                path: collapse_user(&source),
            });
        }
        moves.push((item.clone(), source));
    }

    mkdirp::mkdirp(&link_dir).map_err(|err| SymlinkError::Io {
        source: err,
        path: link_dir.clone(),
    })?;

    let mut targets = store.read_symlink_targets()?;
    let mut done = Vec::new();
    for (item, source) in moves {
        if let Err(err) = move_and_link(&item, &source) {
            rollback_moves(&done);
            return Err(err);
        }
        info!("symlinked {} -> {}", collapse_user(&item), collapse_user(&source));
        done.push((item, source));
    }
    targets.extend(done.into_iter().map(|(item, _)| item));
    store.write_symlink_targets(&targets)?;

    let target = match collapse_user(&parent) {
        home if home == "~" => home,
        parent => format!("{parent}/"),
    };

    Ok((format!("{name}/*"), target))
}

/// Undo [`add_link`] for every bootstrap symlink entry under target name.
///
/// Each link created for the entries is replaced by the real file moved back
/// out of `symlinks/<name>/`. Returns the source globs that should be dropped
/// from the bootstrap file. Entries with a source that could not be moved
/// back, because its target is occupied, are not returned.
///
/// # Errors
///
/// - Return [`SymlinkError::Pattern`] if a source glob is invalid.
/// - Return [`SymlinkError::Io`] if file system operations fail.
/// - Return [`SymlinkError::Store`] if the target cache cannot be accessed.
#[instrument(skip(store, symlinks), level = "debug")]
pub fn remove_link(
    store: &Store,
    name: &str,
    symlinks: &BTreeMap<String, String>,
) -> Result<Vec<String>> {
    let entries = symlinks
        .iter()
        .filter(|(source_glob, _)| is_link_entry(source_glob, name))
        .collect::<Vec<_>>();

    let mut targets = store.read_symlink_targets()?;
    let mut removed = Vec::new();
    for (source_glob, target) in entries {
        let target_path = expand_target(target)?;
        let mut kept = false;
        for source in expand_sources(store, source_glob)? {
            let link = link_path(&source, target, &target_path);
            match symlink_metadata(&link) {
                Ok(meta) if meta.file_type().is_symlink() && points_to(&link, &source) => {
                    remove_file(&link).map_err(|err| SymlinkError::Io {
                        source: err,
                        path: link.clone(),
                    })?;
                }
                Ok(_) => {
                    warn!(
                        "{} is occupied, leaving {} in place",
                        collapse_user(&link),
                        collapse_user(&source)
                    );
                    kept = true;
                    continue;
                }
                Err(_) => {}
            }

            move_path(&source, &link)?;
            info!("unlinked {}", collapse_user(&link));
            targets.remove(&link);
        }

        // INVARIANT: Keep tracking entries whose sources are still in the
        //   support directory.
        if !kept {
            removed.push(source_glob.clone());
        }
    }
    store.write_symlink_targets(&targets)?;

    let link_dir = store.symlink_dir().join(name);
    if link_dir.is_dir() {
        if let Err(err) = remove_dir(&link_dir) {
            warn!("cannot remove {}: {err}", collapse_user(&link_dir));
        }
    }

    Ok(removed)
}

/// Link source to target.
///
/// # Errors
///
/// - Return [`SymlinkError::SourceMissing`] if source does not exist.
/// - Return [`SymlinkError::Io`] if file system operations fail.
pub fn make_symlink(source: &Path, target: &Path, force: bool) -> Result<LinkStatus> {
    if !source.exists() {
        return Err(SymlinkError::SourceMissing {
            path: collapse_user(source),
        });
    }

    let status = match symlink_metadata(target) {
        Err(_) => {
            create_symlink(source, target)?;
            info!("symlinked {} -> {}", collapse_user(target), collapse_user(source));
            return Ok(LinkStatus::Linked);
        }
        Ok(meta) if meta.file_type().is_symlink() => {
            if points_to(target, source) {
                debug!(
                    "already linked: {} -> {}",
                    collapse_user(target),
                    collapse_user(source)
                );
                return Ok(LinkStatus::AlreadyLinked);
            }

            let actual = read_link(target)
                .map(|path| collapse_user(path))
                .unwrap_or_default();
            warn!(
                "linked to wrong target: {} -> {actual} (instead of {})",
                collapse_user(target),
                collapse_user(source)
            );
            LinkStatus::Conflict
        }
        Ok(_) => {
            warn!(
                "{} symlink target already exists at: {}",
                collapse_user(source),
                collapse_user(target)
            );
            LinkStatus::Conflict
        }
    };

    if !force {
        return Ok(status);
    }

    move_to_trash(target)?;
    make_symlink(source, target, false)
}

/// Remove links that still point inside the support directory.
///
/// # Errors
///
/// - Return [`SymlinkError::Io`] if a link cannot be removed.
pub fn remove_dead_targets(root: &Path, targets: impl IntoIterator<Item = PathBuf>) -> Result<()> {
    let canonical_root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    for target in targets {
        let is_link = symlink_metadata(&target)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            continue;
        }

        let Ok(destination) = read_link(&target) else {
            continue;
        };
        let destination = match target.parent() {
            Some(parent) if destination.is_relative() => parent.join(destination),
            _ => destination,
        };

        if destination.starts_with(root) || destination.starts_with(&canonical_root) {
            remove_file(&target).map_err(|err| SymlinkError::Io {
                source: err,
                path: target.clone(),
            })?;
            info!("removed dead symlink: {}", collapse_user(&target));
        }
    }

    Ok(())
}

/// Check if bootstrap symlink entry belongs to target name.
pub fn is_link_entry(source_glob: &str, name: &str) -> bool {
    source_glob == name
        || source_glob
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn remove_broken_link(link: &Path, support_dirs: &[PathBuf]) -> Result<()> {
    let is_link = symlink_metadata(link)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link || link.exists() {
        return Ok(());
    }

    let Ok(destination) = read_link(link) else {
        return Ok(());
    };
    if !support_dirs.iter().any(|dir| destination.starts_with(dir)) {
        return Ok(());
    }

    remove_file(link).map_err(|err| SymlinkError::Io {
        source: err,
        path: link.to_path_buf(),
    })?;
    info!("removed broken symlink: {}", collapse_user(link));

    Ok(())
}

fn move_and_link(item: &Path, source: &Path) -> Result<()> {
    move_path(item, source)?;
    if let Err(err) = create_symlink(source, item) {
        rollback_moves(&[(item.to_path_buf(), source.to_path_buf())]);
        return Err(err);
    }

    Ok(())
}

fn rollback_moves(done: &[(PathBuf, PathBuf)]) {
    for (item, source) in done.iter().rev() {
        let is_link = symlink_metadata(item)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if is_link {
            if let Err(err) = remove_file(item) {
                warn!("cannot remove {}: {err}", collapse_user(item));
                continue;
            }
        }

        match rename(source, item) {
            Ok(()) => debug!("moved {} back", collapse_user(item)),
            Err(err) => warn!(
                "cannot move {} back to {}: {err}",
                collapse_user(source),
                collapse_user(item)
            ),
        }
    }
}

fn expand_target(target: &str) -> Result<PathBuf> {
    Ok(PathBuf::from(shellexpand::full(target)?.into_owned()))
}

fn is_dir_target(target: &str) -> bool {
    target.ends_with('/') || target == "~"
}

fn link_path(source: &Path, target: &str, target_path: &Path) -> PathBuf {
    match source.file_name() {
        Some(file_name) if is_dir_target(target) => target_path.join(file_name),
        _ => target_path.to_path_buf(),
    }
}

fn expand_sources(store: &Store, source_glob: &str) -> Result<Vec<PathBuf>> {
    let symlink_dir = store.symlink_dir();
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&symlink_dir.to_string_lossy()),
        source_glob
    );

    let mut sources = Vec::new();
    for entry in glob::glob(&pattern)? {
        sources.push(entry.map_err(|err| SymlinkError::Io {
            path: err.path().to_path_buf(),
            source: err.into(),
        })?);
    }

    Ok(sources)
}

fn points_to(link: &Path, source: &Path) -> bool {
    match (fs::canonicalize(link), fs::canonicalize(source)) {
        (Ok(lhs), Ok(rhs)) => lhs == rhs,
        _ => false,
    }
}

fn shared_parent(items: &[PathBuf]) -> Result<PathBuf> {
    let mut parents = items.iter().map(|item| item.parent().map(Path::to_path_buf));
    let first = match parents.next() {
        Some(Some(parent)) => parent,
        _ => return Err(SymlinkError::NoItems),
    };

    if parents.any(|parent| parent.as_ref() != Some(&first)) {
        return Err(SymlinkError::NotSiblings);
    }

    Ok(first)
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn move_path(from: &Path, to: &Path) -> Result<()> {
    rename(from, to).map_err(|err| SymlinkError::Io {
        source: err,
        path: from.to_path_buf(),
    })
}

fn move_to_trash(target: &Path) -> Result<()> {
    let is_link = symlink_metadata(target)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if is_link {
        return remove_file(target).map_err(|err| SymlinkError::Io {
            source: err,
            path: target.to_path_buf(),
        });
    }

    let trash = home_dir()?.join(".Trash");
    mkdirp::mkdirp(&trash).map_err(|err| SymlinkError::Io {
        source: err,
        path: trash.clone(),
    })?;

    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cider-item".into());
    let mut destination = trash.join(&file_name);
    let mut suffix = 1;
    while symlink_metadata(&destination).is_ok() {
        destination = trash.join(format!("{file_name}.{suffix}"));
        suffix += 1;
    }

    move_path(target, &destination)?;
    info!("moved {} to trash", collapse_user(target));

    Ok(())
}

#[cfg(unix)]
fn create_symlink(source: &Path, target: &Path) -> Result<()> {
    std::os::unix::fs::symlink(source, target).map_err(|err| SymlinkError::Io {
        source: err,
        path: target.to_path_buf(),
    })
}

#[cfg(windows)]
fn create_symlink(source: &Path, target: &Path) -> Result<()> {
    let result = if source.is_dir() {
        std::os::windows::fs::symlink_dir(source, target)
    } else {
        std::os::windows::fs::symlink_file(source, target)
    };
    result.map_err(|err| SymlinkError::Io {
        source: err,
        path: target.to_path_buf(),
    })
}

/// Symlink management error types.
#[derive(Debug, thiserror::Error)]
pub enum SymlinkError {
    /// Link source does not exist.
    #[error("symlink source {path:?} does not exist")]
    SourceMissing { path: String },

    /// Link source already exists inside the support directory.
    #[error("symlink source {path:?} already exists")]
    SourceExists { path: String },

    /// Item to link does not exist.
    #[error("cannot link {path:?}, it does not exist")]
    ItemMissing { path: String },

    /// No items to link were given.
    #[error("no items to link")]
    NoItems,

    /// Items to link do not share a parent directory.
    #[error("all items to link must be in the same directory")]
    NotSiblings,

    /// File system operation fails.
    #[error("file system operation failed at {:?}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Source glob is invalid.
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Link target cannot be shell expanded.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Target cache cannot be accessed.
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    /// Home directory cannot be determined.
    #[error(transparent)]
    NoWayHome(#[from] crate::path::NoWayHome),
}

/// Friendly result alias :3
pub type Result<T, E = SymlinkError> = std::result::Result<T, E>;

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;

    fn store() -> anyhow::Result<Store> {
        let cwd = std::env::current_dir()?;
        Ok(Store::open(cwd.join("cider"), cwd.join("cache"))?)
    }

    fn home() -> anyhow::Result<PathBuf> {
        let home = std::env::current_dir()?.join("home");
        mkdirp::mkdirp(&home)?;
        Ok(home)
    }

    fn source(store: &Store, path: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = store.symlink_dir().join(path);
        mkdirp::mkdirp(path.parent().unwrap())?;
        fs::write(&path, content)?;
        Ok(path)
    }

    #[test_case("~/", true; "home slash")]
    #[test_case("~", true; "home")]
    #[test_case("~/.local/bin/", true; "nested dir")]
    #[test_case("~/.vimrc", false; "exact file")]
    #[test]
    fn directory_targets(target: &str, expect: bool) {
        self::assert_eq!(is_dir_target(target), expect);
    }

    #[sealed_test]
    fn relink_creates_links_and_cache() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let store = store()?;
        let vimrc = source(&store, "vim/.vimrc", "set nu")?;
        let gvimrc = source(&store, "vim/.gvimrc", "set go=")?;
        let tool = source(&store, "bin/tool", "#!/bin/sh")?;

        let symlinks = BTreeMap::from([
            ("vim/*".to_string(), "~/".to_string()),
            ("bin/tool".to_string(), "~/.local/bin/tool".to_string()),
        ]);
        relink(&store, &symlinks, false)?;

        assert_eq!(read_link(home.join(".vimrc"))?, vimrc);
        assert_eq!(read_link(home.join(".gvimrc"))?, gvimrc);
        assert_eq!(read_link(home.join(".local/bin/tool"))?, tool);
        assert_eq!(store.read_symlink_targets()?.len(), 3);

        // Relinking again is a no-op.
        relink(&store, &symlinks, false)?;
        assert_eq!(store.read_symlink_targets()?.len(), 3);

        Ok(())
    }

    #[sealed_test]
    fn relink_removes_dead_links() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let store = store()?;
        source(&store, "vim/.vimrc", "set nu")?;
        source(&store, "git/.gitconfig", "[user]")?;

        let mut symlinks = BTreeMap::from([
            ("vim/*".to_string(), "~/".to_string()),
            ("git/*".to_string(), "~/".to_string()),
        ]);
        relink(&store, &symlinks, false)?;
        assert!(home.join(".gitconfig").exists());

        symlinks.remove("git/*");
        relink(&store, &symlinks, false)?;
        assert!(symlink_metadata(home.join(".gitconfig")).is_err());
        assert!(home.join(".vimrc").exists());

        Ok(())
    }

    #[sealed_test]
    fn conflicting_target_is_kept_unless_forced() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let store = store()?;
        let vimrc = source(&store, "vim/.vimrc", "set nu")?;
        fs::write(home.join(".vimrc"), "mine")?;

        assert_eq!(make_symlink(&vimrc, &home.join(".vimrc"), false)?, LinkStatus::Conflict);
        assert_eq!(fs::read_to_string(home.join(".vimrc"))?, "mine");

        assert_eq!(make_symlink(&vimrc, &home.join(".vimrc"), true)?, LinkStatus::Linked);
        assert_eq!(read_link(home.join(".vimrc"))?, vimrc);
        assert_eq!(fs::read_to_string(home.join(".Trash/.vimrc"))?, "mine");

        Ok(())
    }

    #[sealed_test]
    fn missing_source_is_an_error() -> anyhow::Result<()> {
        let home = home()?;
        let result = make_symlink(&home.join("nope"), &home.join(".nope"), false);
        assert!(matches!(result, Err(SymlinkError::SourceMissing { .. })));
        Ok(())
    }

    #[sealed_test]
    fn add_and_remove_link() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let store = store()?;
        let config = home.join(".config");
        mkdirp::mkdirp(&config)?;
        fs::write(config.join("alacritty.toml"), "font = 12")?;
        fs::write(config.join("starship.toml"), "format = ''")?;

        let (source_glob, target) = add_link(
            &store,
            "term",
            &[config.join("alacritty.toml"), config.join("starship.toml")],
        )?;
        assert_eq!(source_glob, "term/*");
        assert_eq!(target, "~/.config/");
        assert_eq!(
            read_link(config.join("alacritty.toml"))?,
            store.symlink_dir().join("term/alacritty.toml")
        );
        assert_eq!(fs::read_to_string(config.join("starship.toml"))?, "format = ''");

        let symlinks = BTreeMap::from([(source_glob.clone(), target)]);
        let removed = remove_link(&store, "term", &symlinks)?;
        assert_eq!(removed, vec![source_glob]);
        assert!(!symlink_metadata(config.join("alacritty.toml"))?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(config.join("alacritty.toml"))?, "font = 12");
        assert!(!store.symlink_dir().join("term").exists());
        assert!(store.read_symlink_targets()?.is_empty());

        Ok(())
    }

    #[sealed_test]
    fn add_link_requires_siblings() -> anyhow::Result<()> {
        let home = home()?;
        let store = store()?;
        mkdirp::mkdirp(home.join("a"))?;
        fs::write(home.join("a/file"), "")?;
        fs::write(home.join("file2"), "")?;

        let result = add_link(&store, "mixed", &[home.join("a/file"), home.join("file2")]);
        assert!(matches!(result, Err(SymlinkError::NotSiblings)));
        assert!(home.join("a/file").is_file());

        Ok(())
    }

    #[sealed_test]
    fn relink_with_relative_root_links_absolute_sources() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let store = Store::open("dot", "cache")?;
        let vimrc = source(&store, "vim/.vimrc", "set nu")?;

        let symlinks = BTreeMap::from([("vim/*".to_string(), "~/".to_string())]);
        relink(&store, &symlinks, false)?;

        let link = home.join(".vimrc");
        assert!(read_link(&link)?.is_absolute());
        assert_eq!(fs::read_to_string(&link)?, "set nu");

        relink(&store, &symlinks, false)?;
        assert_eq!(read_link(&link)?, vimrc);

        Ok(())
    }

    #[sealed_test]
    fn relink_repairs_links_into_migrated_legacy_dir() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let legacy = home.join(".cider");
        mkdirp::mkdirp(legacy.join("symlinks/vim"))?;
        fs::write(legacy.join("symlinks/vim/.vimrc"), "set nu")?;
        std::os::unix::fs::symlink(legacy.join("symlinks/vim/.vimrc"), home.join(".vimrc"))?;

        let root = home.join(".config/cider");
        assert!(crate::store::migrate_legacy_dir(&legacy, &root)?);
        let store = Store::open(root.clone(), std::env::current_dir()?.join("cache"))?;

        let symlinks = BTreeMap::from([("vim/*".to_string(), "~/".to_string())]);
        relink(&store, &symlinks, false)?;

        assert_eq!(read_link(home.join(".vimrc"))?, root.join("symlinks/vim/.vimrc"));
        assert_eq!(fs::read_to_string(home.join(".vimrc"))?, "set nu");

        Ok(())
    }

    #[sealed_test]
    fn broken_link_outside_support_dir_is_a_conflict() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let store = store()?;
        source(&store, "vim/.vimrc", "set nu")?;
        std::os::unix::fs::symlink(home.join("elsewhere/.vimrc"), home.join(".vimrc"))?;

        let symlinks = BTreeMap::from([("vim/*".to_string(), "~/".to_string())]);
        relink(&store, &symlinks, false)?;

        assert_eq!(read_link(home.join(".vimrc"))?, home.join("elsewhere/.vimrc"));
        assert!(store.read_symlink_targets()?.is_empty());

        Ok(())
    }

    #[sealed_test]
    fn remove_link_keeps_entry_with_occupied_target() -> anyhow::Result<()> {
        let home = home()?;
        std::env::set_var("HOME", &home);
        let store = store()?;
        fs::write(home.join(".zshrc"), "setopt autocd")?;

        let (source_glob, target) = add_link(&store, "zsh", &[home.join(".zshrc")])?;
        assert_eq!(target, "~");
        remove_file(home.join(".zshrc"))?;
        fs::write(home.join(".zshrc"), "mine")?;

        let symlinks = BTreeMap::from([(source_glob, target)]);
        let removed = remove_link(&store, "zsh", &symlinks)?;

        assert!(removed.is_empty());
        assert_eq!(
            fs::read_to_string(store.symlink_dir().join("zsh/.zshrc"))?,
            "setopt autocd"
        );
        assert_eq!(fs::read_to_string(home.join(".zshrc"))?, "mine");

        Ok(())
    }

    #[sealed_test]
    fn add_link_moves_items_back_on_failure() -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let store = store()?;
        fs::write(cwd.join("notes"), "todo")?;

        // Moving the support directory into itself always fails.
        let result = add_link(&store, "mixed", &[cwd.join("notes"), store.root().to_path_buf()]);

        assert!(matches!(result, Err(SymlinkError::Io { .. })));
        assert!(!symlink_metadata(cwd.join("notes"))?.file_type().is_symlink());
        assert_eq!(fs::read_to_string(cwd.join("notes"))?, "todo");
        assert!(!store.symlink_dir().join("mixed/notes").exists());
        assert!(store.read_symlink_targets()?.is_empty());

        Ok(())
    }

    #[sealed_test]
    fn expand_sources_walks_globs() -> anyhow::Result<()> {
        let store = store()?;
        let vimrc = source(&store, "vim/.vimrc", "set nu")?;
        source(&store, "zsh/.zshrc", "setopt autocd")?;

        assert_eq!(expand_sources(&store, "vim/*")?, vec![vimrc]);
        assert!(matches!(
            expand_sources(&store, "vim/[*"),
            Err(SymlinkError::Pattern(..))
        ));

        Ok(())
    }

    #[test_case("vim/*", "vim", true; "glob")]
    #[test_case("vim", "vim", true; "exact")]
    #[test_case("vimrc/*", "vim", false; "shared prefix")]
    #[test_case("zsh/*", "vim", false; "other")]
    #[test]
    fn link_entries_by_name(source_glob: &str, name: &str, expect: bool) {
        self::assert_eq!(is_link_entry(source_glob, name), expect);
    }
}
