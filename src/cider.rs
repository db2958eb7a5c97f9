// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Bootstrap synchronization.
//!
//! [`Cider`] keeps the bootstrap file consistent with what is actually
//! installed on the machine. Every user-facing operation lives here, from
//! tracking new formulae to restoring an entire machine.
//!
//! # Restore
//!
//! A restore walks the bootstrap file in a fixed order:
//!
//! 1. Run before-scripts.
//! 2. Tap every missing tap.
//! 3. Install every formula, along with the casks it depends on first.
//! 4. Install remaining casks.
//! 5. Relink symlinks.
//! 6. Apply defaults and icons.
//! 7. Run after-scripts.
//!
//! Packages that are already installed and up to date are skipped, so
//! restoring twice in a row never installs anything twice. Outdated packages
//! are upgraded instead. When an install fails, the user decides whether to
//! skip it or abort the whole restore, unless the `restore.skip_failed`
//! setting makes that call ahead of time.

use crate::{
    brew::{Brew, Package, PackageManager, BUILTIN_TAPS},
    config::{Bootstrap, PackageKind, PreferenceValue, Settings},
    host::{Host, MacHost},
    prompt::{InquirePrompter, Prompter},
    store::{Store, StoreError},
    symlink,
};

use indicatif::{ProgressBar, ProgressStyle};
use std::{
    collections::{BTreeSet, HashSet},
    path::PathBuf,
};
use tracing::{debug, error, info, instrument, warn};

/// Where to get Homebrew from when it is missing.
pub const BREW_INSTALL_URL: &str = "https://brew.sh/#install";

/// Bootstrap synchronizer.
///
/// Ties the support directory together with the package manager and the
/// host, defaulting to the real `brew` binary and macOS.
pub struct Cider<P = Brew, H = MacHost>
where
    P: PackageManager,
    H: Host,
{
    store: Store,
    brew: P,
    host: H,
    prompter: Box<dyn Prompter>,
    settings: Settings,
    kind: PackageKind,
}

impl Cider {
    /// Construct new synchronizer from support directory.
    ///
    /// Reads settings from the support directory to locate brew, and asks
    /// the user through the terminal.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if settings cannot be read.
    pub fn open(store: Store) -> Result<Self> {
        let settings = store.read_settings()?;
        let brew = Brew::new(settings.brew.binary.clone());

        Ok(Self::new(store, brew, MacHost::new(), InquirePrompter::new()).with_settings(settings))
    }
}

impl<P, H> Cider<P, H>
where
    P: PackageManager,
    H: Host,
{
    /// Construct new synchronizer.
    pub fn new(store: Store, brew: P, host: H, prompter: impl Prompter + 'static) -> Self {
        Self {
            store,
            brew,
            host,
            prompter: Box::new(prompter),
            settings: Settings::default(),
            kind: PackageKind::Formula,
        }
    }

    /// Use target settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Skip failed installs during restore without asking.
    pub fn with_skip_failed(mut self, skip: bool) -> Self {
        self.settings.restore.skip_failed |= skip;
        self
    }

    /// Operate on casks instead of formulae.
    pub fn with_cask(mut self, cask: bool) -> Self {
        self.kind = PackageKind::from_cask_flag(cask);
        self
    }

    /// Answer prompts with target prompter.
    pub fn with_prompter(mut self, prompter: impl Prompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// Support directory in use.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Package manager in use.
    pub fn brew(&self) -> &P {
        &self.brew
    }

    /// Host in use.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Restore everything listed in the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::BrewMissing`] if brew cannot be found.
    /// - Return [`CiderError::Store`] if bootstrap file is missing or
    ///   malformed.
    /// - Return [`CiderError::Aborted`] if the user aborts after a failed
    ///   install.
    /// - Return other [`CiderError`] variants if scripts, taps, symlinks,
    ///   defaults, or icons fail.
    #[instrument(skip(self), level = "debug")]
    pub fn restore(&self) -> Result<()> {
        if !self.brew.is_available() {
            return Err(CiderError::BrewMissing {
                url: BREW_INSTALL_URL.into(),
            });
        }

        let bootstrap = self.store.read_bootstrap()?;
        self.run_each_script(&bootstrap.before_scripts)?;

        let taps = self.brew.taps()?;
        for tap in &bootstrap.taps {
            if taps.contains(tap) {
                debug!("already tapped {tap}");
                continue;
            }

            info!("tap {tap}");
            self.brew.tap(tap)?;
        }

        let mut state = InstallState::query(&self.brew)?;
        let mut casks = bootstrap.casks.clone();
        for formula in &bootstrap.formulas {
            for cask in bootstrap.cask_dependencies(formula.name()) {
                self.safe_install(&Package::new(PackageKind::Cask, cask.as_str()), &mut state)?;
                casks.retain(|entry| entry != &cask);
            }

            self.safe_install(&Package::from_formula(formula), &mut state)?;
        }

        for cask in casks {
            self.safe_install(&Package::new(PackageKind::Cask, cask), &mut state)?;
        }

        symlink::relink(&self.store, &bootstrap.symlinks, false)?;
        self.apply_defaults()?;
        self.apply_icons_of(&bootstrap)?;
        self.run_each_script(&bootstrap.after_scripts)?;

        Ok(())
    }

    /// Install packages through brew and add them to the bootstrap file.
    ///
    /// Each entry is a package name optionally followed by install options.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if an install fails.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn install(&self, entries: &[String], force: bool) -> Result<()> {
        for entry in entries {
            let mut tokens = entry.split_whitespace().map(ToString::to_string);
            let Some(name) = tokens.next() else {
                continue;
            };
            let package = Package {
                kind: self.kind,
                name: name.clone(),
                options: tokens.collect(),
                ..Default::default()
            };

            self.brew.install(&package, force)?;
            if self
                .store
                .edit_bootstrap(|bootstrap| bootstrap.insert(self.kind, entry.as_str()))?
            {
                info!("added {name} to bootstrap");
            } else {
                warn!("{name} already bootstrapped");
            }
        }

        Ok(())
    }

    /// Stop tracking packages in the bootstrap file.
    ///
    /// Packages stay installed unless `uninstall` is set.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if an uninstall fails.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn rm(&self, names: &[String], uninstall: bool) -> Result<()> {
        for name in names {
            if uninstall {
                self.brew.uninstall(&Package::new(self.kind, name.as_str()))?;
            }

            if self
                .store
                .edit_bootstrap(|bootstrap| bootstrap.remove(self.kind, name))?
            {
                info!("removed {name} from bootstrap");
            } else {
                error!("{name} not found in bootstrap");
            }
        }

        Ok(())
    }

    /// Tap through brew and add the tap to the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if tapping fails.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn tap(&self, tap: &str) -> Result<()> {
        self.brew.tap(tap)?;
        if self.store.edit_bootstrap(|bootstrap| {
            if !bootstrap.taps.iter().any(|entry| entry == tap) {
                bootstrap.taps.push(tap.to_string());
            }
        })? {
            info!("added {tap} tap to bootstrap");
        } else {
            warn!("{tap} tap already bootstrapped");
        }

        Ok(())
    }

    /// Untap through brew and remove the tap from the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if untapping fails.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn untap(&self, tap: &str) -> Result<()> {
        self.brew.untap(tap)?;
        if self
            .store
            .edit_bootstrap(|bootstrap| bootstrap.taps.retain(|entry| entry != tap))?
        {
            info!("removed {tap} tap from bootstrap");
        } else {
            error!("{tap} tap not found in bootstrap");
        }

        Ok(())
    }

    /// List bootstrapped taps.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if bootstrap file is malformed.
    pub fn taps(&self) -> Result<Vec<String>> {
        Ok(self.bootstrap_or_default()?.taps)
    }

    /// List bootstrapped packages whose name starts with target prefix.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if bootstrap file is missing or
    ///   malformed.
    pub fn installed(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let bootstrap = self.store.read_bootstrap()?;
        let entries = match self.kind {
            PackageKind::Formula => bootstrap
                .formulas
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            PackageKind::Cask => bootstrap.casks,
        };

        Ok(entries
            .into_iter()
            .filter(|entry| prefix.is_none_or(|prefix| entry.starts_with(prefix)))
            .collect())
    }

    /// List installed packages that the bootstrap file does not track.
    ///
    /// Formulae that a bootstrapped formula depends on are not reported.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if brew cannot be queried.
    /// - Return [`CiderError::Store`] if bootstrap file is malformed.
    #[instrument(skip(self), level = "debug")]
    pub fn missing(&self) -> Result<Vec<String>> {
        let bootstrapped = self
            .bootstrap_or_default()?
            .package_names(self.kind)
            .into_iter()
            .map(|name| short_name(&name).to_string())
            .collect::<HashSet<_>>();
        let candidates = self
            .brew
            .installed(self.kind)?
            .into_iter()
            .filter(|name| !bootstrapped.contains(name))
            .collect::<BTreeSet<_>>();

        if self.kind == PackageKind::Cask {
            return Ok(candidates.into_iter().collect());
        }

        let bar = ProgressBar::new(candidates.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{elapsed_precise:.green}  {msg:<30}  [{wide_bar:.yellow/blue}]")?
                .progress_chars("-Cco."),
        );

        let mut missing = Vec::new();
        for formula in candidates {
            bar.set_message(formula.clone());
            let uses = self.brew.uses(&formula)?;
            if !uses.iter().any(|user| bootstrapped.contains(user)) {
                missing.push(formula);
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok(missing)
    }

    /// Report missing packages and offer to track them.
    ///
    /// Returns the missing packages.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if brew cannot be queried.
    /// - Return [`CiderError::Prompt`] if the user cannot be asked.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    pub fn list_missing(&self) -> Result<Vec<String>> {
        let missing = self.missing()?;
        let what = match self.kind {
            PackageKind::Formula => "formula",
            PackageKind::Cask => "cask",
        };
        self.offer_to_track(&missing, what, |bootstrap, name| {
            bootstrap.insert(self.kind, name)
        })?;

        Ok(missing)
    }

    /// List taps that the bootstrap file does not track.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if brew cannot be queried.
    /// - Return [`CiderError::Store`] if bootstrap file is malformed.
    #[instrument(skip(self), level = "debug")]
    pub fn missing_taps(&self) -> Result<Vec<String>> {
        let bootstrapped = self.bootstrap_or_default()?.taps;
        let mut missing = self
            .brew
            .taps()?
            .into_iter()
            .filter(|tap| !BUILTIN_TAPS.contains(&tap.as_str()))
            .filter(|tap| !bootstrapped.contains(tap))
            .collect::<Vec<_>>();
        missing.sort();

        Ok(missing)
    }

    /// Report missing taps and offer to track them.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Brew`] if brew cannot be queried.
    /// - Return [`CiderError::Prompt`] if the user cannot be asked.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    pub fn list_missing_taps(&self) -> Result<Vec<String>> {
        let missing = self.missing_taps()?;
        self.offer_to_track(&missing, "tap", |bootstrap, tap| {
            if !bootstrap.taps.iter().any(|entry| entry == tap) {
                bootstrap.taps.push(tap.to_string());
            }
        })?;

        Ok(missing)
    }

    /// Create every symlink listed in the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if bootstrap file is missing or
    ///   malformed.
    /// - Return [`CiderError::Symlink`] if linking fails.
    pub fn relink(&self, force: bool) -> Result<()> {
        let bootstrap = self.store.read_bootstrap()?;
        symlink::relink(&self.store, &bootstrap.symlinks, force)?;
        Ok(())
    }

    /// Move items into the support directory, link them back, and record
    /// the link in the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Symlink`] if moving or linking fails.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn addlink(&self, name: &str, items: &[PathBuf]) -> Result<()> {
        let (source_glob, target) = symlink::add_link(&self.store, name, items)?;
        self.store.edit_bootstrap(|bootstrap| {
            bootstrap.symlinks.insert(source_glob.clone(), target.clone());
        })?;
        info!("added symlink {source_glob} -> {target} to bootstrap");

        Ok(())
    }

    /// Move linked items back out of the support directory, and drop the
    /// link from the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if bootstrap file is missing, malformed,
    ///   or cannot be modified.
    /// - Return [`CiderError::Symlink`] if moving files back fails.
    #[instrument(skip(self), level = "debug")]
    pub fn unlink(&self, name: &str) -> Result<()> {
        let bootstrap = self.store.read_bootstrap()?;
        let entries = bootstrap
            .symlinks
            .keys()
            .filter(|source_glob| symlink::is_link_entry(source_glob, name))
            .count();
        if entries == 0 {
            warn!("no symlink named {name} in bootstrap");
            return Ok(());
        }

        let removed = symlink::remove_link(&self.store, name, &bootstrap.symlinks)?;
        self.store.edit_bootstrap(|bootstrap| {
            for source_glob in &removed {
                bootstrap.symlinks.remove(source_glob);
            }
        })?;

        if removed.len() < entries {
            warn!("kept symlink {name} in bootstrap, some files could not be moved back");
        } else {
            info!("removed symlink {name} from bootstrap");
        }

        Ok(())
    }

    /// Write preference through `defaults` and record it in the defaults
    /// file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Host`] if the preference cannot be written.
    /// - Return [`CiderError::Store`] if defaults file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn set_default(&self, domain: &str, key: &str, value: &str) -> Result<()> {
        let value = PreferenceValue::parse(value);
        self.host.write_default(domain, key, &value)?;
        if self
            .store
            .edit_preferences(|preferences| preferences.set(domain, key, value.clone()))?
        {
            info!("updated defaults");
        }

        Ok(())
    }

    /// Delete preference through `defaults` and drop it from the defaults
    /// file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Host`] if the preference cannot be deleted.
    /// - Return [`CiderError::Store`] if defaults file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn remove_default(&self, domain: &str, key: &str) -> Result<()> {
        self.host.delete_default(domain, key)?;
        if self
            .store
            .edit_preferences(|preferences| preferences.remove(domain, key))?
        {
            info!("updated defaults");
        }

        Ok(())
    }

    /// Write every preference of the defaults file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if defaults file is malformed.
    /// - Return [`CiderError::Host`] if a preference cannot be written.
    pub fn apply_defaults(&self) -> Result<()> {
        let preferences = self.store.read_preferences()?;
        for (domain, key, value) in preferences.iter() {
            self.host.write_default(domain, key, value)?;
        }
        info!("applied defaults");

        Ok(())
    }

    /// Run before-scripts and after-scripts of the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if bootstrap file is missing or
    ///   malformed.
    /// - Return [`CiderError::Host`] if a script fails.
    pub fn run_scripts(&self) -> Result<()> {
        let bootstrap = self.store.read_bootstrap()?;
        self.run_each_script(&bootstrap.before_scripts)?;
        self.run_each_script(&bootstrap.after_scripts)?;
        Ok(())
    }

    /// Set custom icon of application and record it in the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::AppMissing`] if application cannot be found.
    /// - Return [`CiderError::Host`] if the icon cannot be set.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn set_icon(&self, app: &str, icon: &str) -> Result<()> {
        let app_path = self.app_path(app)?;
        self.host.set_icon(&app_path, icon)?;
        self.store.edit_bootstrap(|bootstrap| {
            bootstrap.icons.insert(app.to_string(), icon.to_string());
        })?;
        info!("set icon of {app}");

        Ok(())
    }

    /// Remove custom icon of application and drop it from the bootstrap
    /// file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::AppMissing`] if application cannot be found.
    /// - Return [`CiderError::Host`] if the icon cannot be removed.
    /// - Return [`CiderError::Store`] if bootstrap file cannot be modified.
    #[instrument(skip(self), level = "debug")]
    pub fn remove_icon(&self, app: &str) -> Result<()> {
        let app_path = self.app_path(app)?;
        self.store.edit_bootstrap(|bootstrap| {
            bootstrap.icons.remove(app);
        })?;
        self.host.remove_icon(&app_path)?;
        info!("removed icon of {app}");

        Ok(())
    }

    /// Apply every custom icon of the bootstrap file.
    ///
    /// # Errors
    ///
    /// - Return [`CiderError::Store`] if bootstrap file is missing or
    ///   malformed.
    /// - Return [`CiderError::Host`] if an icon cannot be set.
    pub fn apply_icons(&self) -> Result<()> {
        let bootstrap = self.store.read_bootstrap()?;
        self.apply_icons_of(&bootstrap)
    }

    fn apply_icons_of(&self, bootstrap: &Bootstrap) -> Result<()> {
        for (app, icon) in &bootstrap.icons {
            match self.host.app_path(app) {
                Some(app_path) => self.host.set_icon(&app_path, icon)?,
                None => warn!("application not found: {app:?}, skipping its icon"),
            }
        }
        info!("applied icons");

        Ok(())
    }

    fn app_path(&self, app: &str) -> Result<PathBuf> {
        self.host.app_path(app).ok_or_else(|| CiderError::AppMissing {
            app: app.to_string(),
        })
    }

    fn run_each_script(&self, scripts: &[String]) -> Result<()> {
        for script in scripts {
            self.host.run_script(script, self.store.root())?;
        }

        Ok(())
    }

    fn bootstrap_or_default(&self) -> Result<Bootstrap> {
        match self.store.read_bootstrap() {
            Ok(bootstrap) => Ok(bootstrap),
            Err(StoreError::BootstrapMissing { .. }) => Ok(Bootstrap::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn offer_to_track<E>(&self, missing: &[String], what: &str, editor: E) -> Result<()>
    where
        E: Fn(&mut Bootstrap, &str),
    {
        if missing.is_empty() {
            info!("everything up to date");
            return Ok(());
        }

        let plural = if missing.len() == 1 { "" } else { "s" };
        warn!(
            "{} missing {what}{plural} (tip: try `brew uses --installed` to see what's using it)",
            missing.len()
        );
        for name in missing {
            println!("{name}");
        }

        if !self
            .prompter
            .confirm("Add missing items to bootstrap?", false)?
        {
            return Ok(());
        }

        self.store.edit_bootstrap(|bootstrap| {
            for name in missing {
                editor(bootstrap, name);
            }
        })?;
        info!("added {} {what}{plural} to bootstrap", missing.len());

        Ok(())
    }

    fn safe_install(&self, package: &Package, state: &mut InstallState) -> Result<()> {
        let name = short_name(&package.name).to_string();
        let result = if state.is_installed(package.kind, &name) {
            if !state.is_outdated(package.kind, &name) {
                debug!("{name} already installed");
                return Ok(());
            }

            info!("upgrade {} {name}", package.kind);
            self.brew.upgrade(package)
        } else {
            info!("install {} {name}", package.kind);
            self.brew.install(package, false)
        };

        match result {
            Ok(()) => {
                state.mark_current(package.kind, &name);
                Ok(())
            }
            Err(err) => {
                warn!("failed to install {name}: {err}");
                if self.settings.restore.skip_failed {
                    warn!("skipping {name}");
                    return Ok(());
                }

                let skip = self
                    .prompter
                    .confirm(&format!("Failed to install {name}. Skip it and continue?"), false)?;
                if skip {
                    return Ok(());
                }

                Err(CiderError::Aborted { name })
            }
        }
    }
}

/// Installed and outdated packages at the start of a restore.
#[derive(Debug, Default)]
struct InstallState {
    installed: HashSet<(PackageKind, String)>,
    outdated: HashSet<(PackageKind, String)>,
}

impl InstallState {
    fn query(brew: &impl PackageManager) -> Result<Self> {
        let mut state = Self::default();
        for kind in [PackageKind::Formula, PackageKind::Cask] {
            state
                .installed
                .extend(brew.installed(kind)?.into_iter().map(|name| (kind, name)));
            state
                .outdated
                .extend(brew.outdated(kind)?.into_iter().map(|name| (kind, name)));
        }

        Ok(state)
    }

    fn is_installed(&self, kind: PackageKind, name: &str) -> bool {
        self.installed.contains(&(kind, name.to_string()))
    }

    fn is_outdated(&self, kind: PackageKind, name: &str) -> bool {
        self.outdated.contains(&(kind, name.to_string()))
    }

    fn mark_current(&mut self, kind: PackageKind, name: &str) {
        self.installed.insert((kind, name.to_string()));
        self.outdated.remove(&(kind, name.to_string()));
    }
}

/// Name of package without its tap, e.g., "user/repo/foo" becomes "foo".
fn short_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// All possible error types of bootstrap synchronization.
#[derive(Debug, thiserror::Error)]
pub enum CiderError {
    /// Brew cannot be found.
    #[error("Homebrew not installed, see {url}")]
    BrewMissing { url: String },

    /// Application cannot be found.
    #[error("application not found: {app:?}")]
    AppMissing { app: String },

    /// User aborted after a failed install.
    #[error("restore aborted after {name} failed to install")]
    Aborted { name: String },

    /// Support directory interaction fails.
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    /// Package manager call fails.
    #[error(transparent)]
    Brew(#[from] crate::brew::BrewError),

    /// Host configuration fails.
    #[error(transparent)]
    Host(#[from] crate::host::HostError),

    /// Symlink management fails.
    #[error(transparent)]
    Symlink(#[from] crate::symlink::SymlinkError),

    /// User cannot be asked.
    #[error(transparent)]
    Prompt(#[from] crate::prompt::PromptError),

    /// Style template cannot be set for progress bars.
    #[error(transparent)]
    IndicatifStyleTemplate(#[from] indicatif::style::TemplateError),
}

/// Friendly result alias :3
pub type Result<T, E = CiderError> = std::result::Result<T, E>;
