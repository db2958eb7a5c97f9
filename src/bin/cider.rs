// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use cider::{prompt::FixedPrompter, Cider, Store};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::{path::PathBuf, process::exit};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "cider [options] <command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let cider = self.global.open()?;
        match self.command {
            Command::Restore => cider.restore()?,
            Command::Install(opts) => cider.install(&opts.formulas, opts.force)?,
            Command::Rm(opts) => cider.rm(&opts.formulas, opts.uninstall)?,
            Command::Tap(opts) => run_tap(&cider, opts)?,
            Command::Untap(opts) => cider.untap(&opts.tap)?,
            Command::Installed(opts) => run_installed(&cider, opts)?,
            Command::Missing => {
                cider.list_missing()?;
            }
            Command::Relink(opts) => cider.relink(opts.force)?,
            Command::Addlink(opts) => cider.addlink(&opts.name, &opts.items)?,
            Command::Unlink(opts) => cider.unlink(&opts.name)?,
            Command::SetDefault(opts) => cider.set_default(&opts.domain, &opts.key, &opts.value)?,
            Command::RemoveDefault(opts) => cider.remove_default(&opts.domain, &opts.key)?,
            Command::ApplyDefaults => cider.apply_defaults()?,
            Command::RunScripts => cider.run_scripts()?,
            Command::SetIcon(opts) => cider.set_icon(&opts.app, &opts.icon)?,
            Command::RemoveIcon(opts) => cider.remove_icon(&opts.app)?,
            Command::ApplyIcons => cider.apply_icons()?,
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
struct GlobalOptions {
    /// Operate on casks instead of formulae.
    #[arg(long, global = true)]
    pub cask: bool,

    /// Show debug output.
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Show verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to every prompt.
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Use target support directory instead of the default one.
    #[arg(long, global = true, value_name = "path")]
    pub cider_dir: Option<PathBuf>,
}

impl GlobalOptions {
    fn open(&self) -> Result<Cider> {
        let store = Store::locate(self.cider_dir.clone())?;
        let cider = Cider::open(store)?.with_cask(self.cask);
        if self.yes {
            return Ok(cider.with_prompter(FixedPrompter(true)).with_skip_failed(true));
        }

        Ok(cider)
    }

    fn filter(&self) -> EnvFilter {
        if self.debug || self.verbose {
            return EnvFilter::new("debug");
        }

        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Install everything listed in the bootstrap file.
    #[command(override_usage = "cider restore [options]")]
    Restore,

    /// Install packages and add them to the bootstrap file.
    #[command(override_usage = "cider install [options] <formula>...")]
    Install(InstallOptions),

    /// Stop tracking packages in the bootstrap file.
    #[command(override_usage = "cider rm [options] <formula>...")]
    Rm(RmOptions),

    /// Tap and add tap to the bootstrap file, or list bootstrapped taps.
    #[command(override_usage = "cider tap [options] [tap]\n       cider tap missing")]
    Tap(TapOptions),

    /// Untap and remove tap from the bootstrap file.
    #[command(override_usage = "cider untap [options] <tap>")]
    Untap(UntapOptions),

    /// List bootstrapped packages.
    #[command(override_usage = "cider installed [options] [prefix]")]
    Installed(InstalledOptions),

    /// List installed packages missing from the bootstrap file.
    #[command(override_usage = "cider missing [options]")]
    Missing,

    /// Create symlinks listed in the bootstrap file.
    #[command(override_usage = "cider relink [options]")]
    Relink(RelinkOptions),

    /// Move items into the support directory and symlink them back.
    #[command(override_usage = "cider addlink [options] <name> <item>...")]
    Addlink(AddlinkOptions),

    /// Move linked items back out of the support directory.
    #[command(override_usage = "cider unlink [options] <name>")]
    Unlink(UnlinkOptions),

    /// Write preference and add it to the defaults file.
    #[command(override_usage = "cider set-default [options] <domain> <key> <value>")]
    SetDefault(SetDefaultOptions),

    /// Delete preference and remove it from the defaults file.
    #[command(override_usage = "cider remove-default [options] <domain> <key>")]
    RemoveDefault(RemoveDefaultOptions),

    /// Write every preference of the defaults file.
    #[command(override_usage = "cider apply-defaults [options]")]
    ApplyDefaults,

    /// Run before-scripts and after-scripts of the bootstrap file.
    #[command(override_usage = "cider run-scripts [options]")]
    RunScripts,

    /// Set application icon and add it to the bootstrap file.
    #[command(override_usage = "cider set-icon [options] <app> <icon>")]
    SetIcon(SetIconOptions),

    /// Remove application icon and remove it from the bootstrap file.
    #[command(override_usage = "cider remove-icon [options] <app>")]
    RemoveIcon(RemoveIconOptions),

    /// Set every application icon of the bootstrap file.
    #[command(override_usage = "cider apply-icons [options]")]
    ApplyIcons,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct InstallOptions {
    /// Packages to install, each optionally followed by install options.
    #[arg(required = true, value_name = "formula")]
    pub formulas: Vec<String>,

    /// Force installation.
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct RmOptions {
    /// Packages to stop tracking.
    #[arg(required = true, value_name = "formula")]
    pub formulas: Vec<String>,

    /// Uninstall packages as well.
    #[arg(short, long)]
    pub uninstall: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about, args_conflicts_with_subcommands = true)]
struct TapOptions {
    #[command(subcommand)]
    pub command: Option<TapCommand>,

    /// Tap to add.
    #[arg(value_name = "tap")]
    pub tap: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
enum TapCommand {
    /// List taps missing from the bootstrap file.
    Missing,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct UntapOptions {
    /// Tap to remove.
    #[arg(required = true, value_name = "tap")]
    pub tap: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct InstalledOptions {
    /// Only list packages starting with prefix.
    #[arg(value_name = "prefix")]
    pub prefix: Option<String>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct RelinkOptions {
    /// Replace conflicting files and symlinks.
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct AddlinkOptions {
    /// Name of symlink directory inside the support directory.
    #[arg(required = true, value_name = "name")]
    pub name: String,

    /// Files or directories to move and link back.
    #[arg(required = true, value_name = "item")]
    pub items: Vec<PathBuf>,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct UnlinkOptions {
    /// Name of symlink directory inside the support directory.
    #[arg(required = true, value_name = "name")]
    pub name: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SetDefaultOptions {
    #[arg(required = true, value_name = "domain")]
    pub domain: String,

    #[arg(required = true, value_name = "key")]
    pub key: String,

    /// Value to write, typed as bool, int, float, or string.
    #[arg(required = true, value_name = "value", allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct RemoveDefaultOptions {
    #[arg(required = true, value_name = "domain")]
    pub domain: String,

    #[arg(required = true, value_name = "key")]
    pub key: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct SetIconOptions {
    /// Application name or path.
    #[arg(required = true, value_name = "app")]
    pub app: String,

    /// Icon path or URL.
    #[arg(required = true, value_name = "icon")]
    pub icon: String,
}

#[derive(Parser, Clone, Debug)]
#[command(author, about, long_about)]
struct RemoveIconOptions {
    /// Application name or path.
    #[arg(required = true, value_name = "app")]
    pub app: String,
}

fn main() {
    let cli = Cli::parse();

    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    tracing_subscriber::registry()
        .with(layer)
        .with(cli.global.filter())
        .init();

    if let Err(error) = cli.run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run_tap(cider: &Cider, opts: TapOptions) -> Result<()> {
    match (opts.command, opts.tap) {
        (Some(TapCommand::Missing), _) => {
            cider.list_missing_taps()?;
        }
        (None, Some(tap)) => cider.tap(&tap)?,
        (None, None) => {
            for tap in cider.taps()? {
                println!("{tap}");
            }
        }
    }

    Ok(())
}

fn run_installed(cider: &Cider, opts: InstalledOptions) -> Result<()> {
    let entries = cider.installed(opts.prefix.as_deref())?;
    if entries.is_empty() {
        info!("nothing to list");
    }

    for entry in entries {
        println!("{entry}");
    }

    Ok(())
}
