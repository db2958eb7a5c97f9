// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for configuration files that Cider uses to simplify
//! the process of serialization and deserialization. File I/O is left to the
//! caller to figure out.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Error as FmtError, Formatter, Result as FmtResult},
    path::Path,
    str::FromStr,
};

/// Bootstrap file layout.
///
/// The __bootstrap__ file is the manifest of everything Cider restores onto a
/// machine. At its core it is a listing of formulae and casks, but it also
/// carries taps, symlinks, custom application icons, and scripts to run
/// around a restore.
///
/// # Invariants
///
/// - List keys are kept sorted by [`Bootstrap::normalize`].
/// - Fields are declared in alphabetical order, so serialized output keeps a
///   stable key order.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Bootstrap {
    /// Shell commands to run after a restore.
    #[serde(
        rename = "after-scripts",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub after_scripts: Vec<String>,

    /// Shell commands to run before a restore.
    #[serde(
        rename = "before-scripts",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub before_scripts: Vec<String>,

    /// Casks to install.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub casks: Vec<String>,

    /// Dependencies of formulae that brew cannot express itself.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, Dependency>,

    /// Formulae to install.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub formulas: Vec<FormulaEntry>,

    /// Custom icons keyed by application name.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub icons: BTreeMap<String, String>,

    /// Symlink source globs mapped to their targets.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub symlinks: BTreeMap<String, String>,

    /// Taps to tap before installing anything.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub taps: Vec<String>,
}

impl Bootstrap {
    /// Parse bootstrap file content in target format.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Yaml`] or [`ConfigError::Json`] if content is
    ///   malformed.
    pub fn parse_as(data: &str, format: FileFormat) -> Result<Self> {
        // INVARIANT: An empty file is an empty bootstrap, not an error.
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut bootstrap: Bootstrap = match format {
            FileFormat::Yaml => serde_yaml::from_str(data)?,
            FileFormat::Json => serde_json::from_str(data)?,
            FileFormat::Text => Self::from_plain_text(data),
        };
        bootstrap.normalize();

        Ok(bootstrap)
    }

    /// Render bootstrap content in target format.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::PlainText`] if plain text cannot represent
    ///   the content.
    /// - Return [`ConfigError::Yaml`] or [`ConfigError::Json`] if
    ///   serialization fails.
    pub fn render_as(&self, format: FileFormat) -> Result<String> {
        match format {
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Json => {
                let mut out = serde_json::to_string_pretty(self)?;
                out.push('\n');
                Ok(out)
            }
            FileFormat::Text => self.to_plain_text(),
        }
    }

    /// Sort and deduplicate all list keys.
    pub fn normalize(&mut self) {
        self.taps.sort();
        self.taps.dedup();
        self.casks.sort();
        self.casks.dedup();
        self.formulas
            .sort_by(|lhs, rhs| (lhs.name(), lhs.to_string()).cmp(&(rhs.name(), rhs.to_string())));
        self.formulas.dedup();
    }

    /// Names of packages listed under `formulas` or `casks`.
    pub fn package_names(&self, kind: PackageKind) -> Vec<String> {
        match kind {
            PackageKind::Formula => self.formulas.iter().map(|f| f.name().to_string()).collect(),
            PackageKind::Cask => self.casks.clone(),
        }
    }

    /// Check if package is listed under `formulas` or `casks`.
    pub fn contains(&self, kind: PackageKind, name: &str) -> bool {
        match kind {
            PackageKind::Formula => self.formulas.iter().any(|f| f.name() == name),
            PackageKind::Cask => self.casks.iter().any(|c| c == name),
        }
    }

    /// Track package under `formulas` or `casks`.
    ///
    /// Entries whose name is already tracked are left untouched.
    pub fn insert(&mut self, kind: PackageKind, entry: impl Into<String>) {
        let entry = entry.into();
        let name = entry.split_whitespace().next().unwrap_or_default().to_string();
        if name.is_empty() || self.contains(kind, &name) {
            return;
        }

        match kind {
            PackageKind::Formula => self.formulas.push(FormulaEntry::Plain(entry)),
            PackageKind::Cask => self.casks.push(name),
        }
        self.normalize();
    }

    /// Stop tracking package under `formulas` or `casks`.
    pub fn remove(&mut self, kind: PackageKind, name: &str) {
        match kind {
            PackageKind::Formula => self.formulas.retain(|f| f.name() != name),
            PackageKind::Cask => self.casks.retain(|c| c != name),
        }
    }

    /// Casks that target formula depends on.
    pub fn cask_dependencies(&self, formula: &str) -> Vec<String> {
        self.dependencies
            .get(formula)
            .map(|dependency| {
                dependency
                    .iter()
                    .filter_map(|dep| dep.strip_prefix("cask/"))
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn from_plain_text(data: &str) -> Self {
        let formulas = data
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty())
            .map(|line| FormulaEntry::Plain(line.to_string()))
            .collect();

        Self {
            formulas,
            ..Default::default()
        }
    }

    fn to_plain_text(&self) -> Result<String> {
        let checks: [(&'static str, bool); 7] = [
            ("after-scripts", self.after_scripts.is_empty()),
            ("before-scripts", self.before_scripts.is_empty()),
            ("casks", self.casks.is_empty()),
            ("dependencies", self.dependencies.is_empty()),
            ("icons", self.icons.is_empty()),
            ("symlinks", self.symlinks.is_empty()),
            ("taps", self.taps.is_empty()),
        ];
        if let Some((key, _)) = checks.iter().find(|(_, empty)| !empty) {
            return Err(ConfigError::PlainText { key: *key });
        }

        let mut out = String::new();
        for formula in &self.formulas {
            match formula {
                FormulaEntry::Plain(entry) => out.push_str(entry),
                FormulaEntry::Detailed(spec) if spec.env.is_empty() => {
                    out.push_str(&formula.to_string())
                }
                FormulaEntry::Detailed(_) => {
                    return Err(ConfigError::PlainText { key: "formulas" })
                }
            }
            out.push('\n');
        }

        Ok(out)
    }
}

impl FromStr for Bootstrap {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Self::parse_as(data, FileFormat::Yaml)
    }
}

impl Display for Bootstrap {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.render_as(FileFormat::Yaml)?.as_str())
    }
}

/// Treat an explicit null, e.g., a key left empty by hand, like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// On-disk format of a bootstrap or defaults file.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileFormat {
    #[default]
    Yaml,

    /// Legacy format of older releases.
    Json,

    /// One formula per line.
    Text,
}

impl FileFormat {
    /// Determine format from file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("txt") => Self::Text,
            _ => Self::Yaml,
        }
    }
}

/// Kind of package Homebrew can install.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PackageKind {
    #[default]
    Formula,

    Cask,
}

impl PackageKind {
    /// Select kind based on cask flag.
    pub fn from_cask_flag(cask: bool) -> Self {
        if cask {
            Self::Cask
        } else {
            Self::Formula
        }
    }

    /// Bootstrap key that lists packages of this kind.
    pub fn bootstrap_key(&self) -> &'static str {
        match self {
            Self::Formula => "formulas",
            Self::Cask => "casks",
        }
    }
}

impl Display for PackageKind {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Formula => fmt.write_str("formula"),
            Self::Cask => fmt.write_str("cask"),
        }
    }
}

/// Formula listing in bootstrap file.
///
/// Either a plain string of the formula name followed by install options,
/// e.g., "vim --with-lua", or a detailed mapping that can also carry
/// environment variables for the install.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FormulaEntry {
    Plain(String),
    Detailed(FormulaSpec),
}

impl FormulaEntry {
    /// Name of the formula.
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(entry) => entry.split_whitespace().next().unwrap_or_default(),
            Self::Detailed(spec) => spec.name.as_str(),
        }
    }

    /// Install options passed to brew along with the name.
    pub fn options(&self) -> Vec<String> {
        match self {
            Self::Plain(entry) => entry
                .split_whitespace()
                .skip(1)
                .map(ToString::to_string)
                .collect(),
            Self::Detailed(spec) => spec.options.clone(),
        }
    }

    /// Environment variables to set for the install.
    pub fn env(&self) -> BTreeMap<String, String> {
        match self {
            Self::Plain(_) => BTreeMap::new(),
            Self::Detailed(spec) => spec.env.clone(),
        }
    }
}

impl Display for FormulaEntry {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Plain(entry) => fmt.write_str(entry),
            Self::Detailed(spec) => {
                fmt.write_str(&spec.name)?;
                for option in &spec.options {
                    write!(fmt, " {option}")?;
                }
                Ok(())
            }
        }
    }
}

/// Detailed formula listing.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct FormulaSpec {
    /// Name of the formula.
    pub name: String,

    /// Install options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Environment variables to set for the install.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

/// One or many dependencies of a formula.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Dependency {
    One(String),
    Many(Vec<String>),
}

impl Dependency {
    /// Iterate through each dependency.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let deps: Vec<&str> = match self {
            Self::One(dep) => vec![dep.as_str()],
            Self::Many(deps) => deps.iter().map(String::as_str).collect(),
        };
        deps.into_iter()
    }
}

/// Defaults file layout.
///
/// Maps a preference domain, e.g., "com.apple.finder", to the keys and
/// values that should be written into it through `defaults`.
#[derive(Default, Debug, PartialEq, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Preferences(pub BTreeMap<String, BTreeMap<String, PreferenceValue>>);

impl Preferences {
    /// Record preference value for domain key.
    pub fn set(&mut self, domain: impl Into<String>, key: impl Into<String>, value: PreferenceValue) {
        self.0
            .entry(domain.into())
            .or_default()
            .insert(key.into(), value);
    }

    /// Forget preference value for domain key.
    ///
    /// Domains left without keys are dropped.
    pub fn remove(&mut self, domain: &str, key: &str) {
        if let Some(options) = self.0.get_mut(domain) {
            options.remove(key);
            if options.is_empty() {
                self.0.remove(domain);
            }
        }
    }

    /// Iterate through every domain, key, and value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &PreferenceValue)> {
        self.0.iter().flat_map(|(domain, options)| {
            options
                .iter()
                .map(move |(key, value)| (domain.as_str(), key.as_str(), value))
        })
    }
}

impl Preferences {
    /// Parse defaults file content in target format.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Yaml`] or [`ConfigError::Json`] if content is
    ///   malformed.
    pub fn parse_as(data: &str, format: FileFormat) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        match format {
            FileFormat::Json => Ok(serde_json::from_str(data)?),
            FileFormat::Yaml | FileFormat::Text => Ok(serde_yaml::from_str(data)?),
        }
    }

    /// Render defaults file content in target format.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Yaml`] or [`ConfigError::Json`] if
    ///   serialization fails.
    pub fn render_as(&self, format: FileFormat) -> Result<String> {
        match format {
            FileFormat::Json => {
                let mut out = serde_json::to_string_pretty(self)?;
                out.push('\n');
                Ok(out)
            }
            FileFormat::Yaml | FileFormat::Text => Ok(serde_yaml::to_string(self)?),
        }
    }
}

impl FromStr for Preferences {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Self::parse_as(data, FileFormat::Yaml)
    }
}

impl Display for Preferences {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.render_as(FileFormat::Yaml)?.as_str())
    }
}

/// Typed preference value.
#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PreferenceValue {
    /// Parse preference value from text given on the command line.
    ///
    /// Recognizes "y", "yes", "n", and "no" in any case as booleans along
    /// with "true" and "false". Falls back to a string when the text is not
    /// a boolean or a number.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" => return Self::Bool(true),
            "n" | "no" | "false" => return Self::Bool(false),
            _ => {}
        }

        if let Ok(int) = text.trim().parse::<i64>() {
            return Self::Int(int);
        }

        match text.trim().parse::<f64>() {
            Ok(float) if float.is_finite() => Self::Float(float),
            _ => Self::String(text.to_string()),
        }
    }

    /// Type flag that `defaults write` expects before the value.
    pub fn type_flag(&self) -> &'static str {
        match self {
            Self::Bool(_) => "-bool",
            Self::Int(_) => "-int",
            Self::Float(_) => "-float",
            Self::String(_) => "-string",
        }
    }
}

impl Display for PreferenceValue {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Bool(value) => write!(fmt, "{value}"),
            Self::Int(value) => write!(fmt, "{value}"),
            Self::Float(value) => write!(fmt, "{value}"),
            Self::String(value) => fmt.write_str(value),
        }
    }
}

/// Settings for Cider itself.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// How to reach Homebrew.
    pub brew: BrewSettings,

    /// Restore behavior.
    pub restore: RestoreSettings,
}

impl FromStr for Settings {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut settings: Settings = toml::de::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on brew binary field.
        settings.brew.binary = shellexpand::full(settings.brew.binary.as_str())
            .map_err(ConfigError::ShellExpansion)?
            .into_owned();

        Ok(settings)
    }
}

impl Display for Settings {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(
            toml::ser::to_string_pretty(self)
                .map_err(ConfigError::Serialize)?
                .as_str(),
        )
    }
}

/// Homebrew settings.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BrewSettings {
    /// Path or name of brew binary.
    pub binary: String,
}

impl Default for BrewSettings {
    fn default() -> Self {
        Self {
            binary: "brew".into(),
        }
    }
}

/// Restore settings.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestoreSettings {
    /// Skip failed installs without asking.
    pub skip_failed: bool,
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to deserialize settings.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to serialize settings.
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),

    /// Failed to (de)serialize YAML content.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Failed to (de)serialize JSON content.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),

    /// Plain text bootstrap file cannot hold target key.
    #[error("plain text bootstrap file cannot store {key:?}, convert it to YAML first")]
    PlainText { key: &'static str },
}

impl From<ConfigError> for FmtError {
    fn from(_: ConfigError) -> Self {
        FmtError
    }
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;
    use simple_test_case::test_case;

    #[test]
    fn deserialize_bootstrap() -> anyhow::Result<()> {
        let result: Bootstrap = indoc! {r#"
            taps: [homebrew/cask-fonts]
            formulas:
              - wget
              - vim --with-lua
              - name: python
                options: [--with-tcl-tk]
                env: { HOMEBREW_NO_AUTO_UPDATE: "1" }
            casks: [xquartz, iterm2]
            dependencies:
              wine: cask/xquartz
              gimp: [cask/xquartz, libpng]
            symlinks:
              "vim/*": "~/"
            before-scripts: [./pre.sh]
        "#}
        .parse()?;

        let expect = Bootstrap {
            before_scripts: vec!["./pre.sh".into()],
            casks: vec!["iterm2".into(), "xquartz".into()],
            dependencies: BTreeMap::from([
                ("wine".into(), Dependency::One("cask/xquartz".into())),
                (
                    "gimp".into(),
                    Dependency::Many(vec!["cask/xquartz".into(), "libpng".into()]),
                ),
            ]),
            formulas: vec![
                FormulaEntry::Detailed(FormulaSpec {
                    name: "python".into(),
                    options: vec!["--with-tcl-tk".into()],
                    env: BTreeMap::from([("HOMEBREW_NO_AUTO_UPDATE".into(), "1".into())]),
                }),
                FormulaEntry::Plain("vim --with-lua".into()),
                FormulaEntry::Plain("wget".into()),
            ],
            symlinks: BTreeMap::from([("vim/*".into(), "~/".into())]),
            taps: vec!["homebrew/cask-fonts".into()],
            ..Default::default()
        };

        assert_eq!(result, expect);
        assert_eq!(result.cask_dependencies("gimp"), vec!["xquartz".to_string()]);
        assert_eq!(result.cask_dependencies("wget"), Vec::<String>::new());

        Ok(())
    }

    #[test]
    fn deserialize_bootstrap_with_empty_keys() -> anyhow::Result<()> {
        let result: Bootstrap = indoc! {r#"
            taps:
            formulas:
            casks:
              - iterm2
            symlinks:
        "#}
        .parse()?;

        let expect = Bootstrap {
            casks: vec!["iterm2".into()],
            ..Default::default()
        };
        assert_eq!(result, expect);

        let result = Bootstrap::parse_as(r#"{"formulas": null, "taps": ["user/tools"]}"#, FileFormat::Json)?;
        assert_eq!(result.taps, vec!["user/tools"]);
        assert!(result.formulas.is_empty());

        Ok(())
    }

    #[test]
    fn serialize_bootstrap() {
        let mut bootstrap = Bootstrap::default();
        bootstrap.insert(PackageKind::Formula, "wget");
        bootstrap.insert(PackageKind::Formula, "git");
        bootstrap.insert(PackageKind::Cask, "iterm2");
        bootstrap.taps.push("homebrew/cask-fonts".into());

        let expect = indoc! {r#"
            casks:
            - iterm2
            formulas:
            - git
            - wget
            taps:
            - homebrew/cask-fonts
        "#};

        assert_eq!(bootstrap.to_string(), expect);
    }

    #[test]
    fn empty_bootstrap_content_is_default() -> anyhow::Result<()> {
        let result: Bootstrap = "\n  \n".parse()?;
        assert_eq!(result, Bootstrap::default());
        Ok(())
    }

    #[test]
    fn legacy_json_bootstrap() -> anyhow::Result<()> {
        let data = indoc! {r#"
            {
                "formulas": ["wget", "git"],
                "casks": ["iterm2"]
            }
        "#};
        let result = Bootstrap::parse_as(data, FileFormat::Json)?;
        assert_eq!(result.package_names(PackageKind::Formula), vec!["git", "wget"]);
        assert_eq!(result.package_names(PackageKind::Cask), vec!["iterm2"]);

        Ok(())
    }

    #[test]
    fn plain_text_bootstrap() -> anyhow::Result<()> {
        let data = indoc! {r#"
            # command line tools
            wget
            vim --with-lua   # editor

            git
        "#};
        let mut result = Bootstrap::parse_as(data, FileFormat::Text)?;
        assert_eq!(
            result.render_as(FileFormat::Text)?,
            "git\nvim --with-lua\nwget\n"
        );

        result.taps.push("homebrew/cask-fonts".into());
        assert!(matches!(
            result.render_as(FileFormat::Text),
            Err(ConfigError::PlainText { key: "taps" })
        ));

        Ok(())
    }

    #[test]
    fn bootstrap_insert_and_remove() {
        let mut bootstrap = Bootstrap::default();
        bootstrap.insert(PackageKind::Formula, "vim --with-lua");
        bootstrap.insert(PackageKind::Formula, "vim");
        assert_eq!(bootstrap.formulas, vec![FormulaEntry::Plain("vim --with-lua".into())]);
        assert!(bootstrap.contains(PackageKind::Formula, "vim"));
        assert!(!bootstrap.contains(PackageKind::Cask, "vim"));

        bootstrap.remove(PackageKind::Formula, "vim");
        assert!(bootstrap.formulas.is_empty());
    }

    #[test_case("yes", PreferenceValue::Bool(true); "yes")]
    #[test_case("Y", PreferenceValue::Bool(true); "short yes")]
    #[test_case("NO", PreferenceValue::Bool(false); "no")]
    #[test_case("false", PreferenceValue::Bool(false); "false literal")]
    #[test_case("42", PreferenceValue::Int(42); "integer")]
    #[test_case("0.5", PreferenceValue::Float(0.5); "float")]
    #[test_case("Yesterday", PreferenceValue::String("Yesterday".into()); "string")]
    #[test]
    fn parse_preference_value(text: &str, expect: PreferenceValue) {
        self::assert_eq!(PreferenceValue::parse(text), expect);
    }

    #[test]
    fn preferences_set_and_remove() -> anyhow::Result<()> {
        let mut preferences: Preferences = indoc! {r#"
            com.apple.dock:
              autohide: true
              tilesize: 36
        "#}
        .parse()?;

        preferences.set("com.apple.finder", "AppleShowAllFiles", PreferenceValue::Bool(true));
        preferences.remove("com.apple.dock", "autohide");
        preferences.remove("com.apple.dock", "tilesize");

        let result = preferences.iter().collect::<Vec<_>>();
        let expect = vec![("com.apple.finder", "AppleShowAllFiles", &PreferenceValue::Bool(true))];
        assert_eq!(result, expect);

        Ok(())
    }

    #[sealed_test(env = [("BREW_PREFIX", "/opt/homebrew")])]
    fn deserialize_settings() -> anyhow::Result<()> {
        let result: Settings = r#"
            [brew]
            binary = "$BREW_PREFIX/bin/brew"

            [restore]
            skip_failed = true
        "#
        .parse()?;

        let expect = Settings {
            brew: BrewSettings {
                binary: "/opt/homebrew/bin/brew".into(),
            },
            restore: RestoreSettings { skip_failed: true },
        };

        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn default_settings() -> anyhow::Result<()> {
        let result: Settings = "".parse()?;
        assert_eq!(result.brew.binary, "brew");
        assert!(!result.restore.skip_failed);
        Ok(())
    }
}
