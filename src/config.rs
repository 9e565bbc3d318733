use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::license::LicenseInfo;
use crate::policy::{LicenseAllowList, LicenseOverride, PackageIgnoreList, PolicyConfig, Violation};
use crate::report::{JsonWriter, ReportWriter, TextWriter};
use crate::resolver::{split_identity, PackageRef};

/// File the checker configuration is loaded from, relative to the host
/// project root.
pub const CONFIG_FILE_NAME: &str = "license-checker.toml";

pub const DEFAULT_OUTPUT_FILENAME: &str = "ThirdPartyNotices.txt";

/// Package predicate deciding inclusion in the collected map.
pub enum PackageFilter {
    /// Default: every resolved package is audited.
    All,
    Predicate(Box<dyn Fn(&PackageRef, &LicenseInfo) -> bool + Send + Sync>),
}

impl PackageFilter {
    pub fn accepts(&self, package: &PackageRef, info: &LicenseInfo) -> bool {
        match self {
            PackageFilter::All => true,
            PackageFilter::Predicate(test) => test(package, info),
        }
    }
}

impl Default for PackageFilter {
    fn default() -> Self {
        PackageFilter::All
    }
}

impl fmt::Debug for PackageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageFilter::All => f.write_str("All"),
            PackageFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Runtime options for one audit run, supplied programmatically by the
/// host or converted from a loaded [`CheckerConfig`].
pub struct CheckerOptions {
    pub filter: PackageFilter,
    /// Absent allow-list means violations are never reported.
    pub allow: Option<LicenseAllowList>,
    pub ignore: PackageIgnoreList,
    pub overrides: Vec<LicenseOverride>,
    /// Route violations to the host's error channel instead of warnings.
    pub emit_error: bool,
    /// Name under which the host publishes the report artifact.
    pub output_filename: String,
    pub writer: Box<dyn ReportWriter + Send + Sync>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            filter: PackageFilter::All,
            allow: None,
            ignore: PackageIgnoreList::default(),
            overrides: Vec::new(),
            emit_error: false,
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            writer: Box::new(TextWriter),
        }
    }
}

/// On-disk form of the options, the `license-checker.toml` model.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CheckerConfig {
    /// Report format: "text" (default) or "json".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_error: Option<bool>,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl CheckerConfig {
    /// Runtime options equivalent to this file configuration. Predicate
    /// variants and custom writers only exist programmatically; a file
    /// always yields the declarative forms.
    pub fn into_options(self) -> CheckerOptions {
        let writer: Box<dyn ReportWriter + Send + Sync> = match self.format.as_deref() {
            Some("json") => Box::new(JsonWriter),
            _ => Box::new(TextWriter),
        };
        CheckerOptions {
            filter: PackageFilter::All,
            allow: self.policy.allow.map(LicenseAllowList::Rule),
            ignore: PackageIgnoreList::Entries(self.policy.ignore),
            overrides: self.policy.overrides,
            emit_error: self.emit_error.unwrap_or(false),
            output_filename: self
                .output_filename
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILENAME.to_string()),
            writer,
        }
    }
}

/// Load the checker configuration from `license-checker.toml` under
/// `project_dir`. A missing file yields the defaults.
pub fn load_config(project_dir: &Path) -> Result<CheckerConfig> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Ok(CheckerConfig::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let config: CheckerConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    Ok(config)
}

/// Append ignore entries for the given violations to the configuration
/// file, preserving its existing formatting. Intended for a host-side
/// "accept current findings" flow; review the reasons afterwards.
pub fn append_ignores_to_config(project_dir: &Path, violations: &[Violation]) -> Result<()> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Err(anyhow::anyhow!(
            "{} not found, create one before recording ignores",
            config_path.display()
        ));
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    if !doc.contains_key("policy") {
        doc["policy"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let policy = doc["policy"]
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("[policy] is not a table"))?;

    if !policy.contains_key("ignore") {
        policy["ignore"] = toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new());
    }
    let ignore = policy["ignore"]
        .as_array_of_tables_mut()
        .ok_or_else(|| anyhow::anyhow!("[[policy.ignore]] is not an array of tables"))?;

    for violation in violations {
        let (name, version) = split_identity(&violation.identity);
        let mut entry = toml_edit::Table::new();
        entry["name"] = toml_edit::value(name);
        if let Some(version) = version {
            entry["version"] = toml_edit::value(version);
        }
        entry["reason"] = toml_edit::value(format!(
            "accepted pending review, license '{}'",
            violation.license_id
        ));
        ignore.push(entry);
    }

    fs::write(&config_path, doc.to_string())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(())
}
