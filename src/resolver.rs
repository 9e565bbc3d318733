use serde::Deserialize;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Identity of a resolved package. Every file under the same package
/// directory resolves to an equal `PackageRef`, which is what the
/// collector deduplicates on.
#[derive(Debug, Clone, Eq)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
    /// Directory holding the package manifest.
    pub directory: PathBuf,
}

impl PackageRef {
    /// Map key used throughout the pipeline: `name@version`, or the bare
    /// name when the manifest carried no version.
    pub fn identity(&self) -> String {
        package_identity(&self.name, &self.version)
    }
}

// Equality is (name, version) only. Two install locations of the same
// package release are the same package.
impl PartialEq for PackageRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Hash for PackageRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity())
    }
}

pub fn package_identity(name: &str, version: &str) -> String {
    if version.is_empty() {
        name.to_string()
    } else {
        format!("{}@{}", name, version)
    }
}

/// Inverse of [`package_identity`]. Scoped names keep their leading `@`:
/// `@scope/pkg@1.0.0` splits into `@scope/pkg` and `1.0.0`.
pub fn split_identity(identity: &str) -> (&str, Option<&str>) {
    match identity.rsplit_once('@') {
        Some((name, version)) if !name.is_empty() => (name, Some(version)),
        _ => (identity, None),
    }
}

/// The subset of `package.json` the pipeline cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub license: Option<DeclaredLicense>,
    /// Legacy plural field, an array of `{ type, url }` objects.
    #[serde(default)]
    pub licenses: Vec<LicenseEntry>,
    pub author: Option<PersonField>,
    pub repository: Option<RepositoryField>,
}

/// The `license` field as published in the wild: a plain identifier, the
/// legacy `{ type, url }` object, or an array of those.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeclaredLicense {
    Id(String),
    Entry(LicenseEntry),
    List(Vec<LicenseEntry>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LicenseEntry {
    #[serde(rename = "type")]
    pub license_type: Option<String>,
    pub url: Option<String>,
}

/// `author` (and `contributors` members) can be a free-form string or an
/// object with `name`/`email`/`url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PersonField {
    Text(String),
    Info {
        name: Option<String>,
        email: Option<String>,
        url: Option<String>,
    },
}

impl PersonField {
    pub fn display_name(&self) -> Option<String> {
        match self {
            PersonField::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(text.to_string())
                }
            }
            PersonField::Info { name, .. } => name.clone().filter(|n| !n.trim().is_empty()),
        }
    }
}

/// `repository` can be a URL string or `{ type, url }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RepositoryField {
    Url(String),
    Info {
        url: Option<String>,
        #[serde(rename = "type")]
        repository_type: Option<String>,
    },
}

impl RepositoryField {
    pub fn url(&self) -> Option<String> {
        match self {
            RepositoryField::Url(url) => Some(url.clone()),
            RepositoryField::Info { url, .. } => url.clone(),
        }
    }
}

/// A package reference together with its parsed manifest, ready for
/// license extraction.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    pub package: PackageRef,
    pub manifest: PackageManifest,
}

/// Walk upward from `path` to the nearest directory owning a parseable,
/// named package manifest.
///
/// Paths outside any package root (generated or virtual modules) resolve
/// to `None` and are skipped by the collector; resolution never fails the
/// build. A corrupt or nameless manifest does not own files either, the
/// walk simply continues into the parent directory.
pub fn resolve_package(path: &Path) -> Option<ResolvedPackage> {
    let start = if path.is_dir() { path } else { path.parent()? };

    for dir in start.ancestors() {
        let manifest_path = dir.join("package.json");
        if !manifest_path.is_file() {
            continue;
        }
        let Some(manifest) = read_manifest(&manifest_path) else {
            continue;
        };
        let Some(name) = manifest.name.clone().filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        let version = manifest.version.clone().unwrap_or_default();
        return Some(ResolvedPackage {
            package: PackageRef {
                name,
                version,
                directory: dir.to_path_buf(),
            },
            manifest,
        });
    }

    None
}

fn read_manifest(path: &Path) -> Option<PackageManifest> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            eprintln!("Warning: skipping unparseable manifest {}: {}", path.display(), err);
            None
        }
    }
}
