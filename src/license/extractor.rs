use std::fs;
use std::path::{Path, PathBuf};

use super::{normalize_license_id, LicenseInfo, UNKNOWN_LICENSE};
use crate::resolver::{DeclaredLicense, LicenseEntry, PackageManifest, ResolvedPackage};

/// Conventional license file names, matched case-insensitively against the
/// package directory's immediate entries.
const LICENSE_FILE_NAMES: &[&str] = &[
    "LICENSE",
    "LICENSE.md",
    "LICENSE.txt",
    "LICENCE",
    "LICENCE.md",
    "LICENCE.txt",
    "COPYING",
    "COPYING.md",
    "COPYING.txt",
    "UNLICENSE",
];

/// Build the license record for one resolved package.
///
/// Total by design of the pipeline: a missing or unusable declaration
/// degrades to UNKNOWN (with whatever license text can be found on disk),
/// never an error. Extraction for distinct packages is independent, so the
/// collector may run this in parallel.
pub fn extract_license_info(resolved: &ResolvedPackage) -> LicenseInfo {
    let manifest = &resolved.manifest;
    let package = &resolved.package;

    let license_id =
        declared_license_id(manifest).unwrap_or_else(|| UNKNOWN_LICENSE.to_string());
    let license_text =
        find_license_file(&package.directory).and_then(|path| read_license_text(&path));

    LicenseInfo {
        name: package.name.clone(),
        version: package.version.clone(),
        license_id,
        license_text,
        author: manifest.author.as_ref().and_then(|a| a.display_name()),
        repository: manifest.repository.as_ref().and_then(|r| r.url()),
        source_path: package.directory.clone(),
    }
}

/// Normalized identifier from the declared `license`/`licenses` fields, or
/// `None` when nothing usable is declared.
fn declared_license_id(manifest: &PackageManifest) -> Option<String> {
    match &manifest.license {
        Some(DeclaredLicense::Id(id)) if !id.trim().is_empty() => {
            return Some(normalize_license_id(id))
        }
        Some(DeclaredLicense::Entry(entry)) => {
            if let Some(id) = entry_license_id(entry) {
                return Some(id);
            }
        }
        Some(DeclaredLicense::List(entries)) => {
            if let Some(joined) = join_license_entries(entries) {
                return Some(joined);
            }
        }
        _ => {}
    }

    // Legacy plural field.
    join_license_entries(&manifest.licenses)
}

fn entry_license_id(entry: &LicenseEntry) -> Option<String> {
    entry
        .license_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(normalize_license_id)
}

/// Multi-license declarations collapse into one `A OR B` expression.
fn join_license_entries(entries: &[LicenseEntry]) -> Option<String> {
    let ids: Vec<String> = entries.iter().filter_map(entry_license_id).collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids.join(" OR "))
    }
}

/// Shallow scan of `dir` for a conventionally named license file. The
/// first match in name order wins, so the result does not depend on the
/// directory iteration order of the platform.
pub fn find_license_file(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut found: Vec<PathBuf> = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if LICENSE_FILE_NAMES
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(&name))
            && entry.path().is_file()
        {
            found.push(entry.path());
        }
    }
    found.sort();
    found.into_iter().next()
}

fn read_license_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            eprintln!(
                "Warning: cannot read license file {}: {}",
                path.display(),
                err
            );
            None
        }
    }
}
