use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::package_identity;

pub mod extractor;

// Re-export from extractor
pub use extractor::extract_license_info;

/// Sentinel identifier for packages whose license could not be determined.
pub const UNKNOWN_LICENSE: &str = "UNKNOWN";

/// Everything the pipeline records about one package's licensing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LicenseInfo {
    pub name: String,
    pub version: String,
    pub license_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Directory the information was resolved from. Diagnostics only,
    /// never serialized into the report.
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl LicenseInfo {
    pub fn identity(&self) -> String {
        package_identity(&self.name, &self.version)
    }

    pub fn is_unknown(&self) -> bool {
        self.license_id == UNKNOWN_LICENSE
    }
}

/// Mapping from package identity to its license record. Key order carries
/// no meaning of its own; the report builder re-sorts before output.
pub type LicenseInformationMap = IndexMap<String, LicenseInfo>;

/// Fold a rediscovered record into an existing entry without losing
/// information: a known identifier never degrades back to UNKNOWN, and
/// optional fields already filled stay filled.
pub fn merge_license_info(existing: &mut LicenseInfo, incoming: LicenseInfo) {
    if existing.is_unknown() && !incoming.is_unknown() {
        existing.license_id = incoming.license_id;
    }
    if existing.license_text.is_none() {
        existing.license_text = incoming.license_text;
    }
    if existing.author.is_none() {
        existing.author = incoming.author;
    }
    if existing.repository.is_none() {
        existing.repository = incoming.repository;
    }
}

/// Normalize a declared license string to an SPDX-style identifier.
///
/// Compound expressions (`MIT OR Apache-2.0`) pass through untouched;
/// free-form prose that cannot name a license collapses to UNKNOWN;
/// anything recognizable maps onto its canonical identifier; everything
/// else is kept verbatim after whitespace cleanup.
pub fn normalize_license_id(license: &str) -> String {
    let license = license.split_whitespace().collect::<Vec<_>>().join(" ");

    if license.len() < 3 || license.starts_with("Copyright") {
        return UNKNOWN_LICENSE.to_string();
    }

    // SPDX expressions are already canonical enough; rewriting the parts
    // would change their meaning.
    if license.contains(" OR ") || license.contains(" AND ") || license.contains(" WITH ") {
        return license;
    }

    match license.as_str() {
        "MIT" | "MIT License" | "MIT license" | "Expat license" => return "MIT".to_string(),
        "Apache-2.0" | "Apache 2.0" | "Apache License 2.0" | "Apache License, Version 2.0" => {
            return "Apache-2.0".to_string()
        }
        "BSD-3-Clause" | "BSD 3-Clause" | "BSD 3-Clause License" => return "BSD-3-Clause".to_string(),
        "BSD-2-Clause" | "BSD 2-Clause" | "BSD 2-Clause License" => return "BSD-2-Clause".to_string(),
        "MPL-2.0" | "Mozilla Public License 2.0" => return "MPL-2.0".to_string(),
        "ISC" | "ISC License" => return "ISC".to_string(),
        "GPL-2.0" | "GPLv2" => return "GPL-2.0".to_string(),
        "GPL-3.0" | "GPLv3" => return "GPL-3.0".to_string(),
        "LGPL-2.1" | "LGPLv2.1" => return "LGPL-2.1".to_string(),
        "LGPL-3.0" | "LGPLv3" => return "LGPL-3.0".to_string(),
        _ => {}
    }

    let lower = license.to_lowercase();
    if lower == "mit" || lower == "mit license" {
        return "MIT".to_string();
    }
    if lower.contains("apache") && lower.contains("2") {
        return "Apache-2.0".to_string();
    }
    if lower.contains("bsd") && lower.contains("3") {
        return "BSD-3-Clause".to_string();
    }
    if lower.contains("bsd") && lower.contains("2") {
        return "BSD-2-Clause".to_string();
    }
    if lower.contains("lgpl") && lower.contains("3") {
        return "LGPL-3.0".to_string();
    }
    if lower.contains("lgpl") && lower.contains("2") {
        return "LGPL-2.1".to_string();
    }
    if lower.contains("gpl") && lower.contains("3") {
        return "GPL-3.0".to_string();
    }
    if lower.contains("gpl") && lower.contains("2") {
        return "GPL-2.0".to_string();
    }
    if lower.contains("mozilla public license") {
        return "MPL-2.0".to_string();
    }
    if lower.contains("unlicense") {
        return "Unlicense".to_string();
    }

    license
}
