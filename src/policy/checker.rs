use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::LicenseOverride;
use super::matcher::{LicenseAllowList, PackageIgnoreList};
use crate::license::{LicenseInfo, LicenseInformationMap};
use crate::report::package_order;

/// 許可リストに合格しなかったパッケージ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    pub identity: String,
    pub license_id: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Violation {}

/// Drop every entry the ignore configuration matches. Returns a new map;
/// callers holding the input still see the pre-ignore state.
pub fn ignore_licenses(
    map: &LicenseInformationMap,
    ignore: &PackageIgnoreList,
) -> LicenseInformationMap {
    map.iter()
        .filter(|(_, info)| !ignore.ignores(&info.name, &info.version))
        .map(|(identity, info)| (identity.clone(), info.clone()))
        .collect()
}

/// Replace matching entries wholesale with their configured override.
/// Overrides naming packages absent from the map are a no-op.
pub fn override_licenses(
    map: &LicenseInformationMap,
    overrides: &[LicenseOverride],
) -> LicenseInformationMap {
    map.iter()
        .map(|(identity, info)| {
            let replaced = overrides
                .iter()
                .find(|entry| override_matches(entry, info))
                .map(|entry| apply_override(entry, info))
                .unwrap_or_else(|| info.clone());
            (identity.clone(), replaced)
        })
        .collect()
}

fn override_matches(entry: &LicenseOverride, info: &LicenseInfo) -> bool {
    entry.name == info.name
        && match entry.version.as_deref() {
            None | Some("*") => true,
            Some(wanted) => wanted == info.version,
        }
}

// Wholesale replacement: only the identity and the resolution directory
// survive from the collected record.
fn apply_override(entry: &LicenseOverride, info: &LicenseInfo) -> LicenseInfo {
    LicenseInfo {
        name: info.name.clone(),
        version: info.version.clone(),
        license_id: entry.license_id.clone(),
        license_text: None,
        author: entry.author.clone(),
        repository: entry.repository.clone(),
        source_path: info.source_path.clone(),
    }
}

/// Test every entry's final license against the allow-list.
///
/// No configured allow-list means no violations, ever. With one
/// configured, UNKNOWN fails like any other identifier the list does not
/// admit. The result is ordered like the serialized report, so diagnostic
/// output is reproducible across runs.
pub fn get_license_violations(
    map: &LicenseInformationMap,
    allow: Option<&LicenseAllowList>,
) -> Vec<Violation> {
    let Some(allow) = allow else {
        return Vec::new();
    };

    let mut failing: Vec<&LicenseInfo> = map
        .values()
        .filter(|info| !allow.allows(&info.license_id))
        .collect();
    failing.sort_by(|a, b| package_order(a, b));

    failing
        .into_iter()
        .map(|info| Violation {
            identity: info.identity(),
            license_id: info.license_id.clone(),
            message: format!(
                "Package {} uses license '{}' which is not permitted",
                info.identity(),
                info.license_id
            ),
        })
        .collect()
}
