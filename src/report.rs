use anyhow::Result;
use std::cmp::Ordering;

use crate::license::{LicenseInfo, LicenseInformationMap};

/// Report order: package name first, then version, byte-wise. Stable across
/// runs so artifacts diff cleanly under reproducible builds.
pub(crate) fn package_order(a: &LicenseInfo, b: &LicenseInfo) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version))
}

/// Deterministically ordered view of the map, ready for serialization.
pub fn get_sorted_license_information(map: &LicenseInformationMap) -> Vec<LicenseInfo> {
    let mut entries: Vec<LicenseInfo> = map.values().cloned().collect();
    entries.sort_by(package_order);
    entries
}

/// Serializer for the final report artifact. An implementation is called
/// exactly once per build run with the complete sorted sequence.
pub trait ReportWriter {
    fn write_report(&self, packages: &[LicenseInfo]) -> Result<String>;
}

/// Machine-readable report, one JSON array of package records.
#[derive(Debug, Clone, Default)]
pub struct JsonWriter;

impl ReportWriter for JsonWriter {
    fn write_report(&self, packages: &[LicenseInfo]) -> Result<String> {
        Ok(serde_json::to_string_pretty(packages)?)
    }
}

/// Third-party-notices style text report, one block per package with the
/// license text attached where it was found.
#[derive(Debug, Clone, Default)]
pub struct TextWriter;

impl ReportWriter for TextWriter {
    fn write_report(&self, packages: &[LicenseInfo]) -> Result<String> {
        let mut output = String::new();
        output.push_str("THIRD-PARTY SOFTWARE NOTICES\n");
        output.push_str(&format!(
            "This build bundles {} third-party packages.\n",
            packages.len()
        ));

        for package in packages {
            output.push_str("\n----------------------------------------\n\n");
            if package.version.is_empty() {
                output.push_str(&format!("{}\n", package.name));
            } else {
                output.push_str(&format!("{} {}\n", package.name, package.version));
            }
            output.push_str(&format!("License: {}\n", package.license_id));
            if let Some(author) = &package.author {
                output.push_str(&format!("Author: {}\n", author));
            }
            if let Some(repository) = &package.repository {
                output.push_str(&format!("Repository: {}\n", repository));
            }
            if let Some(text) = &package.license_text {
                output.push('\n');
                output.push_str(text.trim_end());
                output.push('\n');
            }
        }

        Ok(output)
    }
}

/// Hand the complete sorted sequence to the writer and return its content.
/// A writer failure is the one unrecoverable error of the pipeline and
/// propagates to the caller unchanged.
pub fn write_license_information(
    writer: &dyn ReportWriter,
    packages: &[LicenseInfo],
) -> Result<String> {
    writer.write_report(packages)
}
