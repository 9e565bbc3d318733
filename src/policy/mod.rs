pub mod checker;
pub mod config;
pub mod matcher;

// Re-export main types
pub use checker::{get_license_violations, ignore_licenses, override_licenses, Violation};
pub use config::{IgnoredPackage, LicenseOverride, LicenseRule, PolicyConfig};
pub use matcher::{LicenseAllowList, PackageIgnoreList};
