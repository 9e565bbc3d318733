pub mod collector;
pub mod config;
pub mod license;
pub mod pipeline;
pub mod policy;
pub mod report;
pub mod resolver;

// Re-export main types for easy access
pub use collector::{collect_license_information, DependencySet};
pub use config::{
    append_ignores_to_config, load_config, CheckerConfig, CheckerOptions, PackageFilter,
};
pub use license::{LicenseInfo, LicenseInformationMap, UNKNOWN_LICENSE};
pub use pipeline::{AuditOutcome, LicenseChecker};
pub use policy::{
    get_license_violations, ignore_licenses, override_licenses, IgnoredPackage, LicenseAllowList,
    LicenseOverride, LicenseRule, PackageIgnoreList, PolicyConfig, Violation,
};
pub use report::{
    get_sorted_license_information, write_license_information, JsonWriter, ReportWriter, TextWriter,
};
pub use resolver::{resolve_package, PackageRef, ResolvedPackage};
