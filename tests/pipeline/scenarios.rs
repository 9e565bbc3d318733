use super::helpers::{two_package_tree, FixtureTree};

use npm_license_checker::{
    append_ignores_to_config, load_config, CheckerOptions, IgnoredPackage, JsonWriter,
    LicenseAllowList, LicenseChecker, LicenseInfo, LicenseOverride, PackageIgnoreList,
    ReportWriter,
};

#[test]
fn test_unknown_license_violates_allow_list() {
    let tree = two_package_tree();

    let options = CheckerOptions {
        allow: Some(LicenseAllowList::from_ids(["MIT"])),
        emit_error: true,
        ..CheckerOptions::default()
    };
    let outcome = LicenseChecker::new(options).run(&tree.dependencies()).unwrap();

    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.errors[0].identity, "pkg-b@2.0");
    assert_eq!(outcome.errors[0].license_id, "UNKNOWN");

    // The report still lists both packages, violations included.
    assert_eq!(outcome.filename, "ThirdPartyNotices.txt");
    let a = outcome.content.find("pkg-a 1.0").unwrap();
    let b = outcome.content.find("pkg-b 2.0").unwrap();
    assert!(a < b);
}

#[test]
fn test_violations_route_to_warnings_by_default() {
    let tree = two_package_tree();

    let options = CheckerOptions {
        allow: Some(LicenseAllowList::from_ids(["MIT"])),
        ..CheckerOptions::default()
    };
    let outcome = LicenseChecker::new(options).run(&tree.dependencies()).unwrap();

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].identity, "pkg-b@2.0");
}

#[test]
fn test_no_allow_list_means_no_violations() {
    let tree = two_package_tree();

    let outcome = LicenseChecker::new(CheckerOptions::default())
        .run(&tree.dependencies())
        .unwrap();

    assert!(!outcome.has_violations());
    assert!(outcome.content.contains("pkg-b 2.0"));
}

#[test]
fn test_override_changes_reported_violation() {
    let tree = two_package_tree();

    let options = CheckerOptions {
        allow: Some(LicenseAllowList::from_ids(["MIT"])),
        overrides: vec![LicenseOverride {
            name: "pkg-b".to_string(),
            version: Some("2.0".to_string()),
            license_id: "Apache-2.0".to_string(),
            author: None,
            repository: None,
        }],
        emit_error: true,
        ..CheckerOptions::default()
    };
    let outcome = LicenseChecker::new(options).run(&tree.dependencies()).unwrap();

    // Still a violation, but against the overridden identifier.
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].license_id, "Apache-2.0");
    assert!(outcome.content.contains("License: Apache-2.0"));
}

#[test]
fn test_ignored_package_disappears_entirely() {
    let tree = two_package_tree();

    let options = CheckerOptions {
        allow: Some(LicenseAllowList::from_ids(["MIT"])),
        ignore: PackageIgnoreList::Entries(vec![IgnoredPackage::named("pkg-b")]),
        emit_error: true,
        ..CheckerOptions::default()
    };
    let outcome = LicenseChecker::new(options).run(&tree.dependencies()).unwrap();

    assert!(!outcome.has_violations());
    assert!(!outcome.content.contains("pkg-b"));
    assert!(outcome.content.contains("pkg-a 1.0"));
}

#[test]
fn test_ignore_wins_over_override() {
    let tree = two_package_tree();

    let options = CheckerOptions {
        allow: Some(LicenseAllowList::from_ids(["MIT"])),
        ignore: PackageIgnoreList::Entries(vec![IgnoredPackage::named("pkg-b")]),
        overrides: vec![LicenseOverride {
            name: "pkg-b".to_string(),
            version: None,
            license_id: "Apache-2.0".to_string(),
            author: None,
            repository: None,
        }],
        emit_error: true,
        ..CheckerOptions::default()
    };
    let outcome = LicenseChecker::new(options).run(&tree.dependencies()).unwrap();

    assert!(!outcome.has_violations());
    assert!(!outcome.content.contains("pkg-b"));
}

#[test]
fn test_license_text_flows_into_notices() {
    let mut tree = FixtureTree::new();
    tree.add_package(
        "node_modules/texty",
        r#"{"name": "texty", "version": "0.1.0", "license": "ISC"}"#,
        &["index.js"],
    );
    tree.add_file(
        "node_modules/texty",
        "LICENSE",
        "ISC License\n\nPermission to use, copy, modify...\n",
    );

    let outcome = LicenseChecker::new(CheckerOptions::default())
        .run(&tree.dependencies())
        .unwrap();

    assert!(outcome.content.contains("texty 0.1.0"));
    assert!(outcome.content.contains("Permission to use, copy, modify"));
}

#[test]
fn test_json_writer_output_parses() {
    let tree = two_package_tree();

    let options = CheckerOptions {
        writer: Box::new(JsonWriter),
        output_filename: "licenses.json".to_string(),
        ..CheckerOptions::default()
    };
    let outcome = LicenseChecker::new(options).run(&tree.dependencies()).unwrap();

    assert_eq!(outcome.filename, "licenses.json");
    let packages: Vec<LicenseInfo> = serde_json::from_str(&outcome.content).unwrap();
    assert_eq!(packages.len(), 2);
    assert_eq!(packages[0].name, "pkg-a");
    assert_eq!(packages[1].name, "pkg-b");
}

#[test]
fn test_writer_failure_fails_the_run() {
    struct FailingWriter;
    impl ReportWriter for FailingWriter {
        fn write_report(&self, _packages: &[LicenseInfo]) -> anyhow::Result<String> {
            anyhow::bail!("disk full")
        }
    }

    let tree = two_package_tree();
    let options = CheckerOptions {
        writer: Box::new(FailingWriter),
        ..CheckerOptions::default()
    };

    let result = LicenseChecker::new(options).run(&tree.dependencies());
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("disk full"));
}

#[test]
fn test_config_file_drives_the_pipeline() {
    let tree = two_package_tree();
    tree.add_file(
        "",
        "license-checker.toml",
        r#"
format = "json"
output_filename = "licenses.json"
emit_error = true

[policy.allow]
exact = ["MIT"]
"#,
    );

    let options = load_config(tree.root()).unwrap().into_options();
    let outcome = LicenseChecker::new(options).run(&tree.dependencies()).unwrap();

    assert_eq!(outcome.filename, "licenses.json");
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].identity, "pkg-b@2.0");
}

#[test]
fn test_recorded_ignores_suppress_next_run() {
    let tree = two_package_tree();
    tree.add_file(
        "",
        "license-checker.toml",
        r#"
emit_error = true

[policy.allow]
exact = ["MIT"]
"#,
    );

    let first = LicenseChecker::new(load_config(tree.root()).unwrap().into_options())
        .run(&tree.dependencies())
        .unwrap();
    assert_eq!(first.errors.len(), 1);

    append_ignores_to_config(tree.root(), &first.errors).unwrap();

    let second = LicenseChecker::new(load_config(tree.root()).unwrap().into_options())
        .run(&tree.dependencies())
        .unwrap();
    assert!(!second.has_violations());
    assert!(!second.content.contains("pkg-b"));
}
