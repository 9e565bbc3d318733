use glob::Pattern;
use std::fmt;

use super::config::{IgnoredPackage, LicenseRule};
use crate::resolver::package_identity;

impl LicenseRule {
    /// ライセンス識別子がこのルールにマッチするかチェック
    pub fn matches(&self, license_id: &str) -> bool {
        if self.exact.iter().any(|exact| exact == license_id) {
            return true;
        }

        for pattern_str in &self.patterns {
            if let Ok(pattern) = Pattern::new(pattern_str) {
                if pattern.matches(license_id) {
                    return true;
                }
            }
        }

        false
    }

    /// マッチした条件（完全一致またはパターン）を返す
    pub fn find_match(&self, license_id: &str) -> Option<String> {
        for exact in &self.exact {
            if exact == license_id {
                return Some(format!("exact: {}", exact));
            }
        }

        for pattern_str in &self.patterns {
            if let Ok(pattern) = Pattern::new(pattern_str) {
                if pattern.matches(license_id) {
                    return Some(format!("pattern: {}", pattern_str));
                }
            }
        }

        None
    }
}

impl IgnoredPackage {
    /// パッケージがこのエントリにマッチするかチェック
    pub fn matches(&self, name: &str, version: &str) -> bool {
        if self.is_expired() {
            return false;
        }
        if self.name != name {
            return false;
        }
        match self.version.as_deref() {
            None | Some("*") => true,
            Some(wanted) => wanted == version,
        }
    }

    /// Entries past their expiry date stop matching, so the packages they
    /// suppressed resurface as violations.
    pub fn is_expired(&self) -> bool {
        self.expires
            .map_or(false, |date| date < chrono::Utc::now().date_naive())
    }
}

/// Acceptable-license check: either a declarative rule or an arbitrary
/// predicate supplied by the host.
pub enum LicenseAllowList {
    Rule(LicenseRule),
    Predicate(Box<dyn Fn(&str) -> bool + Send + Sync>),
}

impl LicenseAllowList {
    /// Convenience constructor for a plain list of identifiers.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LicenseAllowList::Rule(LicenseRule::from_ids(ids))
    }

    pub fn allows(&self, license_id: &str) -> bool {
        match self {
            LicenseAllowList::Rule(rule) => rule.matches(license_id),
            LicenseAllowList::Predicate(test) => test(license_id),
        }
    }
}

impl fmt::Debug for LicenseAllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseAllowList::Rule(rule) => f.debug_tuple("Rule").field(rule).finish(),
            LicenseAllowList::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Packages removed from the audit before violation checking: either a
/// list of entries or a predicate over the package identity.
pub enum PackageIgnoreList {
    Entries(Vec<IgnoredPackage>),
    Predicate(Box<dyn Fn(&str) -> bool + Send + Sync>),
}

impl PackageIgnoreList {
    pub fn ignores(&self, name: &str, version: &str) -> bool {
        match self {
            PackageIgnoreList::Entries(entries) => {
                entries.iter().any(|entry| entry.matches(name, version))
            }
            PackageIgnoreList::Predicate(test) => test(&package_identity(name, version)),
        }
    }
}

impl Default for PackageIgnoreList {
    fn default() -> Self {
        PackageIgnoreList::Entries(Vec::new())
    }
}

impl fmt::Debug for PackageIgnoreList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageIgnoreList::Entries(entries) => f.debug_tuple("Entries").field(entries).finish(),
            PackageIgnoreList::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
