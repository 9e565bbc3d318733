use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::PackageFilter;
use crate::license::{extract_license_info, merge_license_info, LicenseInfo, LicenseInformationMap};
use crate::resolver::{resolve_package, ResolvedPackage};

/// The file paths one build run depended on: module sources plus the
/// build's own tracked file dependencies.
///
/// Owned by a single pipeline run and filled explicitly by the host as it
/// processes modules; nothing here is shared across runs.
#[derive(Debug, Clone, Default)]
pub struct DependencySet {
    paths: BTreeSet<PathBuf>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(path.into());
    }

    pub fn extend<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.add(path);
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for DependencySet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// Resolve every dependency path to its owning package, extract license
/// information once per distinct package directory and return the
/// filtered, key-sorted map.
///
/// Paths outside any package root are skipped. Extraction runs in
/// parallel; each package's record is produced whole before it is merged,
/// so the map never holds a partially populated entry. Re-running on the
/// same path set yields the same map.
pub fn collect_license_information(
    dependencies: &DependencySet,
    filter: &PackageFilter,
) -> LicenseInformationMap {
    // One resolution per package directory, whatever the number of files
    // that led there.
    let mut distinct: BTreeMap<PathBuf, ResolvedPackage> = BTreeMap::new();
    for path in dependencies.iter() {
        if let Some(resolved) = resolve_package(path) {
            distinct
                .entry(resolved.package.directory.clone())
                .or_insert(resolved);
        }
    }

    let records: Vec<(ResolvedPackage, LicenseInfo)> = distinct
        .into_values()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|resolved| {
            let info = extract_license_info(&resolved);
            (resolved, info)
        })
        .collect();

    let mut map = LicenseInformationMap::new();
    for (resolved, info) in records {
        if !filter.accepts(&resolved.package, &info) {
            continue;
        }
        match map.entry(resolved.package.identity()) {
            indexmap::map::Entry::Occupied(mut entry) => merge_license_info(entry.get_mut(), info),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(info);
            }
        }
    }
    map.sort_keys();
    map
}
