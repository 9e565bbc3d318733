use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use npm_license_checker::DependencySet;

/// A throwaway project with an npm-style `node_modules` layout.
pub struct FixtureTree {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl FixtureTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            files: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Install a package at `rel_dir` with the given manifest and create
    /// the listed source files under it.
    pub fn add_package(&mut self, rel_dir: &str, manifest: &str, files: &[&str]) {
        let dir = self.dir.path().join(rel_dir);
        fs::create_dir_all(&dir).expect("Failed to create package dir");
        fs::write(dir.join("package.json"), manifest).expect("Failed to write manifest");
        for file in files {
            let path = dir.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "").unwrap();
            self.files.push(path);
        }
    }

    pub fn add_file(&self, rel_dir: &str, file_name: &str, content: &str) {
        let dir = self.dir.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file_name), content).unwrap();
    }

    /// The dependency set a build over this tree would have tracked.
    pub fn dependencies(&self) -> DependencySet {
        self.files.iter().cloned().collect()
    }
}

/// Two MIT/UNKNOWN packages, the smallest tree the policy scenarios need.
pub fn two_package_tree() -> FixtureTree {
    let mut tree = FixtureTree::new();
    tree.add_package(
        "node_modules/pkg-a",
        r#"{"name": "pkg-a", "version": "1.0", "license": "MIT"}"#,
        &["index.js"],
    );
    tree.add_package(
        "node_modules/pkg-b",
        r#"{"name": "pkg-b", "version": "2.0"}"#,
        &["index.js"],
    );
    tree
}
