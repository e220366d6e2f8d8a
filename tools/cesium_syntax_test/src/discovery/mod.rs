//! Fixture file discovery.
//!
//! Finds every fixture under a directory tree. Any file with a configured
//! extension is a fixture; files without annotations simply check nothing.

use std::fs;
use std::path::{Path, PathBuf};

/// Extension used by the Cesium fixture corpus.
pub const DEFAULT_EXTENSION: &str = "cs";

/// A discovered fixture file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureFile {
    pub path: PathBuf,
}

impl FixtureFile {
    pub fn new(path: PathBuf) -> Self {
        FixtureFile { path }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x == e))
}

/// Discover all fixtures in a directory tree, sorted by path.
pub fn discover_fixtures(root: &Path, extensions: &[String]) -> Vec<FixtureFile> {
    let mut files = Vec::new();
    discover_recursive(root, extensions, &mut files);
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

fn discover_recursive(dir: &Path, extensions: &[String], files: &mut Vec<FixtureFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "cannot read directory, skipping");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        // Hidden files and directories
        if name.starts_with('.') {
            continue;
        }

        if path.is_dir() {
            if matches!(name, "target" | "node_modules") {
                continue;
            }
            discover_recursive(&path, extensions, files);
        } else if has_extension(&path, extensions) {
            files.push(FixtureFile::new(path));
        }
    }
}

/// Discover fixtures at `path`: the file itself, or everything below a directory.
pub fn discover_fixtures_in(path: &Path, extensions: &[String]) -> Vec<FixtureFile> {
    if path.is_file() {
        if has_extension(path, extensions) {
            vec![FixtureFile::new(path.to_path_buf())]
        } else {
            vec![]
        }
    } else if path.is_dir() {
        discover_fixtures(path, extensions)
    } else {
        vec![]
    }
}
