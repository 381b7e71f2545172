//! Rica file discovery
//!
//! Walks the served directory and collects the tedana outputs Rica knows how
//! to display. The listing is rebuilt on every call; nothing is cached.

use serde::Serialize;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Filename substrings of the tedana outputs Rica reads
pub const RICA_FILE_PATTERNS: &[&str] = &[
    "_metrics.tsv",
    "_mixing.tsv",
    "stat-z_components.nii.gz",
    "_mask.nii",
    "report.txt",
    "comp_",
    ".svg",
    "tedana_",
];

/// Body of `GET /api/files`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileListing {
    /// Paths relative to the served root, `/`-separated, sorted
    pub files: Vec<String>,
    /// Absolute path of the served root
    pub path: String,
    pub count: usize,
}

impl FileListing {
    pub fn build(root: &Path, patterns: &[&str]) -> Self {
        let files = find_matching_files(root, patterns);
        Self {
            count: files.len(),
            path: root.display().to_string(),
            files,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// True if any pattern is a substring of `file_name`
pub fn matches_any(file_name: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| file_name.contains(p))
}

/// Recursively collect regular files under `root` whose name matches a pattern
///
/// Unreadable entries are skipped. Symlinked directories are not descended
/// into; symlinks to regular files are listed.
pub fn find_matching_files(root: &Path, patterns: &[&str]) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter(|entry| matches_any(&entry.file_name().to_string_lossy(), patterns))
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(to_forward_slashes)
        })
        .collect();

    files.sort();
    files
}

/// Render a relative path with `/` separators on every platform
fn to_forward_slashes(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().replace('\\', "/")),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
