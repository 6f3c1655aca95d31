use std::collections::BTreeSet;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::policy::PathGlobs;

/// Files selected for scanning plus the non-fatal problems met on the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumeration {
    /// Repository-relative, `/`-separated, lexicographically sorted, unique
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

/// Recursively list the files under every scan path, minus exclusions.
///
/// Excluded directories are pruned without being descended. Scan paths that
/// do not exist only produce a warning: a policy may name roots that a given
/// checkout does not have.
pub fn enumerate_files(root: &Path, scan_paths: &[String], exclusions: &PathGlobs) -> Enumeration {
    let mut files = BTreeSet::new();
    let mut warnings = Vec::new();

    for scan_path in scan_paths {
        let base = root.join(scan_path);
        if !base.exists() {
            tracing::warn!(scan_path = %scan_path, "scan path does not exist");
            warnings.push(format!("scan path not found: {}", scan_path));
            continue;
        }

        let walker = WalkDir::new(&base)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| match relative_path(root, entry.path()) {
                Some(rel) => rel.is_empty() || !exclusions.matches(&rel),
                None => true,
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let location = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| scan_path.clone());
                    tracing::warn!(path = %location, error = %err, "failed to read directory entry");
                    warnings.push(format!("unreadable path {}: {}", location, err));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match relative_path(root, entry.path()) {
                Some(rel) => {
                    files.insert(rel);
                }
                None => {
                    tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 path");
                    warnings.push(format!("skipped non UTF-8 path: {}", entry.path().display()));
                }
            }
        }
    }

    tracing::debug!(files = files.len(), warnings = warnings.len(), "enumerated scan candidates");

    Enumeration {
        files: files.into_iter().collect(),
        warnings,
    }
}

/// `path` relative to `root` with `/` separators; `None` for non UTF-8 names
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            Component::ParentDir => parts.push(".."),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts.join("/"))
}
