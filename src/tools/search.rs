//! Input file discovery for callers that pass a bare filename.
//!
//! Searches a fixed ordered list of common user directories (plus the
//! current working directory) by exact name, substring, and extension
//! patterns. All matches are returned, deduplicated and lexically sorted;
//! choosing among multiple candidates is the caller's business.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Search `dirs` for files matching `query` (or any file with one of
/// `extensions` when `query` is `None`).
pub fn find_input_files(
    query: Option<&str>,
    extensions: &[String],
    dirs: &[PathBuf],
) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();

    for dir in dirs {
        if !dir.exists() {
            continue;
        }
        for pattern in patterns_for(dir, query, extensions) {
            let Ok(entries) = glob::glob(&pattern) else {
                continue;
            };
            for path in entries.flatten() {
                if path.is_file() {
                    found.insert(path);
                }
            }
        }
    }

    let found: Vec<PathBuf> = found.into_iter().collect();
    debug!(query = query.unwrap_or("*"), matches = found.len(), "input search finished");
    found
}

fn patterns_for(dir: &Path, query: Option<&str>, extensions: &[String]) -> Vec<String> {
    let dir = dir.display();
    match query {
        Some(name) => {
            let mut patterns = vec![
                format!("{}/{}", dir, name),
                format!("{}/*{}*", dir, name),
            ];
            patterns.extend(
                extensions
                    .iter()
                    .map(|ext| format!("{}/*{}*.{}", dir, name, ext)),
            );
            patterns
        }
        None => extensions
            .iter()
            .map(|ext| format!("{}/*.{}", dir, ext))
            .collect(),
    }
}
