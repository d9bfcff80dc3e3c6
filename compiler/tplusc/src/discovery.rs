//! Template discovery for `tplus build`.

use std::fs;
use std::path::{Path, PathBuf};

/// All templates under `root`, as paths relative to it, sorted.
///
/// Hidden files and directories are skipped.
pub fn discover_templates(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    discover_recursive(root, root, &mut found);
    found.sort();
    found
}

fn discover_recursive(root: &Path, dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            discover_recursive(root, &path, found);
        } else if let Ok(relative) = path.strip_prefix(root) {
            found.push(relative.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests;
