//! Recursive listing of YAML files below a directory

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::errors::{io_error, Result};

/// Every `*.yaml` file below `dir`, in name order, depth first
///
/// Hidden files and directories are skipped along with everything inside
/// them. `dir` itself is always walked, even when its own name is hidden.
///
/// # Errors
///
/// `Io` (tagged with `op`) if any directory below `dir` cannot be read.
pub fn yaml_files(dir: &Path, op: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            io_error(op, &path, e.into())
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|e| e == "yaml") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
