//! Input discovery: files, directories, and glob patterns.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::formats::strip_ono_infix;

/// Expand a CLI input argument into the documents to process.
///
/// A file is taken as-is, a directory is walked recursively for `.ono`
/// files, and anything else is treated as a glob pattern. Results come back
/// sorted so runs are deterministic.
pub fn discover_inputs(input: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(input);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.is_dir() {
        let files = walk_directory(path);
        debug!(count = files.len(), dir = %path.display(), "discovered documents");
        return Ok(files);
    }
    expand_glob(input)
}

/// Where a processed document lands: the input name with the `.ono` infix
/// dropped.
pub fn output_name(input: &Path) -> PathBuf {
    match input.file_name().and_then(|n| n.to_str()) {
        Some(name) => input.with_file_name(strip_ono_infix(name)),
        None => input.to_path_buf(),
    }
}

fn walk_directory(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_ono_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_ono_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.contains(".ono"))
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern)
        .map_err(|e| Error::Config(format!("invalid glob pattern {pattern:?}: {e}")))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::Config(format!("no inputs matched {pattern:?}")));
    }
    Ok(files)
}
