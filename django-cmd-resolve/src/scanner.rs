//! Upward directory search for project files.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Find `file_name` in `start` or the nearest ancestor that contains it.
///
/// Walks from `start` up to the filesystem root, one component at a time,
/// and returns the path of the first regular file found.
pub fn find_upward(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "found {file_name}");
            return Some(candidate);
        }
        if !current.pop() {
            break;
        }
    }
    None
}
