// Chunk: docs/chunks/navigation_mode - Directory listing producer

//! Directory listings for navigation mode.
//!
//! A listing is one entry name per line, each terminated by `\n`, sorted by
//! byte order. The `.` self entry is never listed; `..` always is, so the
//! user can walk up the tree.

use std::fs;
use std::path::Path;

use crate::error::BufferError;

/// Name of the parent-directory entry.
pub const PARENT_ENTRY: &str = "..";

/// Reads `dir` and renders its listing.
///
/// Returns the listing text and the number of entries in it.
pub fn list_directory(dir: &Path) -> Result<(String, usize), BufferError> {
    let read_dir_error = |source| BufferError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = vec![PARENT_ENTRY.to_string()];
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort_unstable_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

    let entry_count = names.len();
    let mut listing = String::new();
    for name in names {
        listing.push_str(&name);
        listing.push('\n');
    }
    Ok((listing, entry_count))
}
