// Chunk: docs/chunks/file_persistence - Load/save errors

//! Error types for buffer persistence.
//!
//! Editing operations never fail: out-of-range offsets are programmer errors
//! and panic. Only interaction with the file system produces a `BufferError`,
//! and a failed operation leaves the buffer exactly as it was.

use std::io;
use std::path::PathBuf;

/// Errors reported by [`TextBuffer`](crate::TextBuffer) file operations.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Listing a directory failed.
    #[error("could not read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// `save` was called on a buffer that has never been associated with a path.
    #[error("buffer has no file name")]
    NoPathname,
    /// A navigation query was made on a buffer holding file text.
    #[error("buffer is not a directory listing")]
    NotNavigation,
}

impl BufferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BufferError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the underlying OS error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            BufferError::Io { source, .. } | BufferError::ReadDir { source, .. } => Some(source),
            BufferError::NoPathname | BufferError::NotNavigation => None,
        }
    }
}
