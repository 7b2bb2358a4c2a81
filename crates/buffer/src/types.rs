// Chunk: docs/chunks/text_buffer - Byte text buffer with cursor, mark and file persistence

use std::path::PathBuf;

/// Position in the buffer as (line, column) where both are 0-indexed.
///
/// Derived from the byte cursor on demand; the buffer never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// What the buffer content currently represents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BufferMode {
    /// Ordinary file text.
    #[default]
    Text,
    /// A listing of `directory`, one entry per line.
    Navigation {
        directory: PathBuf,
        entry_count: usize,
    },
}

impl BufferMode {
    pub fn is_navigation(&self) -> bool {
        matches!(self, BufferMode::Navigation { .. })
    }
}

/// How insertions and deletions treat an active mark/cursor region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Edits apply at the cursor; the region is left alone.
    #[default]
    InsertAtCursor,
    /// An active region is deleted before inserting, and single-byte
    /// deletions remove the region instead.
    ReplaceRegion,
}
