// Chunk: docs/chunks/text_buffer - Byte text buffer with cursor, mark and file persistence
// Chunk: docs/chunks/navigation_mode - Directory listing producer

//! TextBuffer is the main public API for text editing operations.
//!
//! It owns a [`ByteString`] and a byte cursor. Line and column are never
//! stored; they are derived from the cursor by scanning for `\n`, so they
//! cannot drift out of sync with the content.
//!
//! The line-relative motions are all composed from two primitives,
//! [`TextBuffer::move_end_of_line`] and [`TextBuffer::move_beginning_of_line`].
//! Vertical motion preserves the cursor's column, clamped to the length of
//! the destination line.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::byte_string::ByteString;
use crate::error::BufferError;
use crate::listing::{list_directory, PARENT_ENTRY};
use crate::types::{BufferMode, Position, SelectionPolicy};

/// A byte-addressed text buffer with a cursor and an optional mark.
///
/// Invariant: `0 <= cursor <= len` and, when set, `0 <= mark <= len`.
#[derive(Debug, Default)]
pub struct TextBuffer {
    content: ByteString,
    cursor: usize,
    /// Second end of the region. Order relative to the cursor is free.
    mark: Option<usize>,
    /// Path last loaded from or saved to.
    pathname: Option<PathBuf>,
    mode: BufferMode,
    policy: SelectionPolicy,
    modified: bool,
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a text buffer initialized with the given content.
    ///
    /// The cursor starts at offset 0.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Creates a text buffer holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            content: ByteString::from_bytes(bytes),
            ..Self::default()
        }
    }

    /// Sets the policy applied when editing with an active region.
    pub fn with_selection_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ==================== Accessors ====================

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the raw content.
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    /// Returns the content as a String (non-UTF-8 bytes are replaced).
    pub fn content(&self) -> String {
        self.content.to_string()
    }

    /// Returns the storage capacity currently reserved.
    pub fn capacity(&self) -> usize {
        self.content.capacity()
    }

    /// Returns the cursor's byte offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the cursor as (line, column).
    pub fn cursor_position(&self) -> Position {
        Position::new(self.cursor_row(), self.cursor_col())
    }

    /// Moves the cursor to `offset`, clamped to the buffer length.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.len());
    }

    /// Returns the byte under the cursor, or `None` at the end of the buffer.
    pub fn char_at_cursor(&self) -> Option<u8> {
        self.content.byte_at(self.cursor)
    }

    pub fn pathname(&self) -> Option<&Path> {
        self.pathname.as_deref()
    }

    pub fn set_pathname(&mut self, path: impl Into<PathBuf>) {
        self.pathname = Some(path.into());
    }

    pub fn mode(&self) -> &BufferMode {
        &self.mode
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn set_selection_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
    }

    /// Returns true if the content changed since the last load or save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    // ==================== Line Queries ====================

    /// Offset of the first byte of the line containing `offset`.
    fn line_start(&self, offset: usize) -> usize {
        self.content.rfind(b'\n', offset).map_or(0, |i| i + 1)
    }

    /// Number of `\n` bytes strictly before the cursor.
    pub fn cursor_row(&self) -> usize {
        self.content.count(b'\n', 0, self.cursor)
    }

    /// Distance from the cursor back to the start of its line.
    pub fn cursor_col(&self) -> usize {
        self.cursor - self.line_start(self.cursor)
    }

    /// Total number of `\n` bytes in the buffer.
    ///
    /// A buffer without a trailing newline has one more visible line than
    /// this count.
    pub fn line_count(&self) -> usize {
        self.content.count(b'\n', 0, self.len())
    }

    /// Returns the offset just past the `nth` occurrence of `c`.
    ///
    /// `nth == 0` yields 0 and a count past the last occurrence yields the
    /// buffer length, so with `c == b'\n'` this maps a line index to the
    /// offset where that line starts.
    pub fn nth_char_index(&self, c: u8, nth: usize) -> usize {
        if nth == 0 {
            return 0;
        }
        self.as_bytes()
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == c)
            .nth(nth - 1)
            .map_or(self.len(), |(i, _)| i + 1)
    }

    /// Offset where line `row` starts, or the buffer length past the last line.
    pub fn line_start_offset(&self, row: usize) -> usize {
        self.nth_char_index(b'\n', row)
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor right by one byte. No-op at the end.
    pub fn forward_char(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor left by one byte. No-op at the start.
    pub fn backward_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Moves the cursor onto the next `\n` (or the end of the buffer).
    pub fn move_end_of_line(&mut self) {
        self.cursor = self.content.find(b'\n', self.cursor);
    }

    /// Moves the cursor one past the previous `\n` (or to offset 0).
    pub fn move_beginning_of_line(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    /// Moves the cursor down one line, keeping its column.
    ///
    /// The column is clamped to the destination line's length. On the last
    /// line the cursor moves to the end of the buffer.
    pub fn next_line(&mut self) {
        let target_col = self.cursor_col();

        self.move_end_of_line();
        self.forward_char();

        let line_len = self.content.find(b'\n', self.cursor) - self.cursor;
        self.cursor += target_col.min(line_len);
    }

    /// Moves the cursor up one line, keeping its column.
    ///
    /// The column is clamped to the destination line's length. On the first
    /// line the cursor moves to offset 0.
    pub fn previous_line(&mut self) {
        let target_col = self.cursor_col();

        self.move_beginning_of_line();
        if self.cursor == 0 {
            return;
        }
        self.backward_char();
        let line_end = self.cursor;
        self.move_beginning_of_line();

        self.cursor += target_col.min(line_end - self.cursor);
    }

    // ==================== Mark / Region ====================

    /// Sets the mark at the cursor.
    pub fn set_mark(&mut self) {
        self.mark = Some(self.cursor);
    }

    /// Sets the mark at `offset`, clamped to the buffer length.
    pub fn set_mark_at(&mut self, offset: usize) {
        self.mark = Some(offset.min(self.len()));
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    pub fn mark(&self) -> Option<usize> {
        self.mark
    }

    /// Returns the region between mark and cursor in document order.
    ///
    /// `None` when there is no mark or the region is empty.
    pub fn region(&self) -> Option<Range<usize>> {
        let mark = self.mark?;
        let range = mark.min(self.cursor)..mark.max(self.cursor);
        if range.is_empty() {
            None
        } else {
            Some(range)
        }
    }

    /// Returns the bytes inside the region, if any.
    pub fn region_bytes(&self) -> Option<&[u8]> {
        self.region().map(|r| &self.as_bytes()[r])
    }

    /// Deletes the region and leaves the cursor at its start.
    ///
    /// Clears the mark. Returns the number of bytes removed.
    pub fn delete_region(&mut self) -> usize {
        let removed = match self.region() {
            Some(range) => {
                self.content.remove(range.start, range.len());
                self.cursor = range.start;
                self.modified = true;
                range.len()
            }
            None => 0,
        };
        self.mark = None;
        self.assert_invariants();
        removed
    }

    // ==================== Mutations ====================

    /// Splices `text` in at the cursor; the cursor ends up after it.
    ///
    /// Under [`SelectionPolicy::ReplaceRegion`] an active region is deleted
    /// first.
    pub fn insert_text(&mut self, text: &[u8]) {
        if self.policy == SelectionPolicy::ReplaceRegion && self.region().is_some() {
            self.delete_region();
        }
        if text.is_empty() {
            return;
        }

        self.content.insert(self.cursor, text);
        if let Some(mark) = self.mark.as_mut() {
            if *mark > self.cursor {
                *mark += text.len();
            }
        }
        self.cursor += text.len();
        self.modified = true;
        self.assert_invariants();
    }

    /// Convenience wrapper over [`TextBuffer::insert_text`].
    pub fn insert_str(&mut self, text: &str) {
        self.insert_text(text.as_bytes());
    }

    /// Inserts a single `\n` at the cursor.
    pub fn newline(&mut self) {
        self.insert_text(b"\n");
    }

    /// Deletes the byte before the cursor (Backspace).
    ///
    /// Returns the deleted byte, or `None` at the start of the buffer.
    /// Under [`SelectionPolicy::ReplaceRegion`] an active region is deleted
    /// instead and `None` is returned.
    pub fn delete_backward_char(&mut self) -> Option<u8> {
        if self.policy == SelectionPolicy::ReplaceRegion && self.region().is_some() {
            self.delete_region();
            return None;
        }
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.remove_byte_at_cursor()
    }

    /// Deletes the byte under the cursor (Delete key).
    ///
    /// Returns the deleted byte, or `None` at the end of the buffer.
    /// Under [`SelectionPolicy::ReplaceRegion`] an active region is deleted
    /// instead and `None` is returned.
    pub fn delete_char(&mut self) -> Option<u8> {
        if self.policy == SelectionPolicy::ReplaceRegion && self.region().is_some() {
            self.delete_region();
            return None;
        }
        self.remove_byte_at_cursor()
    }

    fn remove_byte_at_cursor(&mut self) -> Option<u8> {
        let byte = self.content.byte_at(self.cursor)?;
        self.content.remove(self.cursor, 1);
        if let Some(mark) = self.mark.as_mut() {
            if *mark > self.cursor {
                *mark -= 1;
            }
        }
        self.modified = true;
        self.assert_invariants();
        Some(byte)
    }

    // ==================== File I/O ====================

    /// Replaces the content with the file or directory at `path`.
    ///
    /// A directory produces a listing and switches the buffer into
    /// navigation mode. The cursor is reset to 0 and the mark cleared.
    /// On error the buffer is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), BufferError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| BufferError::io(path, e))?;

        let (content, mode) = if metadata.is_dir() {
            let (listing, entry_count) = list_directory(path)?;
            let mode = BufferMode::Navigation {
                directory: path.to_path_buf(),
                entry_count,
            };
            (ByteString::from_vec(listing.into_bytes()), mode)
        } else {
            let bytes = fs::read(path).map_err(|e| BufferError::io(path, e))?;
            (ByteString::from_vec(bytes), BufferMode::Text)
        };

        debug!(path = %path.display(), bytes = content.len(), navigation = mode.is_navigation(), "loaded buffer");

        self.content = content;
        self.mode = mode;
        self.cursor = 0;
        self.mark = None;
        self.pathname = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Writes the content verbatim to the buffer's pathname.
    pub fn save(&mut self) -> Result<(), BufferError> {
        let path = self.pathname.clone().ok_or(BufferError::NoPathname)?;
        self.save_as(path)
    }

    /// Writes the content verbatim to `path` and associates the buffer with it.
    ///
    /// No newline translation is done; the file is byte-identical to the
    /// buffer.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), BufferError> {
        let path = path.as_ref();
        fs::write(path, self.as_bytes()).map_err(|e| BufferError::io(path, e))?;
        debug!(path = %path.display(), bytes = self.len(), "saved buffer");

        self.pathname = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    // ==================== Navigation ====================

    /// Returns the entry name on the cursor's line.
    ///
    /// `Ok(None)` when the cursor sits on the empty line after the last entry.
    pub fn navigation_entry(&self) -> Result<Option<String>, BufferError> {
        if !self.mode.is_navigation() {
            return Err(BufferError::NotNavigation);
        }
        let start = self.line_start(self.cursor);
        let end = self.content.find(b'\n', start);
        if start == end {
            return Ok(None);
        }
        let name = String::from_utf8_lossy(&self.as_bytes()[start..end]).into_owned();
        Ok(Some(name))
    }

    /// Returns the path of the entry on the cursor's line.
    ///
    /// The `..` entry resolves to the listed directory's parent.
    pub fn navigation_target(&self) -> Result<Option<PathBuf>, BufferError> {
        let directory = match &self.mode {
            BufferMode::Navigation { directory, .. } => directory,
            BufferMode::Text => return Err(BufferError::NotNavigation),
        };
        let Some(name) = self.navigation_entry()? else {
            return Ok(None);
        };

        if name == PARENT_ENTRY {
            if directory.file_name().is_some() {
                if let Some(parent) = directory.parent() {
                    if parent.as_os_str().is_empty() {
                        return Ok(Some(PathBuf::from(".")));
                    }
                    return Ok(Some(parent.to_path_buf()));
                }
            }
        }
        Ok(Some(directory.join(name)))
    }

    // ==================== Validation ====================

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        assert!(
            self.cursor <= self.len(),
            "cursor {} past end of buffer (len {})",
            self.cursor,
            self.len()
        );
        if let Some(mark) = self.mark {
            assert!(mark <= self.len(), "mark {} past end of buffer (len {})", mark, self.len());
        }
    }

    #[cfg(not(debug_assertions))]
    fn assert_invariants(&self) {}
}
