// Chunk: docs/chunks/text_buffer - Byte text buffer with cursor, mark and file persistence
// Chunk: docs/chunks/navigation_mode - Directory listing producer

//! lite-edit-buffer: the text buffer behind the lite-edit editor.
//!
//! The main type is [`TextBuffer`], a byte-addressed buffer with a single
//! cursor and an optional mark. Each byte is one character, so every offset
//! is a character boundary and a line is a run of bytes terminated by `\n`.
//!
//! # Example
//!
//! ```
//! use lite_edit_buffer::{Position, TextBuffer};
//!
//! let mut buffer = TextBuffer::from_str("ab\ncd\n");
//! buffer.next_line();
//! buffer.move_end_of_line();
//! buffer.previous_line();
//! buffer.insert_str("X");
//!
//! assert_eq!(buffer.content(), "abX\ncd\n");
//! assert_eq!(buffer.cursor_position(), Position::new(0, 3));
//! ```
//!
//! # Navigation mode
//!
//! Loading a directory fills the buffer with a sorted listing of its
//! entries, one per line, and puts it in [`BufferMode::Navigation`]. The
//! entry under the cursor can then be resolved with
//! [`TextBuffer::navigation_target`].

mod byte_string;
mod error;
mod listing;
mod text_buffer;
mod types;

pub use byte_string::{ByteString, INITIAL_CAPACITY};
pub use error::BufferError;
pub use listing::{list_directory, PARENT_ENTRY};
pub use text_buffer::TextBuffer;
pub use types::{BufferMode, Position, SelectionPolicy};
