// Chunk: docs/chunks/editable_buffer - Shared input types
//!
//! Key event types consumed by the editor's key dispatch.
//!
//! These types are independent of any windowing system. A front end (or the
//! headless key-script replayer) translates its native events into
//! [`KeyEvent`]s and feeds them to the editor.

/// A keyboard event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed
    pub key: Key,
    /// Modifier keys held during the event
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a new KeyEvent with the given key and modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Creates a KeyEvent for a key with no modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::default())
    }

    /// Creates a KeyEvent for a single character with no modifiers.
    pub fn char(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }

    /// Creates a KeyEvent for a character with Control held.
    pub fn ctrl(ch: char) -> Self {
        Self::new(
            Key::Char(ch),
            Modifiers {
                control: true,
                ..Default::default()
            },
        )
    }
}

/// Modifier keys that can be held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift key
    pub shift: bool,
    /// Control key
    pub control: bool,
    /// Alt / Option key
    pub alt: bool,
}

impl Modifiers {
    /// Returns true if no modifier keys are held.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.control && !self.alt
    }

    /// Returns true if only shift is held (for uppercase letters).
    pub fn is_shift_only(&self) -> bool {
        self.shift && !self.control && !self.alt
    }

    /// Returns true if control is held without alt.
    pub fn is_control(&self) -> bool {
        self.control && !self.alt
    }
}

/// Keys that can be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character (already accounts for shift state)
    Char(char),
    /// Backspace / Delete backward
    Backspace,
    /// Forward delete
    Delete,
    /// Return / Enter
    Return,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Tab,
    Escape,
}

impl Key {
    /// Returns the byte this key types into a buffer, if it is printable ASCII.
    pub fn printable_byte(&self) -> Option<u8> {
        match *self {
            Key::Char(ch) if ch.is_ascii() && !ch.is_ascii_control() => Some(ch as u8),
            _ => None,
        }
    }
}
