// Chunk: docs/chunks/text_buffer - Byte text buffer with cursor, mark and file persistence

//! Growable byte storage for the text buffer.
//!
//! Content is single-byte-per-character, so every offset is a valid
//! character boundary. Capacity is managed explicitly rather than left to
//! `Vec`'s own policy:
//!
//! - Growth doubles from a floor of [`INITIAL_CAPACITY`] until the new
//!   content fits.
//! - After a removal the capacity halves for as long as the content uses
//!   less than half of it, but never below the floor.
//!
//! Growth only happens when the storage is full and shrinking only when it
//! is less than half full, so a run of single-byte edits cannot make the
//! two alternate.

/// Capacity floor; storage never shrinks below this.
pub const INITIAL_CAPACITY: usize = 16;

/// Owned byte sequence with doubling growth and hysteresis shrink.
#[derive(Debug, Clone, Default)]
pub struct ByteString {
    data: Vec<u8>,
    /// Logical capacity. The backing `Vec` always holds at least this much.
    capacity: usize,
}

impl ByteString {
    /// Creates an empty string with no storage allocated yet.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            capacity: 0,
        }
    }

    /// Creates a string holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut s = Self::new();
        s.insert(0, bytes);
        s
    }

    /// Takes ownership of an already-read buffer without copying it.
    pub fn from_vec(data: Vec<u8>) -> Self {
        let mut capacity = INITIAL_CAPACITY;
        while capacity < data.len() {
            capacity *= 2;
        }
        let mut data = data;
        data.reserve_exact(capacity - data.len());
        Self { data, capacity }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current logical capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the byte at `index`, or `None` past the end.
    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    /// Splices `bytes` in at `index`, shifting the tail right.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, bytes: &[u8]) {
        assert!(
            index <= self.data.len(),
            "insert index {} out of range (len {})",
            index,
            self.data.len()
        );
        self.grow(bytes.len());
        self.data.splice(index..index, bytes.iter().copied());
    }

    /// Removes `count` bytes starting at `index`, shifting the tail left.
    ///
    /// # Panics
    /// Panics if `index + count > len`.
    pub fn remove(&mut self, index: usize, count: usize) {
        assert!(
            index + count <= self.data.len(),
            "remove range {}..{} out of range (len {})",
            index,
            index + count,
            self.data.len()
        );
        self.data.drain(index..index + count);
        self.shrink();
    }

    /// Returns the offset of the first `byte` at or after `from`, or `len`
    /// when there is none.
    pub fn find(&self, byte: u8, from: usize) -> usize {
        let from = from.min(self.data.len());
        self.data[from..]
            .iter()
            .position(|&b| b == byte)
            .map_or(self.data.len(), |i| from + i)
    }

    /// Returns the offset of the last `byte` strictly before `before`.
    ///
    /// # Panics
    /// Panics if `before > len`.
    pub fn rfind(&self, byte: u8, before: usize) -> Option<usize> {
        assert!(before <= self.data.len());
        self.data[..before].iter().rposition(|&b| b == byte)
    }

    /// Counts occurrences of `byte` in `start..end`.
    pub fn count(&self, byte: u8, start: usize, end: usize) -> usize {
        assert!(start <= end && end <= self.data.len());
        self.data[start..end].iter().filter(|&&b| b == byte).count()
    }

    fn grow(&mut self, additional: usize) {
        let needed = self.data.len() + additional;
        if needed <= self.capacity {
            return;
        }
        let mut capacity = self.capacity.max(INITIAL_CAPACITY);
        while capacity < needed {
            capacity *= 2;
        }
        self.data.reserve_exact(capacity - self.data.len());
        self.capacity = capacity;
    }

    fn shrink(&mut self) {
        let before = self.capacity;
        while self.capacity > INITIAL_CAPACITY && self.data.len() < self.capacity / 2 {
            self.capacity = (self.capacity / 2).max(INITIAL_CAPACITY);
        }
        if self.capacity < before {
            self.data.shrink_to(self.capacity);
        }
    }
}

impl std::fmt::Display for ByteString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.data))
    }
}
