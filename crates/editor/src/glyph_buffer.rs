// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
//!
//! Bounded glyph instance batch
//!
//! Layout appends one [`GlyphRecord`] per visible glyph. The batch has a
//! fixed capacity standing in for the GPU upload buffer; when it is full the
//! caller flushes it to the backend (one instanced draw) and carries on.
//! A full batch is reported as an error, never by panicking.

use thiserror::Error;
use tracing::debug;

use crate::renderer::RenderBackend;

/// Default number of records per batch.
pub const DEFAULT_BATCH_CAPACITY: usize = 640 * 1024;

// =============================================================================
// GlyphRecord
// =============================================================================

/// One instanced glyph quad, laid out for direct upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRecord {
    /// Quad origin in world pixels
    pub pos: [f32; 2],
    /// Quad size; height is negative because bitmaps grow downward
    pub size: [f32; 2],
    /// Atlas UV origin
    pub uv_pos: [f32; 2],
    /// Atlas UV extent
    pub uv_size: [f32; 2],
    pub fg: [f32; 4],
    pub bg: [f32; 4],
}

/// Size of one record as uploaded.
pub const GLYPH_RECORD_SIZE: usize = std::mem::size_of::<GlyphRecord>();

// =============================================================================
// GlyphBatch
// =============================================================================

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("glyph batch is full ({capacity} records)")]
pub struct BatchFull {
    pub capacity: usize,
}

/// Fixed-capacity list of pending glyph records.
#[derive(Debug)]
pub struct GlyphBatch {
    records: Vec<GlyphRecord>,
    capacity: usize,
}

impl GlyphBatch {
    /// Creates a batch holding at most `capacity` records.
    ///
    /// # Panics
    /// Panics if `capacity` is zero; a batch that can hold nothing could
    /// never make progress.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "glyph batch capacity must be positive");
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of pending records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Pending records, oldest first.
    pub fn records(&self) -> &[GlyphRecord] {
        &self.records
    }

    /// Appends a record, or reports that the batch must be flushed first.
    pub fn push(&mut self, record: GlyphRecord) -> Result<(), BatchFull> {
        if self.is_full() {
            return Err(BatchFull {
                capacity: self.capacity,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Hands the pending records to `backend` and empties the batch.
    ///
    /// Returns how many records were drawn. An empty batch issues no draw.
    pub fn flush<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let count = self.records.len();
        if count > 0 {
            backend.draw_glyphs(&self.records);
            debug!(count, "flushed glyph batch");
        }
        self.records.clear();
        count
    }

    /// Drops the pending records without drawing them.
    pub fn discard(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }
}

impl Default for GlyphBatch {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_CAPACITY)
    }
}

// =============================================================================
// Tests
// =============================================================================
