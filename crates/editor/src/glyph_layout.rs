// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
//!
//! Text layout: byte stream to positioned glyph quads
//!
//! Coordinates are up-positive, so each newline moves the pen *down* by
//! subtracting one atlas line height from `pen.y`. A printable byte emits a
//! quad placed by the glyph's bearings relative to the pen, then advances the
//! pen by the glyph's advance.
//!
//! Laying out text and locating the caret share a single pen walker. The
//! caret query runs it without emitting anything, so the caret can never
//! drift away from the glyphs drawn for the same bytes.

use thiserror::Error;

use crate::glyph_atlas::{GlyphAtlas, GlyphMetrics};
use crate::glyph_buffer::{GlyphBatch, GlyphRecord};

// =============================================================================
// Pen state
// =============================================================================

/// The running 2D layout position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PenState {
    pub x: f32,
    pub y: f32,
    /// Where `x` returns to after a newline
    pub line_start_x: f32,
}

impl PenState {
    /// A pen at `origin` whose lines start at `origin.x`.
    pub fn at(origin: [f32; 2]) -> Self {
        Self {
            x: origin[0],
            y: origin[1],
            line_start_x: origin[0],
        }
    }

    pub fn position(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// Foreground and background colour applied to emitted glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphColors {
    pub fg: [f32; 4],
    pub bg: [f32; 4],
}

impl Default for GlyphColors {
    fn default() -> Self {
        Self {
            fg: [1.0; 4],
            bg: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// A byte outside the glyph table, with no fallback configured.
    #[error("unsupported character 0x{byte:02x} at offset {offset}")]
    UnsupportedChar { byte: u8, offset: usize },
    /// The batch filled up. `consumed` bytes were laid out; resume from `pen`
    /// after flushing.
    #[error("glyph batch full after {consumed} bytes")]
    BatchFull { consumed: usize, pen: PenState },
}

impl LayoutError {
    /// Rebases an unsupported-character offset for text that started `by`
    /// bytes into its source.
    pub fn shifted(self, by: usize) -> Self {
        match self {
            LayoutError::UnsupportedChar { byte, offset } => LayoutError::UnsupportedChar {
                byte,
                offset: offset + by,
            },
            other => other,
        }
    }
}

// =============================================================================
// GlyphLayoutEngine
// =============================================================================

/// Lays out single-byte text against a glyph atlas.
#[derive(Debug, Clone, Copy)]
pub struct GlyphLayoutEngine<'a> {
    atlas: &'a GlyphAtlas,
    fallback: Option<u8>,
}

impl<'a> GlyphLayoutEngine<'a> {
    pub fn new(atlas: &'a GlyphAtlas) -> Self {
        Self {
            atlas,
            fallback: None,
        }
    }

    /// Substitutes `fallback` for bytes the atlas has no glyph for.
    ///
    /// Ignored if the fallback itself is missing from the atlas.
    pub fn with_fallback(mut self, fallback: Option<u8>) -> Self {
        self.fallback = fallback.filter(|&b| self.atlas.get(b).is_some());
        self
    }

    pub fn atlas(&self) -> &'a GlyphAtlas {
        self.atlas
    }

    fn line_height(&self) -> f32 {
        self.atlas.height() as f32
    }

    fn lookup(&self, byte: u8, offset: usize) -> Result<&'a GlyphMetrics, LayoutError> {
        self.atlas
            .get(byte)
            .or_else(|| self.fallback.and_then(|b| self.atlas.get(b)))
            .ok_or(LayoutError::UnsupportedChar { byte, offset })
    }

    /// The one pen walker.
    ///
    /// `emit` is called for every glyph with the pen position *before* the
    /// advance. If it refuses, the walk stops in front of that glyph.
    fn walk<F>(&self, text: &[u8], mut pen: PenState, mut emit: F) -> Result<PenState, LayoutError>
    where
        F: FnMut(&GlyphMetrics, &PenState) -> bool,
    {
        let line_height = self.line_height();
        for (offset, &byte) in text.iter().enumerate() {
            if byte == b'\n' {
                pen.x = pen.line_start_x;
                pen.y -= line_height;
                continue;
            }

            let metrics = self.lookup(byte, offset)?;
            if !emit(metrics, &pen) {
                return Err(LayoutError::BatchFull {
                    consumed: offset,
                    pen,
                });
            }
            pen.x += metrics.advance_x;
            pen.y += metrics.advance_y;
        }
        Ok(pen)
    }

    /// Builds the quad for a glyph drawn at `pen`.
    pub fn glyph_record(&self, metrics: &GlyphMetrics, pen: &PenState, colors: GlyphColors) -> GlyphRecord {
        let atlas_w = self.atlas.width() as f32;
        let atlas_h = self.atlas.height() as f32;
        GlyphRecord {
            pos: [pen.x + metrics.left, pen.y + metrics.top],
            size: [metrics.width, -metrics.rows],
            uv_pos: [metrics.u_offset, 0.0],
            uv_size: [metrics.width / atlas_w, metrics.rows / atlas_h],
            fg: colors.fg,
            bg: colors.bg,
        }
    }

    /// Appends quads for `text` starting at `origin`; returns the final pen.
    pub fn layout_text(
        &self,
        text: &[u8],
        origin: [f32; 2],
        colors: GlyphColors,
        batch: &mut GlyphBatch,
    ) -> Result<PenState, LayoutError> {
        self.layout_text_from(PenState::at(origin), text, colors, batch)
    }

    /// Like [`layout_text`](Self::layout_text) but continues from an existing
    /// pen, e.g. after flushing on [`LayoutError::BatchFull`].
    pub fn layout_text_from(
        &self,
        pen: PenState,
        text: &[u8],
        colors: GlyphColors,
        batch: &mut GlyphBatch,
    ) -> Result<PenState, LayoutError> {
        self.walk(text, pen, |metrics, pen| {
            batch.push(self.glyph_record(metrics, pen, colors)).is_ok()
        })
    }

    /// Pen position after laying out `prefix` from `origin`, emitting nothing.
    pub fn cursor_pen_position_from(&self, prefix: &[u8], origin: PenState) -> Result<PenState, LayoutError> {
        self.walk(prefix, origin, |_, _| true)
    }

    /// Pen position after laying out `prefix` from (0, 0).
    pub fn cursor_pen_position(&self, prefix: &[u8]) -> Result<[f32; 2], LayoutError> {
        self.cursor_pen_position_from(prefix, PenState::default())
            .map(|pen| pen.position())
    }

    /// Widest line among `line_count` lines starting at line `line_start`.
    ///
    /// Widths are the sum of horizontal advances; the newline itself adds
    /// nothing.
    pub fn widest_line_width(
        &self,
        text: &[u8],
        line_start: usize,
        line_count: usize,
    ) -> Result<f32, LayoutError> {
        let mut offset = 0;
        let mut skipped = 0;
        while skipped < line_start {
            match text[offset..].iter().position(|&b| b == b'\n') {
                Some(i) => offset += i + 1,
                None => return Ok(0.0),
            }
            skipped += 1;
        }

        let mut widest = 0.0f32;
        let mut width = 0.0f32;
        let mut lines = 0;
        for (i, &byte) in text[offset..].iter().enumerate() {
            if lines >= line_count {
                break;
            }
            if byte == b'\n' {
                widest = widest.max(width);
                width = 0.0;
                lines += 1;
                continue;
            }
            width += self.lookup(byte, offset + i)?.advance_x;
        }
        if lines < line_count {
            widest = widest.max(width);
        }
        Ok(widest)
    }

    /// Horizontal advance of one byte.
    pub fn char_width(&self, byte: u8) -> Result<f32, LayoutError> {
        self.lookup(byte, 0).map(|m| m.advance_x)
    }

    /// Width of the caret drawn over `under`.
    ///
    /// End of buffer and newlines have no glyph of their own, so they get
    /// the width of a space.
    pub fn cursor_width(&self, under: Option<u8>) -> Result<f32, LayoutError> {
        match under {
            None | Some(b'\n') | Some(0) => self.char_width(b' '),
            Some(byte) => self.char_width(byte),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
