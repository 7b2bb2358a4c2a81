// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout

//! The drawing seam between frame assembly and a graphics API.
//!
//! A backend receives uniforms, one cursor quad and instanced glyph batches.
//! It never sees the text; everything it draws has already been laid out.

use crate::glyph_buffer::GlyphRecord;

use super::constants::{CursorQuad, FrameUniforms};

/// Something that can draw a frame's primitives.
pub trait RenderBackend {
    /// Sets the uniforms used by the draws that follow.
    fn set_uniforms(&mut self, uniforms: &FrameUniforms);
    /// Draws the caret.
    fn draw_cursor(&mut self, cursor: &CursorQuad);
    /// Issues one instanced draw for `records`.
    fn draw_glyphs(&mut self, records: &[GlyphRecord]);
}

/// A backend that draws nothing and keeps counts.
///
/// Used by the headless binary and by tests.
#[derive(Debug, Default, Clone)]
pub struct HeadlessBackend {
    pub uniform_sets: usize,
    pub last_uniforms: Option<FrameUniforms>,
    pub cursor_draws: usize,
    pub last_cursor: Option<CursorQuad>,
    pub draw_calls: usize,
    pub glyphs_drawn: usize,
    /// Records of the most recent glyph draw
    pub last_draw: Vec<GlyphRecord>,
}

impl RenderBackend for HeadlessBackend {
    fn set_uniforms(&mut self, uniforms: &FrameUniforms) {
        self.uniform_sets += 1;
        self.last_uniforms = Some(*uniforms);
    }

    fn draw_cursor(&mut self, cursor: &CursorQuad) {
        self.cursor_draws += 1;
        self.last_cursor = Some(*cursor);
    }

    fn draw_glyphs(&mut self, records: &[GlyphRecord]) {
        self.draw_calls += 1;
        self.glyphs_drawn += records.len();
        self.last_draw.clear();
        self.last_draw.extend_from_slice(records);
    }
}
