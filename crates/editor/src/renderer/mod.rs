// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
// Chunk: docs/chunks/viewport_rendering - Camera follow + visible line window
// Chunk: docs/chunks/renderer_decomposition - Module decomposition
//!
//! Frame assembly
//!
//! Each frame the renderer:
//! 1. Advances the camera toward the cursor of the displayed buffer
//! 2. Sets the uniforms and draws the cursor box
//! 3. Lays out only the visible window of lines and flushes the batch
//! 4. If a prompt is open, draws the prompt label and minibuffer text
//!    pinned to the bottom-left corner at the minimum zoom
//!
//! Laying out a window starts from the pen position reached by replaying
//! every byte in front of it, so partial layout lines up exactly with a
//! full layout of the buffer.
//!
//! ## Module Organization
//!
//! - `constants` - Color constants and uniform types
//! - `backend` - The `RenderBackend` trait and a headless implementation

mod backend;
mod constants;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{trace, warn};

use crate::editor_state::Editor;
use crate::glyph_atlas::GlyphAtlas;
use crate::glyph_buffer::{GlyphBatch, DEFAULT_BATCH_CAPACITY};
use crate::glyph_layout::{GlyphColors, GlyphLayoutEngine, LayoutError, PenState};
use crate::viewport::{Camera, CameraSettings};

pub use backend::{HeadlessBackend, RenderBackend};
pub use constants::{
    CursorQuad, FrameUniforms, CURSOR_COLOR, MINIBUFFER_MARGIN, TEXT_BACKGROUND, TEXT_COLOR,
};

// =============================================================================
// Settings and results
// =============================================================================

/// What to do when the glyph batch fills up mid-frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Draw what is pending and keep laying out into the emptied batch
    #[default]
    FlushAndContinue,
    /// Drop the pending records and fail the frame
    RejectFrame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    pub batch_capacity: usize,
    pub overflow: OverflowPolicy,
    pub camera: CameraSettings,
    pub colors: GlyphColors,
    /// Glyph drawn for bytes missing from the atlas
    pub fallback: Option<u8>,
    pub resolution: [f32; 2],
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            overflow: OverflowPolicy::default(),
            camera: CameraSettings::default(),
            colors: GlyphColors {
                fg: TEXT_COLOR,
                bg: TEXT_BACKGROUND,
            },
            fallback: None,
            resolution: [800.0, 600.0],
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// The frame needed more than one batch and the policy forbids flushing.
    #[error("frame needs more than {capacity} glyphs")]
    BatchOverflow { capacity: usize },
}

/// Counters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Glyph records drawn
    pub glyphs: usize,
    /// Instanced draw calls issued
    pub flushes: usize,
    /// First and last buffer line laid out
    pub first_line: usize,
    pub last_line: usize,
}

// =============================================================================
// FrameRenderer
// =============================================================================

pub struct FrameRenderer {
    atlas: GlyphAtlas,
    batch: GlyphBatch,
    camera: Camera,
    overflow: OverflowPolicy,
    colors: GlyphColors,
    fallback: Option<u8>,
    resolution: [f32; 2],
    /// Cursor offset seen on the previous frame
    last_cursor: Option<usize>,
    cursor_moved_at: f32,
}

impl FrameRenderer {
    pub fn new(atlas: GlyphAtlas, settings: RendererSettings) -> Self {
        Self {
            atlas,
            batch: GlyphBatch::new(settings.batch_capacity),
            camera: Camera::new(settings.camera),
            overflow: settings.overflow,
            colors: settings.colors,
            fallback: settings.fallback,
            resolution: settings.resolution,
            last_cursor: None,
            cursor_moved_at: 0.0,
        }
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn resolution(&self) -> [f32; 2] {
        self.resolution
    }

    /// Updates the screen size, e.g. after a window resize.
    pub fn set_resolution(&mut self, resolution: [f32; 2]) {
        self.resolution = resolution;
    }

    /// Time at which the cursor last moved.
    pub fn cursor_moved_at(&self) -> f32 {
        self.cursor_moved_at
    }

    /// Renders one frame of `editor`.
    ///
    /// `dt` is the time since the previous frame and `time` the time since
    /// start, both in seconds. On error nothing is left pending in the batch.
    pub fn render<B: RenderBackend + ?Sized>(
        &mut self,
        editor: &Editor,
        backend: &mut B,
        dt: f32,
        time: f32,
    ) -> Result<FrameStats, RenderError> {
        let result = self.render_frame(editor, backend, dt, time);
        if result.is_err() {
            self.batch.discard();
        }
        result
    }

    fn render_frame<B: RenderBackend + ?Sized>(
        &mut self,
        editor: &Editor,
        backend: &mut B,
        dt: f32,
        time: f32,
    ) -> Result<FrameStats, RenderError> {
        let document = editor.document();
        if self.last_cursor != Some(document.cursor()) {
            self.last_cursor = Some(document.cursor());
            self.cursor_moved_at = time;
        }

        let engine = GlyphLayoutEngine::new(&self.atlas).with_fallback(self.fallback);
        let (window, cursor) = self.camera.update(dt, &engine, document, self.resolution)?;

        let uniforms = FrameUniforms {
            time,
            scale: self.camera.scale(),
            camera: self.camera.position(),
            resolution: self.resolution,
            cursor_moved_at: self.cursor_moved_at,
        };
        backend.set_uniforms(&uniforms);
        backend.draw_cursor(&CursorQuad {
            pos: cursor.pos,
            size: cursor.size,
            color: CURSOR_COLOR,
        });

        let mut pass = TextPass {
            engine,
            batch: &mut self.batch,
            backend,
            overflow: self.overflow,
            colors: self.colors,
            stats: FrameStats {
                first_line: window.first_line,
                last_line: window.last_line,
                ..FrameStats::default()
            },
        };

        // Main view: only the lines that can be on screen
        let bytes = document.as_bytes();
        let pen = engine.cursor_pen_position_from(&bytes[..window.bytes.start], PenState::default())?;
        pass.text(pen, &bytes[window.bytes.clone()], window.bytes.start)?;
        pass.flush();

        // Prompt overlay, fixed to the screen rather than the world
        if let Some(prompt) = editor.prompt() {
            let min_scale = self.camera.settings().min_scale;
            pass.backend.set_uniforms(&FrameUniforms {
                scale: min_scale,
                camera: [0.0, 0.0],
                ..uniforms
            });
            let origin = [
                -self.resolution[0] / (2.0 * min_scale) + MINIBUFFER_MARGIN,
                -self.resolution[1] / (2.0 * min_scale) + MINIBUFFER_MARGIN,
            ];
            let pen = pass.text(PenState::at(origin), prompt.label().as_bytes(), 0)?;
            pass.text(pen, editor.minibuffer().as_bytes(), 0)?;
            pass.flush();
        }

        trace!(
            glyphs = pass.stats.glyphs,
            flushes = pass.stats.flushes,
            "frame rendered"
        );
        Ok(pass.stats)
    }
}

/// Layout into the batch with the overflow policy applied.
struct TextPass<'a, 'e, B: RenderBackend + ?Sized> {
    engine: GlyphLayoutEngine<'e>,
    batch: &'a mut GlyphBatch,
    backend: &'a mut B,
    overflow: OverflowPolicy,
    colors: GlyphColors,
    stats: FrameStats,
}

impl<B: RenderBackend + ?Sized> TextPass<'_, '_, B> {
    /// Lays out `text`, which starts at offset `base` of its source. Error
    /// offsets are reported relative to the source.
    fn text(
        &mut self,
        mut pen: PenState,
        mut text: &[u8],
        mut base: usize,
    ) -> Result<PenState, RenderError> {
        loop {
            match self.engine.layout_text_from(pen, text, self.colors, self.batch) {
                Ok(end) => return Ok(end),
                Err(LayoutError::BatchFull { consumed, pen: resume }) => match self.overflow {
                    OverflowPolicy::FlushAndContinue => {
                        self.flush();
                        text = &text[consumed..];
                        base += consumed;
                        pen = resume;
                    }
                    OverflowPolicy::RejectFrame => {
                        let dropped = self.batch.discard();
                        let capacity = self.batch.capacity();
                        warn!(dropped, capacity, "glyph batch overflow, frame rejected");
                        return Err(RenderError::BatchOverflow { capacity });
                    }
                },
                Err(e) => return Err(e.shifted(base).into()),
            }
        }
    }

    fn flush(&mut self) {
        let drawn = self.batch.flush(&mut *self.backend);
        if drawn > 0 {
            self.stats.glyphs += drawn;
            self.stats.flushes += 1;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{CellMetrics, FixedCellRasterizer};
    use lite_edit_input::{Key, KeyEvent};

    fn renderer(settings: RendererSettings) -> FrameRenderer {
        let atlas = GlyphAtlas::build(&mut FixedCellRasterizer::new(CellMetrics::default())).unwrap();
        FrameRenderer::new(atlas, settings)
    }

    fn editor_with(text: &str) -> Editor {
        let mut editor = Editor::default();
        for ch in text.chars() {
            let event = if ch == '\n' {
                KeyEvent::plain(Key::Return)
            } else {
                KeyEvent::char(ch)
            };
            editor.handle_key(&event).unwrap();
        }
        editor
    }

    #[test]
    fn test_frame_draws_cursor_and_text() {
        let mut renderer = renderer(RendererSettings::default());
        let editor = editor_with("hello");
        let mut backend = HeadlessBackend::default();

        let stats = renderer.render(&editor, &mut backend, 0.016, 1.0).unwrap();
        assert_eq!(stats.glyphs, 5);
        assert_eq!(stats.flushes, 1);
        assert_eq!(backend.cursor_draws, 1);
        assert_eq!(backend.uniform_sets, 1);
        assert_eq!(backend.last_cursor.unwrap().pos, [40.0, -4.0]);
    }

    #[test]
    fn test_cursor_moved_at_tracks_motion() {
        let mut renderer = renderer(RendererSettings::default());
        let mut editor = editor_with("ab");
        let mut backend = HeadlessBackend::default();

        renderer.render(&editor, &mut backend, 0.016, 1.0).unwrap();
        assert_eq!(renderer.cursor_moved_at(), 1.0);
        renderer.render(&editor, &mut backend, 0.016, 2.0).unwrap();
        assert_eq!(renderer.cursor_moved_at(), 1.0);

        editor.handle_key(&KeyEvent::plain(Key::Left)).unwrap();
        renderer.render(&editor, &mut backend, 0.016, 3.0).unwrap();
        assert_eq!(renderer.cursor_moved_at(), 3.0);
        assert_eq!(backend.last_uniforms.unwrap().cursor_moved_at, 3.0);
    }

    #[test]
    fn test_small_batch_flushes_and_continues() {
        let mut renderer = renderer(RendererSettings {
            batch_capacity: 4,
            ..RendererSettings::default()
        });
        let editor = editor_with("abcdefghij");
        let mut backend = HeadlessBackend::default();

        let stats = renderer.render(&editor, &mut backend, 0.016, 0.0).unwrap();
        assert_eq!(stats.glyphs, 10);
        assert_eq!(stats.flushes, 3);
        assert_eq!(backend.draw_calls, 3);
        // Last flush carries "ij", positioned where a single pass would put them
        assert_eq!(backend.last_draw.len(), 2);
        assert_eq!(backend.last_draw[0].pos[0], 8.0 * 8.0 + 1.0);
    }

    #[test]
    fn test_reject_frame_policy() {
        let mut renderer = renderer(RendererSettings {
            batch_capacity: 4,
            overflow: OverflowPolicy::RejectFrame,
            ..RendererSettings::default()
        });
        let editor = editor_with("abcdefghij");
        let mut backend = HeadlessBackend::default();

        let err = renderer.render(&editor, &mut backend, 0.016, 0.0).unwrap_err();
        assert_eq!(err, RenderError::BatchOverflow { capacity: 4 });
        assert_eq!(backend.draw_calls, 0);

        // A frame that fits still renders afterwards
        let short = editor_with("ab");
        assert_eq!(renderer.render(&short, &mut backend, 0.016, 0.0).unwrap().glyphs, 2);
    }

    #[test]
    fn test_prompt_overlay_uses_screen_space() {
        let mut renderer = renderer(RendererSettings::default());
        let mut editor = editor_with("x");
        editor.handle_key(&KeyEvent::ctrl('o')).unwrap();
        editor.handle_key(&KeyEvent::char('f')).unwrap();
        let mut backend = HeadlessBackend::default();

        let stats = renderer.render(&editor, &mut backend, 0.016, 0.0).unwrap();
        // "x" + "Find file: " + "f"
        assert_eq!(stats.glyphs, 1 + 11 + 1);
        assert_eq!(stats.flushes, 2);
        assert_eq!(backend.uniform_sets, 2);

        let overlay = backend.last_uniforms.unwrap();
        assert_eq!(overlay.camera, [0.0, 0.0]);
        assert_eq!(overlay.scale, 0.225);

        let origin_x = -800.0 / (2.0 * 0.225) + MINIBUFFER_MARGIN;
        assert_eq!(backend.last_draw[0].pos[0], origin_x + 1.0);
    }

    #[test]
    fn test_unsupported_byte_fails_frame() {
        let mut renderer = renderer(RendererSettings::default());
        let mut editor = Editor::default();
        editor.main_buffer_mut().insert_text(b"a\tb");
        let mut backend = HeadlessBackend::default();

        let err = renderer.render(&editor, &mut backend, 0.016, 0.0).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Layout(LayoutError::UnsupportedChar { byte: b'\t', .. })
        ));
        assert_eq!(backend.draw_calls, 0);
    }

    #[test]
    fn test_unsupported_byte_offset_is_buffer_offset() {
        // Cursor at the end, so the window starts well past line 0
        let mut text: String = (0..400).map(|i| format!("line {}\n", i)).collect();
        let tab_at = text.len() + "abcdefghij".len();
        text.push_str("abcdefghij\tend\n");
        let mut editor = Editor::default();
        editor.main_buffer_mut().insert_str(&text);

        for capacity in [4, DEFAULT_BATCH_CAPACITY] {
            let mut renderer = renderer(RendererSettings {
                batch_capacity: capacity,
                ..RendererSettings::default()
            });
            let mut backend = HeadlessBackend::default();
            let err = renderer.render(&editor, &mut backend, 0.016, 0.0).unwrap_err();
            assert_eq!(
                err,
                RenderError::Layout(LayoutError::UnsupportedChar {
                    byte: b'\t',
                    offset: tab_at
                }),
                "capacity {}",
                capacity
            );
        }
    }

    #[test]
    fn test_text_pass_offsets_count_flushed_bytes() {
        let atlas = GlyphAtlas::build(&mut FixedCellRasterizer::default()).unwrap();
        let mut batch = GlyphBatch::new(4);
        let mut backend = HeadlessBackend::default();
        let mut pass = TextPass {
            engine: GlyphLayoutEngine::new(&atlas),
            batch: &mut batch,
            backend: &mut backend,
            overflow: OverflowPolicy::FlushAndContinue,
            colors: GlyphColors::default(),
            stats: FrameStats::default(),
        };

        let err = pass.text(PenState::default(), b"abcdef\tg", 100).unwrap_err();
        assert_eq!(pass.stats.flushes, 1);
        assert_eq!(
            err,
            RenderError::Layout(LayoutError::UnsupportedChar {
                byte: b'\t',
                offset: 106
            })
        );
    }

    #[test]
    fn test_fallback_renders_unsupported_byte() {
        let mut renderer = renderer(RendererSettings {
            fallback: Some(b'?'),
            ..RendererSettings::default()
        });
        let mut editor = Editor::default();
        editor.main_buffer_mut().insert_text(b"a\tb");
        let mut backend = HeadlessBackend::default();

        assert_eq!(renderer.render(&editor, &mut backend, 0.016, 0.0).unwrap().glyphs, 3);
    }
}
