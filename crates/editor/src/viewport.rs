// Chunk: docs/chunks/viewport_rendering - Camera follow + visible line window
//!
//! Camera that follows the text cursor
//!
//! Each frame the camera:
//! - picks the window of lines around the cursor row that fits on screen
//!   at the current zoom,
//! - eases the zoom toward a value where the widest line in that window
//!   takes up a fixed share of the screen width,
//! - eases its position toward the cursor box, horizontally clamped so that
//!   short lines stay put and long lines keep a margin on either side.
//!
//! Easing is exponential: every update closes `dt * velocity` of the
//! remaining distance.

use std::ops::Range;

use lite_edit_buffer::TextBuffer;

use crate::glyph_layout::{GlyphLayoutEngine, LayoutError};

// =============================================================================
// Settings
// =============================================================================

/// Tuning for [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Easing rate, multiplied into every frame's `dt`
    pub velocity: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Share of the screen width the widest visible line should fill
    pub fill: f32,
    /// Margin kept left of the cursor, as a share of the screen width
    pub left_offset: f32,
    /// Margin kept right of the cursor, as a share of the screen width
    pub right_offset: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            velocity: 3.0,
            min_scale: 0.225,
            max_scale: 1.0,
            fill: 0.6,
            left_offset: 0.05,
            right_offset: 0.15,
        }
    }
}

// =============================================================================
// Frame products
// =============================================================================

/// Lines of the buffer that can be on screen this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleWindow {
    pub first_line: usize,
    /// Inclusive
    pub last_line: usize,
    /// Byte range of the window's lines, trailing newline included
    pub bytes: Range<usize>,
}

/// The caret rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorBox {
    pub pos: [f32; 2],
    pub size: [f32; 2],
}

impl CursorBox {
    pub fn center(&self) -> [f32; 2] {
        [
            self.pos[0] + self.size[0] / 2.0,
            self.pos[1] + self.size[1] / 2.0,
        ]
    }
}

// =============================================================================
// Camera
// =============================================================================

#[derive(Debug, Clone)]
pub struct Camera {
    position: [f32; 2],
    scale: f32,
    settings: CameraSettings,
}

impl Camera {
    /// A camera at the origin, fully zoomed in.
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            position: [0.0, 0.0],
            scale: settings.max_scale,
            settings,
        }
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Number of whole lines that fit in `height` at the current zoom.
    pub fn visible_line_count(&self, line_height: f32, height: f32) -> usize {
        let line_size = line_height * self.scale;
        if line_size <= 0.0 || !line_size.is_finite() {
            return 0;
        }
        (height / line_size).floor().max(0.0) as usize
    }

    /// Window of lines centred on the cursor row.
    pub fn visible_window(&self, buffer: &TextBuffer, line_height: f32, resolution: [f32; 2]) -> VisibleWindow {
        let half = self.visible_line_count(line_height, resolution[1]) / 2;
        let row = buffer.cursor_row();
        let first_line = row.saturating_sub(half);
        let last_line = (row + half).min(buffer.line_count());

        VisibleWindow {
            first_line,
            last_line,
            bytes: buffer.line_start_offset(first_line)..buffer.line_start_offset(last_line + 1),
        }
    }

    /// Caret rectangle: pen position at the cursor, lowered to the descent
    /// line, as wide as the glyph under it.
    pub fn cursor_box(engine: &GlyphLayoutEngine<'_>, buffer: &TextBuffer) -> Result<CursorBox, LayoutError> {
        let atlas = engine.atlas();
        let [x, y] = engine.cursor_pen_position(&buffer.as_bytes()[..buffer.cursor()])?;
        let width = engine
            .cursor_width(buffer.char_at_cursor())
            .map_err(|e| e.shifted(buffer.cursor()))?;
        Ok(CursorBox {
            pos: [x, y - atlas.low() as f32],
            size: [width, atlas.height() as f32],
        })
    }

    /// Zoom that fits a line of width `widest` on screen.
    pub fn target_scale(&self, widest: f32, screen_width: f32) -> f32 {
        let s = &self.settings;
        if widest <= 0.0 {
            return s.max_scale;
        }
        (s.fill * screen_width / widest).clamp(s.min_scale, s.max_scale)
    }

    /// Horizontal camera target for a cursor at `cursor_x`.
    pub fn target_x(&self, cursor_x: f32, widest: f32, screen_width: f32) -> f32 {
        let s = &self.settings;
        let half = widest / 2.0;
        let leftmost = half.min((0.5 - s.left_offset) * screen_width / self.scale);
        let rightmost = half.max(widest - (0.5 - s.right_offset) * screen_width / self.scale);
        if cursor_x < leftmost {
            leftmost
        } else {
            cursor_x.min(rightmost)
        }
    }

    /// Advances the camera by one frame of `dt` seconds.
    ///
    /// Returns the visible window computed at the zoom in effect when the
    /// frame started, and the cursor box the camera is following.
    pub fn update(
        &mut self,
        dt: f32,
        engine: &GlyphLayoutEngine<'_>,
        buffer: &TextBuffer,
        resolution: [f32; 2],
    ) -> Result<(VisibleWindow, CursorBox), LayoutError> {
        let t = (dt * self.settings.velocity).clamp(0.0, 1.0);
        let line_height = engine.atlas().height() as f32;

        let window = self.visible_window(buffer, line_height, resolution);
        let lines = window.last_line - window.first_line + 1;
        let widest = engine
            .widest_line_width(&buffer.as_bytes()[window.bytes.clone()], 0, lines)
            .map_err(|e| e.shifted(window.bytes.start))?;

        let target_scale = self.target_scale(widest, resolution[0]);
        self.scale += (target_scale - self.scale) * t;

        let cursor = Self::cursor_box(engine, buffer)?;
        let target = [
            self.target_x(cursor.pos[0], widest, resolution[0]),
            cursor.pos[1] + cursor.size[1] / 2.0,
        ];
        self.position[0] += (target[0] - self.position[0]) * t;
        self.position[1] += (target[1] - self.position[1]) * t;

        Ok((window, cursor))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

// =============================================================================
// Tests
// =============================================================================
