// Chunk: docs/chunks/renderer_decomposition - Color constants and uniforms

//! Color constants and uniform types for the renderer.

// =============================================================================
// Colors
// =============================================================================

/// Default text color: #cdd6f4 (Catppuccin Mocha text)
pub const TEXT_COLOR: [f32; 4] = [
    0.804, // 0xcd / 255
    0.839, // 0xd6 / 255
    0.957, // 0xf4 / 255
    1.0,
];

/// Default glyph background: transparent
pub const TEXT_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Cursor fill: opaque white
pub const CURSOR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Offset from the bottom-left screen corner to the minibuffer text, in
/// unscaled pixels
pub const MINIBUFFER_MARGIN: f32 = 100.0;

// =============================================================================
// Uniforms
// =============================================================================

/// Per-draw shader inputs.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Seconds since start
    pub time: f32,
    /// World-to-screen zoom
    pub scale: f32,
    /// World position at the centre of the screen
    pub camera: [f32; 2],
    /// Screen size in pixels
    pub resolution: [f32; 2],
    /// `time` at which the cursor last moved (drives the blink phase)
    pub cursor_moved_at: f32,
}

/// The caret quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorQuad {
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}
