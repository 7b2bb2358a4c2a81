// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
// Chunk: docs/chunks/editable_buffer - Editor state + key dispatch
//!
//! lite-edit library interface.
//!
//! The editor core: buffers and key dispatch ([`editor_state`]), a glyph
//! atlas built from a [`font::GlyphRasterizer`], text layout into a bounded
//! [`glyph_buffer::GlyphBatch`], a camera that follows the cursor, and the
//! [`renderer::FrameRenderer`] that ties them together behind a
//! [`renderer::RenderBackend`].
//!
//! Buffer and input types live in `lite-edit-buffer` and `lite-edit-input`
//! and are re-exported here.

pub mod config;
pub mod editor_state;
pub mod font;
pub mod glyph_atlas;
pub mod glyph_buffer;
pub mod glyph_layout;
pub mod key_script;
pub mod renderer;
pub mod viewport;

pub use config::{ConfigError, EditorConfig};
pub use editor_state::{ActiveBuffer, Command, Editor, EditorError, Handled, Prompt};
pub use font::{CellMetrics, FixedCellRasterizer, GlyphRasterizer, RasterError, RasterizedGlyph};
pub use glyph_atlas::{AtlasError, GlyphAtlas, GlyphMetrics};
pub use glyph_buffer::{BatchFull, GlyphBatch, GlyphRecord};
pub use glyph_layout::{GlyphColors, GlyphLayoutEngine, LayoutError, PenState};
pub use key_script::{parse_key_script, KeyScriptError};
pub use renderer::{
    FrameRenderer, FrameStats, HeadlessBackend, OverflowPolicy, RenderBackend, RenderError,
    RendererSettings,
};
pub use viewport::{Camera, CameraSettings, CursorBox, VisibleWindow};

pub use lite_edit_buffer::{BufferError, SelectionPolicy, TextBuffer};
pub use lite_edit_input::{Key, KeyEvent, Modifiers};
