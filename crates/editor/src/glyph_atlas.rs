// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
//!
//! Glyph atlas for texture-based text rendering
//!
//! Every printable code point (32..=127) is rasterized once at startup and
//! packed side by side into a single-row R8 texture:
//!
//! - Pass one sums the bitmap widths and finds the tallest bitmap and the
//!   deepest descent.
//! - Pass two copies each bitmap in at a running x offset and records its
//!   metrics, including the U coordinate where it starts.
//!
//! The resulting table is immutable and shared read-only by the layout
//! engine.

use thiserror::Error;
use tracing::{debug, warn};

use crate::font::{GlyphRasterizer, RasterError, RasterizedGlyph};
use crate::glyph_layout::LayoutError;

// =============================================================================
// Constants
// =============================================================================

/// First code point in the atlas (space)
pub const FIRST_CODE: u8 = 32;
/// Last code point in the atlas
pub const LAST_CODE: u8 = 127;

const TABLE_SIZE: usize = (LAST_CODE - FIRST_CODE) as usize + 1;

// =============================================================================
// GlyphMetrics
// =============================================================================

/// Placement data for one glyph, in pixels except for `u_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub advance_x: f32,
    pub advance_y: f32,
    /// Bitmap width
    pub width: f32,
    /// Bitmap height
    pub rows: f32,
    /// Left bearing
    pub left: f32,
    /// Top bearing
    pub top: f32,
    /// Start of the bitmap in atlas U space (0.0-1.0)
    pub u_offset: f32,
}

impl GlyphMetrics {
    fn from_raster(glyph: &RasterizedGlyph, u_offset: f32) -> Self {
        Self {
            advance_x: glyph.advance_x as f32,
            advance_y: glyph.advance_y as f32,
            width: glyph.width as f32,
            rows: glyph.rows as f32,
            left: glyph.left as f32,
            top: glyph.top as f32,
            u_offset,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    /// No glyph produced any pixels, so there is nothing to sample.
    #[error("glyph atlas is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

// =============================================================================
// GlyphAtlas
// =============================================================================

/// Single-row texture holding every printable glyph.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    width: u32,
    height: u32,
    low: u32,
    /// Row-major R8 texels, `height` rows of `width` bytes
    pixels: Vec<u8>,
    table: [Option<GlyphMetrics>; TABLE_SIZE],
}

impl GlyphAtlas {
    /// Rasterizes 32..=127 and packs the results.
    ///
    /// Glyphs that fail to rasterize, or whose bitmap does not hold
    /// `width * rows` bytes, are logged and left out of the table; looking
    /// them up later reports an unsupported character.
    pub fn build<R: GlyphRasterizer + ?Sized>(rasterizer: &mut R) -> Result<Self, AtlasError> {
        // Pass one: dimensions
        let mut glyphs = Vec::with_capacity(TABLE_SIZE);
        let mut width = 0u32;
        let mut height = 0u32;
        let mut low = 0u32;
        for code in FIRST_CODE..=LAST_CODE {
            match rasterizer.rasterize(code).and_then(|glyph| checked(code, glyph)) {
                Ok(glyph) => {
                    width += glyph.width;
                    height = height.max(glyph.rows);
                    low = low.max(glyph.descent());
                    glyphs.push((code, glyph));
                }
                Err(e) => warn!(code, error = %e, "skipping glyph"),
            }
        }

        if width == 0 || height == 0 {
            return Err(AtlasError::Empty { width, height });
        }

        // Pass two: packing
        let mut pixels = vec![0u8; (width * height) as usize];
        let mut table = [None; TABLE_SIZE];
        let mut x = 0u32;
        for (code, glyph) in &glyphs {
            for row in 0..glyph.rows {
                let src = (row * glyph.width) as usize;
                let dst = (row * width + x) as usize;
                let len = glyph.width as usize;
                pixels[dst..dst + len].copy_from_slice(&glyph.bitmap[src..src + len]);
            }
            table[(code - FIRST_CODE) as usize] =
                Some(GlyphMetrics::from_raster(glyph, x as f32 / width as f32));
            x += glyph.width;
        }

        debug!(width, height, low, glyphs = glyphs.len(), "built glyph atlas");
        Ok(Self {
            width,
            height,
            low,
            pixels,
            table,
        })
    }

    /// Texture width (sum of all bitmap widths)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height (tallest bitmap); also the line height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Deepest extent of any glyph below the baseline
    pub fn low(&self) -> u32 {
        self.low
    }

    /// The R8 texels, ready for upload.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the texel at (x, y), or `None` outside the texture.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Looks up the metrics for a byte.
    pub fn get(&self, code: u8) -> Option<&GlyphMetrics> {
        if !(FIRST_CODE..=LAST_CODE).contains(&code) {
            return None;
        }
        self.table[(code - FIRST_CODE) as usize].as_ref()
    }

    /// Looks up the metrics for a byte, rejecting anything outside the table.
    pub fn metrics(&self, code: u8) -> Result<&GlyphMetrics, LayoutError> {
        self.get(code)
            .ok_or(LayoutError::UnsupportedChar { byte: code, offset: 0 })
    }

    /// Number of glyphs that made it into the table.
    pub fn glyph_count(&self) -> usize {
        self.table.iter().filter(|m| m.is_some()).count()
    }
}

/// Rejects bitmaps whose length disagrees with their dimensions.
fn checked(code: u8, glyph: RasterizedGlyph) -> Result<RasterizedGlyph, RasterError> {
    let expected = glyph.width as usize * glyph.rows as usize;
    if glyph.bitmap.len() != expected {
        return Err(RasterError::BadBitmap {
            code,
            expected,
            actual: glyph.bitmap.len(),
        });
    }
    Ok(glyph)
}

// =============================================================================
// Tests
// =============================================================================
