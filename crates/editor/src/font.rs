// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
//!
//! Glyph rasterization contract
//!
//! The atlas is built from whatever can turn a code point into a coverage
//! bitmap plus placement metrics. A real front end would put a font engine
//! behind [`GlyphRasterizer`]; [`FixedCellRasterizer`] is the built-in
//! deterministic implementation used by the headless binary and the tests.
//!
//! All metrics are in whole pixels. `top` is the distance from the baseline
//! up to the first bitmap row, so `rows - top` is how far the glyph reaches
//! below the baseline.

use std::collections::HashMap;

use thiserror::Error;

// =============================================================================
// Rasterized glyph
// =============================================================================

/// A single rendered glyph with its placement metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterizedGlyph {
    /// Horizontal pen advance
    pub advance_x: i32,
    /// Vertical pen advance (zero for horizontal scripts)
    pub advance_y: i32,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub rows: u32,
    /// Offset from the pen to the bitmap's left edge
    pub left: i32,
    /// Offset from the baseline up to the bitmap's top edge
    pub top: i32,
    /// 8-bit coverage, `rows` rows of `width` bytes
    pub bitmap: Vec<u8>,
}

impl RasterizedGlyph {
    /// A glyph that only advances the pen (e.g. space).
    pub fn blank(advance_x: i32) -> Self {
        Self {
            advance_x,
            advance_y: 0,
            width: 0,
            rows: 0,
            left: 0,
            top: 0,
            bitmap: Vec::new(),
        }
    }

    /// Depth below the baseline, never negative.
    pub fn descent(&self) -> u32 {
        (self.rows as i32 - self.top).max(0) as u32
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// The face has no glyph for this code point.
    #[error("no glyph for code point {code}")]
    MissingGlyph { code: u8 },
    /// The bitmap does not hold `width * rows` bytes.
    #[error("glyph {code} bitmap holds {actual} bytes, expected {expected}")]
    BadBitmap {
        code: u8,
        expected: usize,
        actual: usize,
    },
}

// =============================================================================
// Rasterizer trait
// =============================================================================

/// Produces glyph bitmaps and metrics for single-byte code points.
pub trait GlyphRasterizer {
    fn rasterize(&mut self, code: u8) -> Result<RasterizedGlyph, RasterError>;
}

// =============================================================================
// FixedCellRasterizer
// =============================================================================

/// Monospace cell dimensions for [`FixedCellRasterizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    /// Advance of every glyph
    pub cell_width: u32,
    /// Full cell height, ascent plus descent
    pub cell_height: u32,
    /// Height above the baseline
    pub ascent: u32,
}

impl CellMetrics {
    /// Cell with the ascent at three quarters of the height.
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            ascent: cell_height - cell_height / 4,
        }
    }

    pub fn descent(&self) -> u32 {
        self.cell_height - self.ascent
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        // IBM VGA 8x16
        Self::new(8, 16)
    }
}

/// Deterministic rasterizer drawing every printable glyph as a box outline.
///
/// Lowercase letters with descenders (`g j p q y`) extend below the baseline
/// so the atlas has a real `low` extent. Individual glyphs can be replaced or
/// made to fail, which is how tests exercise unusual metrics.
#[derive(Debug, Clone, Default)]
pub struct FixedCellRasterizer {
    cell: CellMetrics,
    overrides: HashMap<u8, RasterizedGlyph>,
    missing: Vec<u8>,
}

impl FixedCellRasterizer {
    pub fn new(cell: CellMetrics) -> Self {
        Self {
            cell,
            overrides: HashMap::new(),
            missing: Vec::new(),
        }
    }

    pub fn cell(&self) -> CellMetrics {
        self.cell
    }

    /// Replaces the glyph produced for `code`.
    pub fn with_glyph(mut self, code: u8, glyph: RasterizedGlyph) -> Self {
        self.overrides.insert(code, glyph);
        self
    }

    /// Makes `code` fail to rasterize.
    pub fn without_glyph(mut self, code: u8) -> Self {
        self.missing.push(code);
        self
    }

    fn outline_glyph(&self, code: u8) -> RasterizedGlyph {
        let cell = self.cell;
        if code == b' ' || cell.cell_width < 3 || cell.ascent == 0 {
            return RasterizedGlyph::blank(cell.cell_width as i32);
        }

        let width = cell.cell_width - 2;
        let (rows, top) = if matches!(code, b'g' | b'j' | b'p' | b'q' | b'y') {
            (cell.cell_height - 1, cell.ascent as i32 - 1)
        } else {
            (cell.ascent - 1, cell.ascent as i32 - 1)
        };

        let mut bitmap = vec![0u8; (width * rows) as usize];
        for y in 0..rows {
            for x in 0..width {
                if y == 0 || x == 0 || y == rows - 1 || x == width - 1 {
                    bitmap[(y * width + x) as usize] = 0xFF;
                }
            }
        }

        RasterizedGlyph {
            advance_x: cell.cell_width as i32,
            advance_y: 0,
            width,
            rows,
            left: 1,
            top,
            bitmap,
        }
    }
}

impl GlyphRasterizer for FixedCellRasterizer {
    fn rasterize(&mut self, code: u8) -> Result<RasterizedGlyph, RasterError> {
        if self.missing.contains(&code) || !(0x20..0x80).contains(&code) {
            return Err(RasterError::MissingGlyph { code });
        }

        let glyph = match self.overrides.get(&code) {
            Some(glyph) => glyph.clone(),
            None => self.outline_glyph(code),
        };

        let expected = (glyph.width * glyph.rows) as usize;
        if glyph.bitmap.len() != expected {
            return Err(RasterError::BadBitmap {
                code,
                expected,
                actual: glyph.bitmap.len(),
            });
        }
        Ok(glyph)
    }
}

// =============================================================================
// Tests
// =============================================================================
