// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
//!
//! Integration tests for atlas construction and text layout.
//!
//! The central property: laying text out in pieces, whether split by batch
//! overflow or by starting from a seeded pen, puts every glyph exactly where
//! a single pass would.

use lite_edit::{
    CellMetrics, FixedCellRasterizer, GlyphAtlas, GlyphBatch, GlyphColors, GlyphLayoutEngine,
    GlyphRecord, LayoutError, PenState, RasterizedGlyph,
};

const SAMPLE: &[u8] = b"fn main() {\n    println!(\"hi\");\n}\n\n// trailing";

fn atlas() -> GlyphAtlas {
    GlyphAtlas::build(&mut FixedCellRasterizer::default()).unwrap()
}

fn layout_all(engine: &GlyphLayoutEngine<'_>, text: &[u8]) -> Vec<GlyphRecord> {
    let mut batch = GlyphBatch::new(4096);
    engine
        .layout_text(text, [0.0, 0.0], GlyphColors::default(), &mut batch)
        .unwrap();
    batch.records().to_vec()
}

#[test]
fn test_atlas_layout_for_custom_cell() {
    let cell = CellMetrics::new(10, 20);
    let atlas = GlyphAtlas::build(&mut FixedCellRasterizer::new(cell)).unwrap();

    assert_eq!(atlas.glyph_count(), 96);
    assert_eq!(atlas.pixels().len(), (atlas.width() * atlas.height()) as usize);
    // Every non-blank glyph sits side by side on one row
    let a = atlas.get(b'a').unwrap();
    let b = atlas.get(b'b').unwrap();
    let step = b.u_offset - a.u_offset;
    assert!((step - a.width / atlas.width() as f32).abs() < 1e-6);
}

#[test]
fn test_failed_glyph_is_left_out() {
    let mut rasterizer = FixedCellRasterizer::default().without_glyph(b'~');
    let atlas = GlyphAtlas::build(&mut rasterizer).unwrap();
    assert_eq!(atlas.glyph_count(), 95);
    assert!(atlas.get(b'~').is_none());

    let engine = GlyphLayoutEngine::new(&atlas);
    let mut batch = GlyphBatch::new(16);
    let err = engine
        .layout_text(b"a~", [0.0, 0.0], GlyphColors::default(), &mut batch)
        .unwrap_err();
    assert_eq!(err, LayoutError::UnsupportedChar { byte: b'~', offset: 1 });
}

#[test]
fn test_override_glyph_changes_advance() {
    let wide = RasterizedGlyph {
        advance_x: 16,
        advance_y: 0,
        width: 14,
        rows: 10,
        left: 1,
        top: 10,
        bitmap: vec![255; 14 * 10],
    };
    let mut rasterizer = FixedCellRasterizer::default().with_glyph(b'W', wide);
    let atlas = GlyphAtlas::build(&mut rasterizer).unwrap();
    let engine = GlyphLayoutEngine::new(&atlas);

    assert_eq!(engine.cursor_pen_position(b"WW").unwrap(), [32.0, 0.0]);
    assert_eq!(engine.widest_line_width(b"WW\naaa", 0, 2).unwrap(), 32.0);
}

#[test]
fn test_split_layout_matches_single_pass() {
    let atlas = atlas();
    let engine = GlyphLayoutEngine::new(&atlas);
    let expected = layout_all(&engine, SAMPLE);

    // Layout through a tiny batch, flushing into `drawn` whenever it fills
    let mut drawn = Vec::new();
    let mut batch = GlyphBatch::new(5);
    let mut pen = PenState::default();
    let mut rest = SAMPLE;
    loop {
        match engine.layout_text_from(pen, rest, GlyphColors::default(), &mut batch) {
            Ok(_) => break,
            Err(LayoutError::BatchFull { consumed, pen: resume }) => {
                drawn.extend_from_slice(batch.records());
                batch.discard();
                rest = &rest[consumed..];
                pen = resume;
            }
            Err(e) => panic!("unexpected {:?}", e),
        }
    }
    drawn.extend_from_slice(batch.records());

    assert_eq!(drawn, expected);
}

#[test]
fn test_seeded_pen_matches_single_pass() {
    let atlas = atlas();
    let engine = GlyphLayoutEngine::new(&atlas);
    let expected = layout_all(&engine, SAMPLE);

    // Start partway through, the way a visible window does
    let split = SAMPLE.iter().position(|&b| b == b'\n').unwrap() + 1;
    let seeded = engine
        .cursor_pen_position_from(&SAMPLE[..split], PenState::default())
        .unwrap();
    let mut batch = GlyphBatch::new(4096);
    engine
        .layout_text_from(seeded, &SAMPLE[split..], GlyphColors::default(), &mut batch)
        .unwrap();

    let skipped = SAMPLE[..split].iter().filter(|&&b| b != b'\n').count();
    assert_eq!(batch.records(), &expected[skipped..]);
}

#[test]
fn test_cursor_sits_on_following_glyph() {
    let atlas = atlas();
    let engine = GlyphLayoutEngine::new(&atlas);
    let records = layout_all(&engine, SAMPLE);

    // For every printable byte, the caret before it is at that glyph's pen
    let mut index = 0;
    for (offset, &byte) in SAMPLE.iter().enumerate() {
        if byte == b'\n' {
            continue;
        }
        let metrics = atlas.get(byte).unwrap();
        let [x, y] = engine.cursor_pen_position(&SAMPLE[..offset]).unwrap();
        assert_eq!(records[index].pos, [x + metrics.left, y + metrics.top]);
        index += 1;
    }
}

#[test]
fn test_colors_applied_to_records() {
    let atlas = atlas();
    let engine = GlyphLayoutEngine::new(&atlas);
    let colors = GlyphColors {
        fg: [1.0, 0.0, 0.0, 1.0],
        bg: [0.0, 0.0, 1.0, 0.5],
    };
    let mut batch = GlyphBatch::new(8);
    engine.layout_text(b"ok", [0.0, 0.0], colors, &mut batch).unwrap();
    assert!(batch.records().iter().all(|r| r.fg == colors.fg && r.bg == colors.bg));
}
