// Chunk: docs/chunks/glyph_rendering - Glyph atlas + batched text layout
// Chunk: docs/chunks/viewport_rendering - Camera follow + visible line window
//!
//! Smoke tests for the whole pipeline: config, atlas, editor and frame
//! rendering into a headless backend.
//!
//! These run a file through a typical session and check that frames keep
//! rendering with bounded work as the buffer, the camera and the active
//! buffer change.

use std::fs;

use lite_edit::{
    parse_key_script, EditorConfig, Editor, FixedCellRasterizer, FrameRenderer, GlyphAtlas,
    HeadlessBackend, OverflowPolicy, RenderError, RendererSettings,
};
use tempfile::TempDir;

const FRAME_DT: f32 = 1.0 / 60.0;

fn renderer_from(config: &EditorConfig) -> FrameRenderer {
    let mut rasterizer = FixedCellRasterizer::new(config.cell_metrics());
    let atlas = GlyphAtlas::build(&mut rasterizer).unwrap();
    FrameRenderer::new(atlas, config.renderer_settings())
}

fn replay(editor: &mut Editor, script: &str) {
    for event in parse_key_script(script).unwrap() {
        editor.handle_key(&event).unwrap();
    }
}

fn large_file(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("{:05} the quick brown fox jumps over the lazy dog\n", i))
        .collect()
}

#[test]
fn test_session_edit_render_save() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("session.txt");
    fs::write(&path, "first line\nsecond line\n").unwrap();

    let config = EditorConfig::default();
    let mut renderer = renderer_from(&config);
    let mut editor = Editor::new(config.selection_policy());
    let mut backend = HeadlessBackend::default();

    editor.open(&path).unwrap();
    let stats = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap();
    // Newlines emit nothing
    assert_eq!(stats.glyphs, "first linesecond line".len());

    replay(&mut editor, "<DOWN><END> edited<C-s>");
    let stats = renderer.render(&editor, &mut backend, FRAME_DT, FRAME_DT).unwrap();
    assert_eq!(stats.glyphs, "first linesecond line edited".len());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "first line\nsecond line edited\n"
    );
}

#[test]
fn test_large_file_draws_only_visible_window() {
    let text = large_file(5000);
    let mut editor = Editor::default();
    editor.main_buffer_mut().insert_str(&text);

    let mut renderer = renderer_from(&EditorConfig::default());
    let mut backend = HeadlessBackend::default();

    let mut max_glyphs = 0;
    for frame in 0..240 {
        let stats = renderer
            .render(&editor, &mut backend, FRAME_DT, frame as f32 * FRAME_DT)
            .unwrap();
        max_glyphs = max_glyphs.max(stats.glyphs);
        assert!(stats.last_line - stats.first_line <= 200);
    }

    // Far fewer glyphs than the whole file, even fully zoomed out
    assert!(max_glyphs > 0);
    assert!(max_glyphs * 10 < text.len());
}

#[test]
fn test_scrolling_through_file_keeps_cursor_in_window() {
    let mut editor = Editor::default();
    editor.main_buffer_mut().insert_str(&large_file(300));
    replay(&mut editor, &"<UP>".repeat(150));

    let mut renderer = renderer_from(&EditorConfig::default());
    let mut backend = HeadlessBackend::default();
    let stats = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap();

    let row = editor.main_buffer().cursor_row();
    assert_eq!(row, 150);
    assert!(stats.first_line <= row && row <= stats.last_line);
}

#[test]
fn test_overflow_policies() {
    let mut editor = Editor::default();
    editor.main_buffer_mut().insert_str(&large_file(20));

    let flush_config = EditorConfig {
        batch_capacity: 64,
        ..EditorConfig::default()
    };
    let mut renderer = renderer_from(&flush_config);
    let mut backend = HeadlessBackend::default();
    let stats = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap();
    assert!(stats.flushes > 1);
    assert_eq!(backend.glyphs_drawn, stats.glyphs);

    let reject_config = EditorConfig {
        overflow_policy: OverflowPolicy::RejectFrame,
        ..flush_config
    };
    let mut renderer = renderer_from(&reject_config);
    let mut backend = HeadlessBackend::default();
    let err = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap_err();
    assert_eq!(err, RenderError::BatchOverflow { capacity: 64 });
    assert_eq!(backend.glyphs_drawn, 0);
}

#[test]
fn test_navigation_buffer_is_rendered() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("one.txt"), "1").unwrap();

    let mut editor = Editor::default();
    editor.main_buffer_mut().insert_str("main text");
    editor.open(temp.path()).unwrap();

    let mut renderer = renderer_from(&EditorConfig::default());
    let mut backend = HeadlessBackend::default();
    let stats = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap();
    assert_eq!(stats.glyphs, "..one.txt".len());
}

#[test]
fn test_config_file_drives_renderer() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(
        &path,
        r#"{ "cell_width": 10, "cell_height": 20, "resolution": [400.0, 300.0], "fallback_glyph": "?" }"#,
    )
    .unwrap();
    let config = EditorConfig::load_or_default(&path);

    let mut renderer = renderer_from(&config);
    assert_eq!(renderer.resolution(), [400.0, 300.0]);

    let mut editor = Editor::default();
    editor.main_buffer_mut().insert_text(b"tab\there");
    let mut backend = HeadlessBackend::default();
    let stats = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap();
    assert_eq!(stats.glyphs, 8);
    // Cursor at the end: 8 cells of 10px
    assert_eq!(backend.last_cursor.unwrap().pos[0], 80.0);
}

#[test]
fn test_resize_changes_window() {
    let mut editor = Editor::default();
    editor.main_buffer_mut().insert_str(&large_file(400));
    replay(&mut editor, &"<UP>".repeat(200));

    let settings = RendererSettings {
        camera: lite_edit::CameraSettings {
            velocity: 0.0,
            ..Default::default()
        },
        ..RendererSettings::default()
    };
    let atlas = GlyphAtlas::build(&mut FixedCellRasterizer::default()).unwrap();
    let mut renderer = FrameRenderer::new(atlas, settings);
    let mut backend = HeadlessBackend::default();

    let small = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap();
    renderer.set_resolution([800.0, 1200.0]);
    let tall = renderer.render(&editor, &mut backend, FRAME_DT, 0.0).unwrap();

    assert!(tall.last_line - tall.first_line > small.last_line - small.first_line);
    assert_eq!(backend.last_uniforms.unwrap().resolution, [800.0, 1200.0]);
}
