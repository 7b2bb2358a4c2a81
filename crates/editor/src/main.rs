// Chunk: docs/chunks/editable_buffer - Main loop + input events + editable buffer
// Chunk: docs/chunks/headless_replay - Key script parsing for headless runs
//!
//! lite-edit: headless driver for the editor core.
//!
//! Opens a file or directory, replays a key script against it, then renders
//! a number of frames into a headless backend and logs what was drawn:
//!
//! ```bash
//! lite-edit notes.txt --keys 'hello<RET>world<C-s>' --frames 120
//! RUST_LOG=debug lite-edit . --keys '<DOWN><RET>'
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lite_edit::{
    parse_key_script, AtlasError, ConfigError, Editor, EditorConfig, EditorError,
    FixedCellRasterizer, FrameRenderer, FrameStats, GlyphAtlas, HeadlessBackend, KeyScriptError,
    RenderError,
};

/// Frame period of the simulated display
const FRAME_DT: f32 = 1.0 / 60.0;

/// Headless lite-edit: replay keys, render frames, report.
#[derive(Parser, Debug)]
#[command(name = "lite-edit")]
#[command(about = "Replay a key script against a file and render it headlessly")]
struct Args {
    /// File or directory to open
    path: Option<PathBuf>,

    /// Keys to replay, e.g. 'hello<RET><C-s>'
    #[arg(short, long)]
    keys: Option<String>,

    /// Number of frames to render after replaying the keys
    #[arg(short, long, default_value_t = 60)]
    frames: u32,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("config file {0} does not exist")]
    MissingConfig(PathBuf),
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Keys(#[from] KeyScriptError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "lite-edit failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<EditorConfig, AppError> {
    match &args.config {
        Some(path) => EditorConfig::read(path)?.ok_or_else(|| AppError::MissingConfig(path.clone())),
        None => Ok(EditorConfig::load()),
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let config = load_config(args)?;

    let mut rasterizer = FixedCellRasterizer::new(config.cell_metrics());
    let atlas = GlyphAtlas::build(&mut rasterizer)?;
    info!(
        width = atlas.width(),
        height = atlas.height(),
        glyphs = atlas.glyph_count(),
        "built glyph atlas"
    );

    let mut editor = Editor::new(config.selection_policy());
    if let Some(path) = &args.path {
        editor.open(path)?;
    }

    if let Some(script) = &args.keys {
        let events = parse_key_script(script)?;
        let mut failed = 0;
        for event in &events {
            // The editor logs and records failures; keep replaying
            if editor.handle_key(event).is_err() {
                failed += 1;
            }
        }
        info!(keys = events.len(), failed, "replayed key script");
    }

    let mut renderer = FrameRenderer::new(atlas, config.renderer_settings());
    let mut backend = HeadlessBackend::default();
    let mut last = FrameStats::default();
    for frame in 0..args.frames {
        last = renderer.render(&editor, &mut backend, FRAME_DT, frame as f32 * FRAME_DT)?;
    }

    let document = editor.document();
    let camera = renderer.camera();
    info!(
        frames = args.frames,
        draw_calls = backend.draw_calls,
        glyphs_drawn = backend.glyphs_drawn,
        last_frame_glyphs = last.glyphs,
        lines = ?(last.first_line..=last.last_line),
        scale = camera.scale(),
        camera = ?camera.position(),
        "rendered"
    );
    info!(
        active = ?editor.active(),
        bytes = document.len(),
        cursor = document.cursor(),
        modified = editor.main_buffer().is_modified(),
        "final state"
    );
    if let Some(status) = editor.status() {
        info!(status, "status");
    }
    if editor.main_buffer().is_modified() {
        warn!("main buffer has unsaved changes");
    }
    Ok(())
}
