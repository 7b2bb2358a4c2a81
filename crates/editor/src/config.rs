// Chunk: docs/chunks/editor_config - Config file persistence
//!
//! Editor configuration file.
//!
//! The config file is JSON, stored at:
//! - Linux: `~/.config/lite-edit/config.json`
//! - macOS: `~/Library/Application Support/lite-edit/config.json`
//!
//! Every field is optional; anything left out takes its default. A missing
//! file means all defaults. A file that cannot be read, parsed or validated
//! is logged and ignored so the editor always starts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use lite_edit_buffer::SelectionPolicy;

use crate::font::CellMetrics;
use crate::glyph_buffer::DEFAULT_BATCH_CAPACITY;
use crate::glyph_layout::GlyphColors;
use crate::renderer::{OverflowPolicy, RendererSettings, TEXT_BACKGROUND, TEXT_COLOR};
use crate::viewport::CameraSettings;

/// Application name used for the config directory.
const APP_NAME: &str = "lite-edit";

/// Config file name.
const CONFIG_FILENAME: &str = "config.json";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// Serializable data types
// =============================================================================

/// Serializable representation of a selection policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicyData {
    #[default]
    InsertAtCursor,
    ReplaceRegion,
}

impl From<SelectionPolicy> for SelectionPolicyData {
    fn from(policy: SelectionPolicy) -> Self {
        match policy {
            SelectionPolicy::InsertAtCursor => SelectionPolicyData::InsertAtCursor,
            SelectionPolicy::ReplaceRegion => SelectionPolicyData::ReplaceRegion,
        }
    }
}

impl From<SelectionPolicyData> for SelectionPolicy {
    fn from(policy: SelectionPolicyData) -> Self {
        match policy {
            SelectionPolicyData::InsertAtCursor => SelectionPolicy::InsertAtCursor,
            SelectionPolicyData::ReplaceRegion => SelectionPolicy::ReplaceRegion,
        }
    }
}

/// Contents of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Glyph records per draw call
    pub batch_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub selection_policy: SelectionPolicyData,
    pub min_scale: f32,
    pub max_scale: f32,
    pub camera_velocity: f32,
    /// Screen size used by the headless renderer
    pub resolution: [f32; 2],
    /// Text colour, RGBA in 0..=1
    pub foreground: [f32; 4],
    pub background: [f32; 4],
    /// Drawn in place of characters the atlas has no glyph for
    pub fallback_glyph: Option<char>,
    /// Cell size of the built-in rasterizer, in pixels
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let camera = CameraSettings::default();
        let cell = CellMetrics::default();
        Self {
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            selection_policy: SelectionPolicyData::default(),
            min_scale: camera.min_scale,
            max_scale: camera.max_scale,
            camera_velocity: camera.velocity,
            resolution: [800.0, 600.0],
            foreground: TEXT_COLOR,
            background: TEXT_BACKGROUND,
            fallback_glyph: None,
            cell_width: cell.cell_width,
            cell_height: cell.cell_height,
        }
    }
}

// =============================================================================
// Config file path
// =============================================================================

/// Returns the path to the config file, or `None` if the platform has no
/// config directory.
pub fn config_file_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILENAME))
}

// =============================================================================
// Load / save
// =============================================================================

impl EditorConfig {
    /// Loads the config from its default location, falling back to defaults.
    pub fn load() -> Self {
        match config_file_path() {
            Some(path) => Self::load_or_default(&path),
            None => {
                debug!("no config directory, using defaults");
                Self::default()
            }
        }
    }

    /// Loads `path`, logging any problem and returning defaults instead.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Reads and validates `path`. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Writes the config to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.into()))?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(write_err)?;
        fs::rename(&temp_path, path).map_err(write_err)?;
        Ok(())
    }

    /// Rejects values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_capacity == 0 {
            return Err(ConfigError::Invalid("batch_capacity must be positive".into()));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::Invalid(format!(
                "scale range {}..{} is empty or not positive",
                self.min_scale, self.max_scale
            )));
        }
        if self.camera_velocity < 0.0 {
            return Err(ConfigError::Invalid("camera_velocity must not be negative".into()));
        }
        if self.resolution.iter().any(|&d| d <= 0.0) {
            return Err(ConfigError::Invalid("resolution must be positive".into()));
        }
        if self.cell_width < 3 || self.cell_height < 4 {
            return Err(ConfigError::Invalid(format!(
                "cell size {}x{} is too small",
                self.cell_width, self.cell_height
            )));
        }
        Ok(())
    }

    // ==================== Conversions ====================

    pub fn selection_policy(&self) -> SelectionPolicy {
        self.selection_policy.into()
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        CellMetrics::new(self.cell_width, self.cell_height)
    }

    /// The fallback glyph as a byte, if it is one the atlas can hold.
    pub fn fallback_byte(&self) -> Option<u8> {
        let ch = self.fallback_glyph?;
        match u8::try_from(ch) {
            Ok(b) if (0x20..0x7f).contains(&b) => Some(b),
            _ => {
                warn!(fallback = %ch, "fallback glyph is not printable ASCII, ignoring");
                None
            }
        }
    }

    pub fn renderer_settings(&self) -> RendererSettings {
        RendererSettings {
            batch_capacity: self.batch_capacity,
            overflow: self.overflow_policy,
            camera: CameraSettings {
                velocity: self.camera_velocity,
                min_scale: self.min_scale,
                max_scale: self.max_scale,
                ..CameraSettings::default()
            },
            colors: GlyphColors {
                fg: self.foreground,
                bg: self.background,
            },
            fallback: self.fallback_byte(),
            resolution: self.resolution,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_renderer_defaults() {
        let settings = EditorConfig::default().renderer_settings();
        assert_eq!(settings, RendererSettings::default());
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        assert!(EditorConfig::read(&path).unwrap().is_none());
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{ "batch_capacity": 128, "overflow_policy": "reject_frame", "selection_policy": "replace_region" }"#,
        )
        .unwrap();

        let config = EditorConfig::read(&path).unwrap().unwrap();
        assert_eq!(config.batch_capacity, 128);
        assert_eq!(config.overflow_policy, OverflowPolicy::RejectFrame);
        assert_eq!(config.selection_policy(), SelectionPolicy::ReplaceRegion);
        assert_eq!(config.cell_width, EditorConfig::default().cell_width);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            EditorConfig::read(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{ "min_scale": 2.0, "max_scale": 1.0 }"#).unwrap();
        assert!(matches!(
            EditorConfig::read(&path),
            Err(ConfigError::Invalid(_))
        ));

        let zero = EditorConfig {
            batch_capacity: 0,
            ..EditorConfig::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_save_then_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");
        let config = EditorConfig {
            fallback_glyph: Some('?'),
            resolution: [1024.0, 768.0],
            ..EditorConfig::default()
        };

        config.save_to(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(EditorConfig::read(&path).unwrap(), Some(config));
    }

    #[test]
    fn test_fallback_byte() {
        let mut config = EditorConfig {
            fallback_glyph: Some('?'),
            ..EditorConfig::default()
        };
        assert_eq!(config.fallback_byte(), Some(b'?'));
        assert_eq!(config.renderer_settings().fallback, Some(b'?'));

        config.fallback_glyph = Some('é');
        assert_eq!(config.fallback_byte(), None);
        config.fallback_glyph = Some('\n');
        assert_eq!(config.fallback_byte(), None);
    }

    #[test]
    fn test_selection_policy_conversion() {
        for policy in [SelectionPolicy::InsertAtCursor, SelectionPolicy::ReplaceRegion] {
            let data: SelectionPolicyData = policy.into();
            assert_eq!(SelectionPolicy::from(data), policy);
        }
    }
}
