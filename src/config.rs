//! Builder configuration.
//!
//! Handles loading, validating, and merging `pptx-builder.toml`. Stock
//! defaults are the base layer; a user file only needs the keys it wants to
//! change, and command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [slides]
//! size = "16x9"      # Preset key (16x9, 4x3, letter, a4, legal, tabloid) or "auto"
//! # width = 10.0     # Custom size in inches (set width and height together)
//! # height = 7.5
//! mode = "fit"       # fit = letterbox, fill = crop to cover
//!
//! [pdf]
//! dpi = 300          # Rasterization resolution, 72-1200
//! pdftoppm = "pdftoppm"
//! ```
//!
//! `size = "auto"` sizes every slide to the first page of the first PDF among
//! the inputs.
//!
//! Unknown keys are rejected to catch typos early.

use crate::presets::{self, DEFAULT_PRESET, SlideSizeChoice};
use crate::types::{PlacementMode, SlideSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILENAME: &str = "pptx-builder.toml";

/// Lowest accepted rasterization resolution.
pub const MIN_DPI: u32 = 72;
/// Highest accepted rasterization resolution.
pub const MAX_DPI: u32 = 1200;
pub const DEFAULT_DPI: u32 = 300;

/// Value of `slides.size` that matches the first PDF page.
pub const AUTO_SIZE: &str = "auto";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Unknown slide size preset: {0}")]
    UnknownPreset(String),
    #[error("Invalid placement mode {0:?} (expected \"fit\" or \"fill\")")]
    InvalidMode(String),
    #[error("Invalid DPI {0} (expected {MIN_DPI}-{MAX_DPI})")]
    InvalidDpi(u32),
    #[error("Invalid slide size {width} x {height} (both sides must be positive)")]
    InvalidSlideSize { width: f64, height: f64 },
}

/// Reject resolutions outside [`MIN_DPI`]..=[`MAX_DPI`].
pub fn validate_dpi(dpi: u32) -> Result<u32, ConfigError> {
    if (MIN_DPI..=MAX_DPI).contains(&dpi) {
        Ok(dpi)
    } else {
        Err(ConfigError::InvalidDpi(dpi))
    }
}

/// Configuration loaded from `pptx-builder.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderConfig {
    /// Slide size and placement.
    pub slides: SlidesConfig,
    /// PDF rasterization.
    pub pdf: PdfConfig,
}

impl BuilderConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dpi(self.pdf.dpi)?;
        if self.pdf.pdftoppm.trim().is_empty() {
            return Err(ConfigError::Validation(
                "pdf.pdftoppm must not be empty".into(),
            ));
        }
        self.slides.size_choice()?;
        Ok(())
    }
}

/// Slide size and placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlidesConfig {
    /// Preset key, or `"auto"` to match the first PDF page.
    pub size: String,
    /// Custom width in inches. Overrides `size` when set together with `height`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Custom height in inches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Placement policy for every slide.
    pub mode: PlacementMode,
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PRESET.to_string(),
            width: None,
            height: None,
            mode: PlacementMode::Fit,
        }
    }
}

impl SlidesConfig {
    /// Interpret `size` / `width` / `height` as a slide-size selection.
    pub fn size_choice(&self) -> Result<SlideSizeChoice, ConfigError> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Ok(SlideSizeChoice::Custom(SlideSpec::new(w, h)?)),
            (None, None) if self.size.eq_ignore_ascii_case(AUTO_SIZE) => {
                Ok(SlideSizeChoice::MatchFirstPdf)
            }
            (None, None) => Ok(SlideSizeChoice::Preset(presets::preset(&self.size)?)),
            _ => Err(ConfigError::Validation(
                "slides.width and slides.height must be set together".into(),
            )),
        }
    }
}

/// PDF rasterization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdfConfig {
    /// Resolution PDF pages are rendered at.
    pub dpi: u32,
    /// Program used to render pages (poppler's `pdftoppm`).
    pub pdftoppm: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            pdftoppm: "pdftoppm".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BuilderConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BuilderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: BuilderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `pptx-builder.toml` from `dir`, falling back to stock defaults when
/// the file does not exist.
pub fn load_config(dir: &Path) -> Result<BuilderConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return resolve_config(stock_defaults_value(), None);
    }
    load_config_file(&path)
}

/// Load an explicit config file. A missing file is an error here.
pub fn load_config_file(path: &Path) -> Result<BuilderConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(value))
}

/// Returns a fully-commented stock `pptx-builder.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pptx-builder configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Slides
# ---------------------------------------------------------------------------
[slides]
# Slide size preset: 16x9, 4x3, letter, a4, legal, tabloid.
# "auto" sizes slides to the first page of the first input PDF.
size = "16x9"

# Custom slide size in inches. Set both to override `size`.
# width = 10.0
# height = 7.5

# Image placement:
#   fit  - whole image visible, centered, empty margins on the short axis
#   fill - image covers the slide, overflow is center-cropped
mode = "fit"

# ---------------------------------------------------------------------------
# PDF rasterization
# ---------------------------------------------------------------------------
[pdf]
# Resolution pages are rendered at (72-1200).
dpi = 300

# Renderer program (poppler-utils).
pdftoppm = "pdftoppm"
"##
}
