//! Slide-size presets.
//!
//! The table is static data: keys are stable identifiers used on the command
//! line and in `pptx-builder.toml`, labels are what a picker would show, and
//! the dimensions are in inches. Callers already depend on these exact
//! numbers, so changing one changes every deck built with it.
//!
//! | Key | Label | Inches |
//! |---|---|---|
//! | `16x9` | 16:9 (Widescreen) | 13.333 × 7.5 |
//! | `4x3` | 4:3 (Standard) | 10 × 7.5 |
//! | `letter` | Letter (11" x 8.5") | 11 × 8.5 |
//! | `a4` | A4 (11.69" x 8.27") | 11.69 × 8.27 |
//! | `legal` | Legal (14" x 8.5") | 14 × 8.5 |
//! | `tabloid` | Tabloid (17" x 11") | 17 × 11 |

use crate::config::ConfigError;
use crate::types::SlideSpec;

/// A named slide size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSizePreset {
    pub key: &'static str,
    pub label: &'static str,
    pub width_in: f64,
    pub height_in: f64,
}

impl SlideSizePreset {
    pub fn spec(&self) -> SlideSpec {
        SlideSpec {
            width_in: self.width_in,
            height_in: self.height_in,
        }
    }
}

/// Where the slide size for a build comes from.
///
/// `MatchFirstPdf` can only be turned into a [`SlideSpec`] once the inputs
/// are known; see [`crate::collect::resolve_slide_size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideSizeChoice {
    Preset(&'static SlideSizePreset),
    Custom(SlideSpec),
    MatchFirstPdf,
}

/// Key of the preset used when nothing else is configured.
pub const DEFAULT_PRESET: &str = "16x9";

pub const SLIDE_SIZES: &[SlideSizePreset] = &[
    SlideSizePreset {
        key: "16x9",
        label: "16:9 (Widescreen)",
        width_in: 13.333,
        height_in: 7.5,
    },
    SlideSizePreset {
        key: "4x3",
        label: "4:3 (Standard)",
        width_in: 10.0,
        height_in: 7.5,
    },
    SlideSizePreset {
        key: "letter",
        label: "Letter (11\" x 8.5\")",
        width_in: 11.0,
        height_in: 8.5,
    },
    SlideSizePreset {
        key: "a4",
        label: "A4 (11.69\" x 8.27\")",
        width_in: 11.69,
        height_in: 8.27,
    },
    SlideSizePreset {
        key: "legal",
        label: "Legal (14\" x 8.5\")",
        width_in: 14.0,
        height_in: 8.5,
    },
    SlideSizePreset {
        key: "tabloid",
        label: "Tabloid (17\" x 11\")",
        width_in: 17.0,
        height_in: 11.0,
    },
];

/// Look up a preset by key.
///
/// Matching ignores ASCII case and accepts the ratio spelling with a colon,
/// so `16:9`, `16X9` and `16x9` all resolve to the widescreen preset.
pub fn find_preset(key: &str) -> Option<&'static SlideSizePreset> {
    let normalized = key.trim().to_ascii_lowercase().replace(':', "x");
    SLIDE_SIZES.iter().find(|p| p.key == normalized)
}

/// Like [`find_preset`], but an unknown key is a configuration error.
pub fn preset(key: &str) -> Result<&'static SlideSizePreset, ConfigError> {
    find_preset(key).ok_or_else(|| ConfigError::UnknownPreset(key.to_string()))
}
