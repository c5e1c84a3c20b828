//! Types shared between the collector, the layout engine and the builder.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical slide size for a whole presentation, in inches.
///
/// Every slide in a deck has the same size. Construct through
/// [`SlideSpec::new`] when the numbers come from outside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    pub width_in: f64,
    pub height_in: f64,
}

impl SlideSpec {
    /// Validate and build a slide size. Both sides must be finite and positive.
    pub fn new(width_in: f64, height_in: f64) -> Result<Self, ConfigError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width_in) || !valid(height_in) {
            return Err(ConfigError::InvalidSlideSize {
                width: width_in,
                height: height_in,
            });
        }
        Ok(Self {
            width_in,
            height_in,
        })
    }
}

impl fmt::Display for SlideSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\" x {}\"", self.width_in, self.height_in)
    }
}

/// How an image is placed on its slide.
///
/// - `Fit`: the whole image is visible, letterboxed on the short axis.
/// - `Fill`: the slide is fully covered, overflow is center-cropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    #[default]
    Fit,
    Fill,
}

impl PlacementMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PlacementMode::Fit => "fit",
            PlacementMode::Fill => "fill",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(PlacementMode::Fit),
            "fill" => Ok(PlacementMode::Fill),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}
