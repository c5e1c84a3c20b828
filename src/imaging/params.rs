//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the [`operations`](super::operations) module (which decides what each
//! slide shows) and the [`backend`](super::backend) (which does the pixel
//! work), so tests can swap in a mock backend without touching the layout
//! logic.
//!
//! - [`Quality`]: lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`PrepareParams`]: source path, optional pixel crop, quality.
//! - [`MediaFormat`] / [`EncodedImage`]: the bytes that end up in the package.

use super::calculations::PixelCrop;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Everything a backend needs to produce the embedded bytes for one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareParams {
    pub source: PathBuf,
    /// Region to keep, in oriented source pixels. `None` keeps the whole image.
    pub crop: Option<PixelCrop>,
    /// Only used when the output is JPEG.
    pub quality: Quality,
}

/// Encodings a slide picture can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Png,
    Jpeg,
}

impl MediaFormat {
    /// File extension used for the part name inside the package.
    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Png => "png",
            MediaFormat::Jpeg => "jpeg",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            MediaFormat::Png => "image/png",
            MediaFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Encoded image ready to be stored as a media part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: MediaFormat,
}
