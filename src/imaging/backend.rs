//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations a build needs from
//! an image library: identify (oriented pixel size) and prepare (the bytes
//! to embed, cropped when the slide is filled).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the mock in this module so layout and packaging can be
//! checked without decoding anything.

use super::params::{EncodedImage, PrepareParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
///
/// Width and height are as displayed: an EXIF rotation of 90° or 270° has
/// already swapped them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend: Sync {
    /// Get oriented image dimensions. Zero-area images are an error.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Produce the bytes to embed for one slide.
    ///
    /// The crop in `params` is applied after orientation, in the same pixel
    /// space [`identify`](Self::identify) reports.
    fn prepare(&self, params: &PrepareParams) -> Result<EncodedImage, BackendError>;
}
