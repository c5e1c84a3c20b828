//! High-level image operations.
//!
//! These functions combine calculations with backend execution: identify a
//! source, lay it out on a slide, then ask the backend for the bytes.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{PixelCrop, PlacementRect, compute_placement};
use super::params::{EncodedImage, PrepareParams, Quality};
use crate::types::{PlacementMode, SlideSpec};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// How one source image will appear on its slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideImagePlan {
    pub source: PathBuf,
    pub dimensions: Dimensions,
    pub placement: PlacementRect,
    /// Pixel crop derived from `placement.crop`.
    pub crop: Option<PixelCrop>,
}

/// Lay out an image whose oriented size is already known.
///
/// Pure; useful for testing parameter generation.
pub fn plan_slide_image(
    source: &Path,
    dimensions: Dimensions,
    slide: SlideSpec,
    mode: PlacementMode,
) -> SlideImagePlan {
    let placement = compute_placement(
        dimensions.width,
        dimensions.height,
        slide.width_in,
        slide.height_in,
        mode,
    );
    let crop = placement
        .crop
        .map(|c| c.to_pixels(dimensions.width, dimensions.height));

    SlideImagePlan {
        source: source.to_path_buf(),
        dimensions,
        placement,
        crop,
    }
}

/// Identify `source` with the backend, then plan its slide.
pub fn identify_and_plan(
    backend: &impl ImageBackend,
    source: &Path,
    slide: SlideSpec,
    mode: PlacementMode,
) -> Result<SlideImagePlan> {
    let dimensions = backend.identify(source)?;
    Ok(plan_slide_image(source, dimensions, slide, mode))
}

/// Produce the bytes to embed for a planned slide.
pub fn render_slide_image(
    backend: &impl ImageBackend,
    plan: &SlideImagePlan,
    quality: Quality,
) -> Result<EncodedImage> {
    backend.prepare(&PrepareParams {
        source: plan.source.clone(),
        crop: plan.crop,
        quality,
    })
}
