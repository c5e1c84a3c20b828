//! Pure layout math: where an image goes on a slide.
//!
//! All functions here are pure and testable without any I/O or images.
//! Slide geometry is in inches; source geometry is in pixels. The only
//! place the two meet is the scale factor.

use crate::types::PlacementMode;
use serde::Serialize;

/// English Metric Units per inch, the coordinate unit of slide XML.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Convert inches to whole EMUs, rounding to nearest.
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Region of the source image that stays visible, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer pixel crop, guaranteed to lie inside the image it was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelCrop {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Round to whole pixels, clamped to an `image_width` × `image_height`
    /// source. The result is never smaller than 1×1.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> PixelCrop {
        let (width, x) = round_span(self.width, self.x, image_width);
        let (height, y) = round_span(self.height, self.y, image_height);
        PixelCrop {
            x,
            y,
            width,
            height,
        }
    }
}

fn round_span(len: f64, offset: f64, limit: u32) -> (u32, u32) {
    let len = (len.round() as u32).clamp(1, limit.max(1));
    let offset = (offset.round().max(0.0) as u32).min(limit.saturating_sub(len));
    (len, offset)
}

/// Where an image is drawn on its slide, in inches from the top-left corner.
///
/// `crop` is only present when the fill policy trims the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
}

impl PlacementRect {
    fn full_slide(slide_width_in: f64, slide_height_in: f64, crop: Option<CropRect>) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: slide_width_in,
            height: slide_height_in,
            crop,
        }
    }
}

/// Compute the placement of an image on a slide.
///
/// # Arguments
/// * `image_width_px`, `image_height_px` - Source size in pixels, after orientation
/// * `slide_width_in`, `slide_height_in` - Slide size in inches
/// * `mode` - [`PlacementMode::Fit`] letterboxes, [`PlacementMode::Fill`] crops
///
/// # Behavior
/// * **Fit**: `scale = min(W / w, H / h)`. The scaled image is centered and one
///   side touches the slide edge exactly. No crop.
/// * **Fill**: `scale = max(W / w, H / h)`. The image covers the whole slide;
///   the visible part of the source is `W / scale` × `H / scale` pixels,
///   centered.
/// * Equal aspect ratios (`w · H == h · W`) give the full slide and no crop
///   in both modes.
///
/// # Panics
/// If any dimension is zero, negative, or not finite. Callers validate
/// slide sizes with [`SlideSpec::new`](crate::types::SlideSpec::new) and
/// reject zero-area images before laying them out.
///
/// # Examples
/// ```
/// # use pptx_builder::imaging::compute_placement;
/// # use pptx_builder::PlacementMode;
/// // Square image on a 4:3 slide: height-bound, centered horizontally
/// let rect = compute_placement(100, 100, 10.0, 7.5, PlacementMode::Fit);
/// assert_eq!((rect.left, rect.top, rect.width, rect.height), (1.25, 0.0, 7.5, 7.5));
/// assert!(rect.crop.is_none());
/// ```
pub fn compute_placement(
    image_width_px: u32,
    image_height_px: u32,
    slide_width_in: f64,
    slide_height_in: f64,
    mode: PlacementMode,
) -> PlacementRect {
    assert!(
        image_width_px > 0 && image_height_px > 0,
        "image dimensions must be positive: {image_width_px}x{image_height_px}"
    );
    assert!(
        slide_width_in.is_finite()
            && slide_height_in.is_finite()
            && slide_width_in > 0.0
            && slide_height_in > 0.0,
        "slide dimensions must be positive: {slide_width_in}x{slide_height_in}"
    );

    let w = f64::from(image_width_px);
    let h = f64::from(image_height_px);
    let (sw, sh) = (slide_width_in, slide_height_in);

    if w * sh == h * sw {
        return PlacementRect::full_slide(sw, sh, None);
    }

    // Which slide side constrains the uniform scale.
    let width_bound = sw / w <= sh / h;

    match mode {
        PlacementMode::Fit => {
            let (placed_w, placed_h) = if width_bound {
                (sw, h * sw / w)
            } else {
                (w * sh / h, sh)
            };
            PlacementRect {
                left: (sw - placed_w) / 2.0,
                top: (sh - placed_h) / 2.0,
                width: placed_w,
                height: placed_h,
                crop: None,
            }
        }
        PlacementMode::Fill => {
            // Cover is bound by the opposite side to fit.
            let (visible_w, visible_h) = if width_bound {
                (sw * h / sh, h)
            } else {
                (w, sh * w / sw)
            };
            let crop = CropRect {
                x: (w - visible_w) / 2.0,
                y: (h - visible_h) / 2.0,
                width: visible_w,
                height: visible_h,
            };
            PlacementRect::full_slide(sw, sh, Some(crop))
        }
    }
}
