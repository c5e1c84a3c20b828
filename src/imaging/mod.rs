//! Image handling: layout math plus decode, orient, crop and encode.
//!
//! | Operation | Where |
//! |---|---|
//! | **Layout** | [`compute_placement`], pure math |
//! | **Identify** | `ImageDecoder::dimensions` + EXIF orientation |
//! | **Prepare** | passthrough, or decode → orient → crop → JPEG/PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    CropRect, EMU_PER_INCH, PixelCrop, PlacementRect, compute_placement, inches_to_emu,
};
pub use operations::{SlideImagePlan, identify_and_plan, plan_slide_image, render_slide_image};
pub use params::{EncodedImage, MediaFormat, PrepareParams, Quality};
pub use rust_backend::RustBackend;
