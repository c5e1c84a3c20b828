//! # pptx-builder
//!
//! Batch-converts PDFs and images into a single `.pptx`, one image per
//! slide. Every slide in a deck has the same physical size; each image is
//! either fitted inside it (letterboxed) or made to fill it (center-cropped).
//!
//! # Pipeline
//!
//! ```text
//! 1. Collect   paths      →  ordered image files   (PDF pages rendered to PNG)
//! 2. Layout    image size →  placement on the slide (pure math)
//! 3. Build     images     →  deck.pptx              (zip of XML parts + media)
//! ```
//!
//! Collection is the only stage that knows about PDFs and folders. The
//! builder takes a flat list of image files, so anything that can produce
//! images (a scanner, a screenshot tool) can feed it directly.
//!
//! ```no_run
//! use pptx_builder::{PlacementMode, builder, collect, presets};
//! use std::path::{Path, PathBuf};
//!
//! let inputs = vec![PathBuf::from("report.pdf"), PathBuf::from("photos/")];
//! let work = tempfile::TempDir::new()?;
//! let images = collect::collect_inputs(&inputs, 300, work.path())?;
//! let slide = presets::preset("16x9")?.spec();
//! builder::build_presentation(
//!     &images,
//!     Path::new("deck.pptx"),
//!     slide.width_in,
//!     slide.height_in,
//!     PlacementMode::Fit,
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`classify`] | Extension-based input classification (image / PDF / folder / unknown) |
//! | [`collect`] | Expands caller paths into the ordered image list; resolves "auto" slide size |
//! | [`pdf`] | `Rasterizer` trait, `pdftoppm` adapter, page geometry via `lopdf` |
//! | [`imaging`] | Layout engine plus decode, orient, crop and encode |
//! | [`pptx`] | Package parts and the streaming zip writer |
//! | [`builder`] | One slide per image, written atomically |
//! | [`presets`] | Named slide sizes |
//! | [`config`] | `pptx-builder.toml` loading, merging and validation |
//! | [`types`] | `SlideSpec`, `PlacementMode` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## PDF Rendering Out of Process
//!
//! Rendering PDF pages well means fonts, color management and a decade of
//! workarounds for broken files. Poppler already has them, so pages are
//! rendered by `pdftoppm` behind the [`pdf::Rasterizer`] trait. Geometry (page
//! count, first-page size) is cheap to read and is done in-process with
//! `lopdf`.
//!
//! ## Cropping Pixels, Not Pictures
//!
//! Fill mode crops the source pixels before embedding instead of asking the
//! viewer to crop. The embedded image is exactly what is shown, so file size
//! does not carry invisible pixels and every viewer renders the same thing.
//!
//! ## Nothing Half-Written
//!
//! A deck is streamed into a temporary file beside the destination and
//! renamed into place only after the last part is written. A failed build
//! never leaves a truncated `.pptx` behind.

pub mod builder;
pub mod classify;
pub mod collect;
pub mod config;
pub mod imaging;
pub mod output;
pub mod pdf;
pub mod pptx;
pub mod presets;
pub mod types;

pub use builder::{BuildError, PresentationArtifact, build_presentation};
pub use types::{PlacementMode, SlideSpec};

#[cfg(test)]
pub(crate) mod test_helpers;
