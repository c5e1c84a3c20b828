//! Image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, BMP, GIF, ICO) | `image` crate (pure Rust decoders) |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `DynamicImage::write_to` |
//!
//! ## What gets embedded
//!
//! Every source is fully decoded, even one that is embedded unchanged: a
//! valid header in front of a truncated body must fail here rather than
//! land in the deck as a broken picture.
//!
//! An upright PNG or JPEG that needs no crop is embedded byte-for-byte.
//! Anything else is turned upright, cropped if requested and re-encoded:
//! JPEG sources stay JPEG (at the requested quality), every other source
//! becomes PNG so transparency and exact pixels survive.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodedImage, MediaFormat, PrepareParams};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), err))
}

/// Sniff the container format and EXIF orientation without decoding pixels.
fn probe(bytes: &[u8], path: &Path) -> Result<(Option<ImageFormat>, Orientation), BackendError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader.format();
    let mut decoder = reader.into_decoder().map_err(|e| decode_error(path, e))?;
    // A damaged EXIF block is not worth failing the slide over.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    Ok((format, orientation))
}

/// Decode to pixels and turn upright.
fn decode_upright(bytes: &[u8], path: &Path) -> Result<DynamicImage, BackendError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let mut decoder = reader.into_decoder().map_err(|e| decode_error(path, e))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Width and height as displayed after applying `orientation`.
pub(crate) fn oriented_dimensions(width: u32, height: u32, orientation: Orientation) -> (u32, u32) {
    match orientation {
        Orientation::Rotate90
        | Orientation::Rotate270
        | Orientation::Rotate90FlipH
        | Orientation::Rotate270FlipH => (height, width),
        _ => (width, height),
    }
}

fn encode(img: &DynamicImage, format: MediaFormat, quality: u8) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let result = match format {
        MediaFormat::Jpeg => {
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        MediaFormat::Png => {
            let img = match img {
                // PNG has no float samples
                DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                    DynamicImage::ImageRgba16(img.to_rgba16())
                }
                other => other.clone(),
            };
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        }
    };
    result.map_err(|e| BackendError::ProcessingFailed(format!("Failed to encode image: {e}")))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let bytes = std::fs::read(path)?;
        let mut decoder = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let (width, height) = decoder.dimensions();
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "{} has no pixels ({width}x{height})",
                path.display()
            )));
        }

        // The header alone says nothing about the pixel data behind it.
        DynamicImage::from_decoder(decoder).map_err(|e| decode_error(path, e))?;

        let (width, height) = oriented_dimensions(width, height, orientation);
        Ok(Dimensions { width, height })
    }

    fn prepare(&self, params: &PrepareParams) -> Result<EncodedImage, BackendError> {
        let path = params.source.as_path();
        let bytes = std::fs::read(path)?;
        let (source_format, orientation) = probe(&bytes, path)?;
        let mut img = decode_upright(&bytes, path)?;

        let untouched = params.crop.is_none() && orientation == Orientation::NoTransforms;
        let passthrough = match source_format {
            Some(ImageFormat::Png) => Some(MediaFormat::Png),
            Some(ImageFormat::Jpeg) => Some(MediaFormat::Jpeg),
            _ => None,
        };
        if let (true, Some(format)) = (untouched, passthrough) {
            debug!(path = %path.display(), ?format, "embedding source bytes unchanged");
            return Ok(EncodedImage { bytes, format });
        }

        if let Some(crop) = params.crop {
            img = img.crop_imm(crop.x, crop.y, crop.width, crop.height);
        }

        let format = if source_format == Some(ImageFormat::Jpeg) {
            MediaFormat::Jpeg
        } else {
            MediaFormat::Png
        };
        debug!(
            path = %path.display(),
            ?format,
            width = img.width(),
            height = img.height(),
            "re-encoding slide image"
        );
        let bytes = encode(&img, format, params.quality.value() as u8)?;
        Ok(EncodedImage { bytes, format })
    }
}
