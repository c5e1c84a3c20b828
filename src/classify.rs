//! Input classification by file extension.
//!
//! Every caller-supplied path is one of: a raster image we can place on a
//! slide, a PDF that has to be rasterized first, a folder of images, or
//! something we do not handle. Extension checks fold case at this boundary,
//! so `photo.PNG` and `photo.png` are the same thing everywhere else.

use std::fs;
use std::path::Path;

/// Raster image types accepted as slide sources.
///
/// HEIC/HEIF are accepted here so they are collected like any other photo,
/// but no decoder for them is compiled in: building a deck from one fails
/// with an unreadable-image error naming the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
    Tif,
    Tiff,
    Webp,
    Bmp,
    Gif,
    Ico,
    Heic,
    Heif,
}

impl ImageExtension {
    pub const ALL: &'static [ImageExtension] = &[
        ImageExtension::Png,
        ImageExtension::Jpg,
        ImageExtension::Jpeg,
        ImageExtension::Tif,
        ImageExtension::Tiff,
        ImageExtension::Webp,
        ImageExtension::Bmp,
        ImageExtension::Gif,
        ImageExtension::Ico,
        ImageExtension::Heic,
        ImageExtension::Heif,
    ];

    /// Lowercase extension without the dot.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageExtension::Png => "png",
            ImageExtension::Jpg => "jpg",
            ImageExtension::Jpeg => "jpeg",
            ImageExtension::Tif => "tif",
            ImageExtension::Tiff => "tiff",
            ImageExtension::Webp => "webp",
            ImageExtension::Bmp => "bmp",
            ImageExtension::Gif => "gif",
            ImageExtension::Ico => "ico",
            ImageExtension::Heic => "heic",
            ImageExtension::Heif => "heif",
        }
    }

    /// Case-insensitive parse of a bare extension (`"PNG"`, `"jpeg"`).
    pub fn parse(ext: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| ext.eq_ignore_ascii_case(e.as_str()))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
    }
}

/// What a caller-supplied path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Folder,
    Unknown,
}

/// Extension test only; the file need not exist.
pub fn is_supported_image(path: &Path) -> bool {
    ImageExtension::from_path(path).is_some()
}

pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Classify a path as a PDF, a folder of images, or unknown.
///
/// - `Pdf`: an existing file whose extension is `pdf` in any case.
/// - `Folder`: a directory with at least one supported image directly inside.
/// - `Unknown`: anything else, including empty directories, unsupported files
///   and paths that do not exist.
pub fn classify(path: &Path) -> InputKind {
    if path.is_file() && has_pdf_extension(path) {
        return InputKind::Pdf;
    }
    if path.is_dir() && dir_has_image(path) {
        return InputKind::Folder;
    }
    InputKind::Unknown
}

fn dir_has_image(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .any(|p| p.is_file() && is_supported_image(&p))
}
