//! Shared test utilities for the unit test suite.
//!
//! Fixture builders write small but real files: PNG and JPEG images through
//! the `image` encoders, PDFs through `lopdf`. Readers open a finished
//! `.pptx` with `zip` so tests can assert on the parts inside.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let photo = create_test_png(&tmp.path().join("a.png"), 100, 100);
//! write_test_pdf(&tmp.path().join("doc.pdf"), &[(612, 792)]);
//! ```

use image::{ImageEncoder, RgbImage};
use lopdf::{Document, Object, dictionary};
use std::io::Read;
use std::path::{Path, PathBuf};

// =========================================================================
// Image fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a `width` × `height` PNG and return its path.
pub fn create_test_png(path: &Path, width: u32, height: u32) -> PathBuf {
    gradient(width, height).save(path).unwrap();
    path.to_path_buf()
}

/// Encode a `width` × `height` JPEG into memory.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(
            gradient(width, height).as_raw(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    buf
}

/// Write a `width` × `height` JPEG and return its path.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) -> PathBuf {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
    path.to_path_buf()
}

/// Write a JPEG whose stored pixels are `width` × `height` and whose EXIF
/// orientation tag is `orientation` (6 = rotate 90° clockwise).
pub fn create_oriented_jpeg(path: &Path, width: u32, height: u32, orientation: u16) -> PathBuf {
    let jpeg = jpeg_bytes(width, height);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "encoder must emit SOI first");

    // Little-endian TIFF with a single IFD entry: 0x0112 SHORT x1
    let mut tiff = vec![b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);

    std::fs::write(path, out).unwrap();
    path.to_path_buf()
}

// =========================================================================
// PDF fixtures
// =========================================================================

/// Write a PDF with one empty page per `(width, height)` MediaBox, in points.
pub fn write_test_pdf(path: &Path, pages: &[(i64, i64)]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = pages
        .iter()
        .map(|&(width, height)| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0i64.into(), 0i64.into(), width.into(), height.into()],
            });
            page_id.into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

// =========================================================================
// Path helpers
// =========================================================================

/// File names of `paths`, in order.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

// =========================================================================
// Package readers
// =========================================================================

/// Read one part of a finished package as bytes. Panics if it is missing.
pub fn read_part(package: &Path, name: &str) -> Vec<u8> {
    let file = std::fs::File::open(package).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("part '{name}' not found in {}", package.display()));
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).unwrap();
    buf
}

pub fn read_part_string(package: &Path, name: &str) -> String {
    String::from_utf8(read_part(package, name)).unwrap()
}

/// Names of every part in a package, in archive order.
pub fn part_names(package: &Path) -> Vec<String> {
    let file = std::fs::File::open(package).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Number of `ppt/slides/slideN.xml` parts.
pub fn slide_count(package: &Path) -> usize {
    part_names(package)
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}
