//! PDF input: page geometry and rasterization.
//!
//! Rendering PDF pages is not done in-process. The [`Rasterizer`] trait is the
//! seam; [`PdftoppmRasterizer`] runs poppler's `pdftoppm` and collects the
//! page images it writes. Page counting and first-page geometry are read
//! directly with `lopdf`, which is enough to size slides to the source
//! document and to check that every page came back from the renderer.
//!
//! ## Ownership of page images
//!
//! Rasterized pages are written into a directory the caller chooses and are
//! never deleted here once returned. The CLI hands in a scoped temporary
//! directory; library users own theirs. Rendering into a directory that
//! already holds `page-N.png` files from an earlier run replaces them.
//!
//! ```text
//! work/
//! └── 001-report/
//!     ├── page-01.png
//!     ├── page-02.png
//!     └── ...
//! ```

use crate::config::{self, ConfigError};
use lopdf::{Dictionary, Document, Object};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

/// PostScript points per inch; PDF user space defaults to this unit.
pub const POINTS_PER_INCH: f64 = 72.0;

/// File-name prefix of rasterized pages inside the output directory.
const PAGE_PREFIX: &str = "page";

/// Page-tree levels walked when looking for an inherited attribute.
const MAX_INHERIT_DEPTH: usize = 32;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Unreadable PDF {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("PDF renderer {program:?} could not be started: {source}")]
    RasterizerUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Rasterizing {path} failed: {stderr}")]
    RasterizeFailed { path: PathBuf, stderr: String },
}

fn unreadable(path: &Path, reason: impl Into<String>) -> PdfError {
    PdfError::Unreadable {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Renders every page of a PDF to an image file.
///
/// Implementations must return one path per page, in page order, all inside
/// `out_dir`.
pub trait Rasterizer {
    fn rasterize(&self, pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<PathBuf>, PdfError>;
}

/// Rasterizer backed by poppler's `pdftoppm` command.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    program: String,
}

impl PdftoppmRasterizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<PathBuf>, PdfError> {
        let dpi = config::validate_dpi(dpi)?;
        let expected = page_count(pdf)?;

        fs::create_dir_all(out_dir)?;
        remove_stale_pages(out_dir)?;
        let prefix = out_dir.join(PAGE_PREFIX);

        debug!(pdf = %pdf.display(), dpi, pages = expected, "rasterizing");
        let output = Command::new(&self.program)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|source| PdfError::RasterizerUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PdfError::RasterizeFailed {
                path: pdf.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let pages = collect_page_images(out_dir)?;
        if pages.len() != expected {
            return Err(unreadable(
                pdf,
                format!(
                    "expected {expected} page images, renderer produced {}",
                    pages.len()
                ),
            ));
        }
        Ok(pages)
    }
}

/// Rasterize with the default `pdftoppm` found on `PATH`.
pub fn rasterize(pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<PathBuf>, PdfError> {
    PdftoppmRasterizer::default().rasterize(pdf, dpi, out_dir)
}

/// Page images written by the renderer, ordered by page number.
///
/// `pdftoppm` zero-pads the page number to the width of the page count
/// (`page-1.png` or `page-01.png`), so ordering is numeric, not lexical.
fn collect_page_images(out_dir: &Path) -> Result<Vec<PathBuf>, PdfError> {
    let mut pages: Vec<(u32, PathBuf)> = fs::read_dir(out_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter_map(|p| {
            let name = p.file_name()?.to_str()?;
            page_number(name).map(|n| (n, p.clone()))
        })
        .collect();
    pages.sort_by_key(|(n, _)| *n);
    Ok(pages.into_iter().map(|(_, p)| p).collect())
}

/// Delete page images left by an earlier run in the same directory.
///
/// A reused work directory may hold more pages than the document now has, or
/// pages padded to a different width. Other files are left alone.
fn remove_stale_pages(out_dir: &Path) -> Result<(), PdfError> {
    let stale = collect_page_images(out_dir)?;
    if !stale.is_empty() {
        debug!(dir = %out_dir.display(), pages = stale.len(), "removing stale page images");
    }
    for page in stale {
        fs::remove_file(page)?;
    }
    Ok(())
}

/// Parse `page-<n>.png` into `n`.
fn page_number(file_name: &str) -> Option<u32> {
    let rest = file_name.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?;
    let digits = rest.strip_suffix(".png")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// ============================================================================
// Page geometry
// ============================================================================

fn load(path: &Path) -> Result<Document, PdfError> {
    Document::load(path).map_err(|e| unreadable(path, e.to_string()))
}

/// Number of pages. A document without pages is unreadable.
pub fn page_count(path: &Path) -> Result<usize, PdfError> {
    let doc = load(path)?;
    let count = doc.get_pages().len();
    if count == 0 {
        return Err(unreadable(path, "document has no pages"));
    }
    Ok(count)
}

/// Physical size of the first page in inches, as displayed.
///
/// The MediaBox may be inherited from an ancestor in the page tree, and a
/// `/Rotate` of 90 or 270 swaps width and height. A page without any
/// MediaBox falls back to US Letter.
pub fn first_page_size_inches(path: &Path) -> Result<(f64, f64), PdfError> {
    let doc = load(path)?;
    let page_id = doc
        .get_pages()
        .into_values()
        .next()
        .ok_or_else(|| unreadable(path, "document has no pages"))?;
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| unreadable(path, e.to_string()))?;

    let media_box = inherited(&doc, page, b"MediaBox").and_then(|o| box_size(&doc, o));
    let (width_pt, height_pt) = match media_box {
        Some(size) => size,
        None => {
            warn!(pdf = %path.display(), "MediaBox not found on first page, using US Letter");
            (612.0, 792.0)
        }
    };

    let rotate = inherited(&doc, page, b"Rotate")
        .and_then(|o| resolve(&doc, o).as_i64().ok())
        .unwrap_or(0);
    let (width_pt, height_pt) = if rotate.rem_euclid(180) == 90 {
        (height_pt, width_pt)
    } else {
        (width_pt, height_pt)
    };

    Ok((width_pt / POINTS_PER_INCH, height_pt / POINTS_PER_INCH))
}

/// Follow an indirect reference, returning the object itself otherwise.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Look up an inheritable page attribute, walking `/Parent` links.
fn inherited<'a>(doc: &'a Document, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut node = page;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = match node.get(b"Parent").ok()? {
            Object::Reference(id) => doc.get_dictionary(*id).ok()?,
            _ => return None,
        };
        node = parent;
    }
    None
}

/// Width and height of a `[x1 y1 x2 y2]` rectangle.
fn box_size(doc: &Document, obj: &Object) -> Option<(f64, f64)> {
    let Object::Array(values) = resolve(doc, obj) else {
        return None;
    };
    if values.len() < 4 {
        return None;
    }
    let coords: Vec<f64> = values
        .iter()
        .take(4)
        .map(|v| as_f64(resolve(doc, v)))
        .collect::<Option<_>>()?;
    let width = (coords[2] - coords[0]).abs();
    let height = (coords[3] - coords[1]).abs();
    (width > 0.0 && height > 0.0).then_some((width, height))
}

fn as_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}
