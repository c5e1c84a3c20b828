//! Input collection: caller paths → ordered slide images.
//!
//! The caller hands over a list of paths in the order the slides should
//! appear. Each one is expanded in place:
//!
//! ```text
//! cover.jpg        → cover.jpg
//! report.pdf       → work/001-report/page-1.png, page-2.png, ...
//! scans/           → scans/Apple.jpg, scans/banana.png, scans/zebra.png
//! notes.txt        → error: unsupported input
//! ```
//!
//! ## Ordering
//!
//! - Caller order is preserved across inputs.
//! - Folder contents are sorted by file name, ignoring case, with the exact
//!   name as a tie-break so the order never depends on the filesystem.
//! - PDF pages keep page order.
//!
//! Folders are not descended into. Nothing is skipped silently: an input
//! that is neither an image, a PDF, nor a folder with images is an error,
//! because every input is expected to produce at least one slide.

use crate::classify::{self, InputKind};
use crate::config::{self, ConfigError};
use crate::pdf::{self, PdfError, PdftoppmRasterizer, Rasterizer};
use crate::presets::SlideSizeChoice;
use crate::types::SlideSpec;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error("Not an image, PDF, or folder of images: {0}")]
    UnsupportedInput(PathBuf),
    #[error("No images to build from")]
    EmptyInput,
}

/// Supported images directly inside `dir`, sorted case-insensitively.
///
/// A missing or empty directory yields an empty list.
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut images: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && classify::is_supported_image(p))
        .collect();

    images.sort_by_cached_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        (name.to_lowercase(), name)
    });
    images
}

/// Resolve caller paths into the ordered image list, rasterizing PDFs with
/// the default `pdftoppm`.
pub fn collect_inputs(
    paths: &[PathBuf],
    dpi: u32,
    work_dir: &Path,
) -> Result<Vec<PathBuf>, CollectError> {
    collect_inputs_with(&PdftoppmRasterizer::default(), paths, dpi, work_dir)
}

/// Resolve caller paths using a specific rasterizer (allows testing with a fake).
///
/// Each PDF is rasterized into its own sub-directory of `work_dir`, named
/// after its position in `paths`, so two PDFs with the same file name never
/// collide.
pub fn collect_inputs_with(
    rasterizer: &impl Rasterizer,
    paths: &[PathBuf],
    dpi: u32,
    work_dir: &Path,
) -> Result<Vec<PathBuf>, CollectError> {
    let dpi = config::validate_dpi(dpi)?;
    let mut images = Vec::new();

    for (index, path) in paths.iter().enumerate() {
        if path.is_file() && classify::is_supported_image(path) {
            images.push(path.clone());
            continue;
        }

        match classify::classify(path) {
            InputKind::Pdf => {
                let out_dir = work_dir.join(pdf_work_dir_name(index, path));
                let pages = rasterizer.rasterize(path, dpi, &out_dir)?;
                debug!(pdf = %path.display(), pages = pages.len(), "expanded PDF");
                images.extend(pages);
            }
            InputKind::Folder => {
                let found = list_images(path);
                debug!(folder = %path.display(), images = found.len(), "expanded folder");
                images.extend(found);
            }
            InputKind::Unknown => return Err(CollectError::UnsupportedInput(path.clone())),
        }
    }

    if images.is_empty() {
        return Err(CollectError::EmptyInput);
    }
    Ok(images)
}

/// `001-report` for the first input `report.pdf`.
fn pdf_work_dir_name(index: usize, pdf: &Path) -> String {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{:03}-{}", index + 1, stem)
}

/// Turn a slide-size selection into a concrete size.
///
/// `MatchFirstPdf` reads the first page of the first PDF among `paths`
/// (caller order); without any PDF input it is a configuration error.
pub fn resolve_slide_size(
    choice: SlideSizeChoice,
    paths: &[PathBuf],
) -> Result<SlideSpec, CollectError> {
    match choice {
        SlideSizeChoice::Preset(preset) => Ok(preset.spec()),
        SlideSizeChoice::Custom(spec) => Ok(spec),
        SlideSizeChoice::MatchFirstPdf => {
            let first_pdf = paths
                .iter()
                .find(|p| classify::classify(p) == InputKind::Pdf)
                .ok_or_else(|| {
                    ConfigError::Validation(
                        "slide size \"auto\" needs at least one PDF input".into(),
                    )
                })?;
            let (width, height) = pdf::first_page_size_inches(first_pdf)?;
            Ok(SlideSpec::new(width, height)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::test_helpers::{file_names, write_test_pdf};
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    /// Rasterizer that writes empty page files and records its calls.
    #[derive(Default)]
    struct FakeRasterizer {
        pages_per_pdf: usize,
        calls: RefCell<Vec<(PathBuf, u32, PathBuf)>>,
    }

    impl FakeRasterizer {
        fn with_pages(pages_per_pdf: usize) -> Self {
            Self {
                pages_per_pdf,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(
            &self,
            pdf: &Path,
            dpi: u32,
            out_dir: &Path,
        ) -> Result<Vec<PathBuf>, PdfError> {
            self.calls
                .borrow_mut()
                .push((pdf.to_path_buf(), dpi, out_dir.to_path_buf()));
            fs::create_dir_all(out_dir)?;
            let pages = (1..=self.pages_per_pdf)
                .map(|n| {
                    let page = out_dir.join(format!("page-{n}.png"));
                    touch(&page);
                    page
                })
                .collect();
            Ok(pages)
        }
    }

    // =========================================================================
    // list_images
    // =========================================================================

    #[test]
    fn list_images_filters_and_sorts_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        for name in ["zebra.png", "Apple.jpg", "banana.png", "notes.txt"] {
            touch(&tmp.path().join(name));
        }

        let images = list_images(tmp.path());
        assert_eq!(
            file_names(&images),
            vec!["Apple.jpg", "banana.png", "zebra.png"]
        );
    }

    #[test]
    fn list_images_uppercase_extensions() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("IMAGE.PNG"));
        touch(&tmp.path().join("PHOTO.JPG"));
        assert_eq!(list_images(tmp.path()).len(), 2);
    }

    #[test]
    fn list_images_case_tie_broken_by_exact_name() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b.png"));
        touch(&tmp.path().join("B.png"));
        touch(&tmp.path().join("a.png"));

        let images = list_images(tmp.path());
        let names = file_names(&images);
        // Filesystems that fold case keep only one of b.png / B.png.
        if names.len() == 3 {
            assert_eq!(names, vec!["a.png", "B.png", "b.png"]);
        } else {
            assert_eq!(names[0], "a.png");
        }
    }

    #[test]
    fn list_images_is_not_recursive() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested.join("deep.png"));
        touch(&tmp.path().join("top.png"));

        assert_eq!(file_names(&list_images(tmp.path())), vec!["top.png"]);
    }

    #[test]
    fn list_images_skips_directories_with_image_names() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("album.png")).unwrap();
        assert!(list_images(tmp.path()).is_empty());
    }

    #[test]
    fn list_images_missing_dir_is_empty() {
        assert!(list_images(Path::new("/nonexistent/dir")).is_empty());
    }

    // =========================================================================
    // collect_inputs
    // =========================================================================

    #[test]
    fn collect_preserves_caller_order_and_expands_in_place() {
        let tmp = TempDir::new().unwrap();
        let folder = tmp.path().join("scans");
        fs::create_dir(&folder).unwrap();
        touch(&folder.join("b.png"));
        touch(&folder.join("A.png"));
        let cover = tmp.path().join("cover.jpg");
        touch(&cover);
        let pdf = tmp.path().join("report.pdf");
        touch(&pdf);
        let work = tmp.path().join("work");

        let rasterizer = FakeRasterizer::with_pages(2);
        let images = collect_inputs_with(
            &rasterizer,
            &[folder.clone(), pdf.clone(), cover.clone()],
            300,
            &work,
        )
        .unwrap();

        assert_eq!(
            images,
            vec![
                folder.join("A.png"),
                folder.join("b.png"),
                work.join("002-report").join("page-1.png"),
                work.join("002-report").join("page-2.png"),
                cover,
            ]
        );

        let calls = rasterizer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, pdf);
        assert_eq!(calls[0].1, 300);
    }

    #[test]
    fn collect_same_named_pdfs_get_separate_work_dirs() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        touch(&a.join("doc.pdf"));
        touch(&b.join("doc.pdf"));
        let work = tmp.path().join("work");

        let rasterizer = FakeRasterizer::with_pages(1);
        let images = collect_inputs_with(
            &rasterizer,
            &[a.join("doc.pdf"), b.join("doc.pdf")],
            150,
            &work,
        )
        .unwrap();

        assert_eq!(
            images,
            vec![
                work.join("001-doc").join("page-1.png"),
                work.join("002-doc").join("page-1.png"),
            ]
        );
    }

    #[test]
    fn collect_rejects_unknown_input() {
        let tmp = TempDir::new().unwrap();
        let txt = tmp.path().join("notes.txt");
        touch(&txt);

        let result = collect_inputs_with(
            &FakeRasterizer::default(),
            &[txt.clone()],
            300,
            tmp.path(),
        );
        assert!(matches!(result, Err(CollectError::UnsupportedInput(p)) if p == txt));
    }

    #[test]
    fn collect_rejects_empty_folder() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let result =
            collect_inputs_with(&FakeRasterizer::default(), &[empty], 300, tmp.path());
        assert!(matches!(result, Err(CollectError::UnsupportedInput(_))));
    }

    #[test]
    fn collect_rejects_missing_image_file() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.png");
        let result =
            collect_inputs_with(&FakeRasterizer::default(), &[missing], 300, tmp.path());
        assert!(matches!(result, Err(CollectError::UnsupportedInput(_))));
    }

    #[test]
    fn collect_no_paths_is_empty_input() {
        let tmp = TempDir::new().unwrap();
        let result = collect_inputs_with(&FakeRasterizer::default(), &[], 300, tmp.path());
        assert!(matches!(result, Err(CollectError::EmptyInput)));
    }

    #[test]
    fn collect_validates_dpi_before_rasterizing() {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("report.pdf");
        touch(&pdf);

        let rasterizer = FakeRasterizer::with_pages(1);
        let result = collect_inputs_with(&rasterizer, &[pdf], 0, tmp.path());
        assert!(matches!(
            result,
            Err(CollectError::Config(ConfigError::InvalidDpi(0)))
        ));
        assert!(rasterizer.calls.borrow().is_empty());
    }

    #[test]
    fn collect_propagates_rasterizer_errors() {
        struct Failing;
        impl Rasterizer for Failing {
            fn rasterize(&self, pdf: &Path, _: u32, _: &Path) -> Result<Vec<PathBuf>, PdfError> {
                Err(PdfError::Unreadable {
                    path: pdf.to_path_buf(),
                    reason: "document has no pages".into(),
                })
            }
        }

        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("report.pdf");
        touch(&pdf);
        let result = collect_inputs_with(&Failing, &[pdf], 300, tmp.path());
        assert!(matches!(
            result,
            Err(CollectError::Pdf(PdfError::Unreadable { .. }))
        ));
    }

    // =========================================================================
    // resolve_slide_size
    // =========================================================================

    #[test]
    fn resolve_preset_and_custom() {
        let preset = presets::preset("4x3").unwrap();
        assert_eq!(
            resolve_slide_size(SlideSizeChoice::Preset(preset), &[]).unwrap(),
            SlideSpec::new(10.0, 7.5).unwrap()
        );
        let custom = SlideSpec::new(5.0, 5.0).unwrap();
        assert_eq!(
            resolve_slide_size(SlideSizeChoice::Custom(custom), &[]).unwrap(),
            custom
        );
    }

    #[test]
    fn resolve_auto_uses_first_pdf_in_caller_order() {
        let tmp = TempDir::new().unwrap();
        let image = tmp.path().join("cover.png");
        touch(&image);
        let landscape = tmp.path().join("landscape.pdf");
        write_test_pdf(&landscape, &[(792, 612)]);
        let portrait = tmp.path().join("portrait.pdf");
        write_test_pdf(&portrait, &[(612, 792)]);

        let spec = resolve_slide_size(
            SlideSizeChoice::MatchFirstPdf,
            &[image, landscape, portrait],
        )
        .unwrap();
        assert!((spec.width_in - 11.0).abs() < 1e-9);
        assert!((spec.height_in - 8.5).abs() < 1e-9);
    }

    #[test]
    fn resolve_auto_without_pdf_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let image = tmp.path().join("cover.png");
        touch(&image);
        let result = resolve_slide_size(SlideSizeChoice::MatchFirstPdf, &[image]);
        assert!(matches!(
            result,
            Err(CollectError::Config(ConfigError::Validation(_)))
        ));
    }
}
