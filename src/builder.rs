//! Presentation building.
//!
//! Takes an ordered list of image files and writes a `.pptx` with one slide
//! per image. The builder knows nothing about PDFs or folders; that is
//! [`collect`](crate::collect)'s job.
//!
//! ## Steps
//!
//! ```text
//! validate slide size          → ConfigError, nothing touched
//! images empty?                → EmptyInput, nothing touched
//! identify + lay out every image → UnreadableImage on the first bad one
//! stream slides into a temp file next to the output
//! rename temp file onto output_path
//! ```
//!
//! Every image is identified before any pixels are encoded, so a bad file
//! late in a long list fails fast. The temporary package is deleted when it
//! is dropped, which makes "no file at `output_path` on failure" hold on
//! every error path, panics included.

use crate::config::ConfigError;
use crate::imaging::{
    ImageBackend, PlacementRect, Quality, RustBackend, SlideImagePlan, identify_and_plan,
    inches_to_emu, render_slide_image,
};
use crate::pptx::{EmuRect, PackageError, PackageWriter};
use crate::types::{PlacementMode, SlideSpec};
use serde::Serialize;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No images to put on slides")]
    EmptyInput,
    #[error("Cannot read image {path}: {reason}")]
    UnreadableImage { path: PathBuf, reason: String },
    #[error("Failed to write presentation: {0}")]
    Package(#[from] PackageError),
}

/// One slide as built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideRecord {
    /// 1-based position in the deck.
    pub number: usize,
    pub source: PathBuf,
    /// Oriented source size in pixels.
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub placement: PlacementRect,
}

impl SlideRecord {
    fn from_plan(number: usize, plan: &SlideImagePlan) -> Self {
        Self {
            number,
            source: plan.source.clone(),
            pixel_width: plan.dimensions.width,
            pixel_height: plan.dimensions.height,
            placement: plan.placement,
        }
    }
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationArtifact {
    pub path: PathBuf,
    pub slide: SlideSpec,
    pub mode: PlacementMode,
    pub slides: Vec<SlideRecord>,
}

/// Build a presentation with the default image backend.
pub fn build_presentation(
    images: &[PathBuf],
    output_path: &Path,
    slide_width_in: f64,
    slide_height_in: f64,
    mode: PlacementMode,
) -> Result<PresentationArtifact, BuildError> {
    let slide = SlideSpec::new(slide_width_in, slide_height_in)?;
    build_presentation_with_backend(&RustBackend::new(), images, output_path, slide, mode)
}

/// Identify and lay out every image without writing anything.
pub fn plan_slides(
    backend: &impl ImageBackend,
    images: &[PathBuf],
    slide: SlideSpec,
    mode: PlacementMode,
) -> Result<Vec<SlideImagePlan>, BuildError> {
    SlideSpec::new(slide.width_in, slide.height_in)?;
    if images.is_empty() {
        return Err(BuildError::EmptyInput);
    }

    images
        .iter()
        .map(|path| {
            identify_and_plan(backend, path, slide, mode).map_err(|e| {
                BuildError::UnreadableImage {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

/// Like [`plan_slides`], but returns the serializable per-slide records.
pub fn plan_records(
    backend: &impl ImageBackend,
    images: &[PathBuf],
    slide: SlideSpec,
    mode: PlacementMode,
) -> Result<Vec<SlideRecord>, BuildError> {
    let plans = plan_slides(backend, images, slide, mode)?;
    Ok(plans
        .iter()
        .enumerate()
        .map(|(i, plan)| SlideRecord::from_plan(i + 1, plan))
        .collect())
}

/// Build a presentation using a specific backend.
pub fn build_presentation_with_backend(
    backend: &impl ImageBackend,
    images: &[PathBuf],
    output_path: &Path,
    slide: SlideSpec,
    mode: PlacementMode,
) -> Result<PresentationArtifact, BuildError> {
    let plans = plan_slides(backend, images, slide, mode)?;

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_builder = tempfile::Builder::new();
    temp_builder.prefix(".pptx-builder-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Requested at creation, so the umask applies as for any new file.
        temp_builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let temp = temp_builder.tempfile_in(dir)?;
    // A deck being replaced keeps its mode.
    if let Ok(existing) = std::fs::metadata(output_path) {
        temp.as_file().set_permissions(existing.permissions())?;
    }

    let mut package = PackageWriter::new(
        BufWriter::new(temp),
        inches_to_emu(slide.width_in),
        inches_to_emu(slide.height_in),
    );
    let mut slides = Vec::with_capacity(plans.len());

    for (i, plan) in plans.iter().enumerate() {
        let number = i + 1;
        let encoded = render_slide_image(backend, plan, Quality::default()).map_err(|e| {
            BuildError::UnreadableImage {
                path: plan.source.clone(),
                reason: e.to_string(),
            }
        })?;

        let rect = EmuRect {
            x: inches_to_emu(plan.placement.left),
            y: inches_to_emu(plan.placement.top),
            cx: inches_to_emu(plan.placement.width),
            cy: inches_to_emu(plan.placement.height),
        };
        let description = plan
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        package.add_picture_slide(&encoded, rect, &description)?;

        debug!(
            slide = number,
            source = %plan.source.display(),
            width_px = plan.dimensions.width,
            height_px = plan.dimensions.height,
            cropped = plan.crop.is_some(),
            "placed image"
        );
        slides.push(SlideRecord::from_plan(number, plan));
    }

    let title = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = package
        .finish(&title)?
        .into_inner()
        .map_err(|e| e.into_error())?;
    temp.persist(output_path).map_err(|e| e.error)?;

    info!(
        path = %output_path.display(),
        slides = slides.len(),
        %slide,
        %mode,
        "wrote presentation"
    );

    Ok(PresentationArtifact {
        path: output_path.to_path_buf(),
        slide,
        mode,
        slides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{Dimensions, PixelCrop};
    use crate::test_helpers::{read_part_string, slide_count};
    use tempfile::TempDir;

    const STANDARD: SlideSpec = SlideSpec {
        width_in: 10.0,
        height_in: 7.5,
    };

    fn squares(n: usize) -> MockBackend {
        MockBackend::with_dimensions(vec![
            Dimensions {
                width: 100,
                height: 100
            };
            n
        ])
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    // =========================================================================
    // Happy path
    // =========================================================================

    #[test]
    fn one_slide_per_image_in_order() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("deck.pptx");
        let backend = squares(3);
        let images = paths(&["/c.png", "/a.png", "/b.png"]);

        let artifact =
            build_presentation_with_backend(&backend, &images, &out, STANDARD, PlacementMode::Fit)
                .unwrap();

        assert_eq!(artifact.path, out);
        assert_eq!(artifact.slides.len(), 3);
        let sources: Vec<&Path> = artifact.slides.iter().map(|s| s.source.as_path()).collect();
        assert_eq!(
            sources,
            vec![Path::new("/c.png"), Path::new("/a.png"), Path::new("/b.png")]
        );
        assert_eq!(slide_count(&out), 3);
        assert!(read_part_string(&out, "ppt/slides/slide1.xml").contains(r#"descr="c.png""#));
    }

    #[test]
    fn identifies_everything_before_encoding() {
        let tmp = TempDir::new().unwrap();
        let backend = squares(2);
        let images = paths(&["/a.png", "/b.png"]);

        build_presentation_with_backend(
            &backend,
            &images,
            &tmp.path().join("deck.pptx"),
            STANDARD,
            PlacementMode::Fit,
        )
        .unwrap();

        let kinds: Vec<&str> = backend
            .get_operations()
            .iter()
            .map(|op| match op {
                RecordedOp::Identify(_) => "identify",
                RecordedOp::Prepare { .. } => "prepare",
            })
            .collect();
        assert_eq!(kinds, vec!["identify", "identify", "prepare", "prepare"]);
    }

    #[test]
    fn fit_geometry_lands_in_slide_xml() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("deck.pptx");

        build_presentation_with_backend(
            &squares(1),
            &paths(&["/a.png"]),
            &out,
            STANDARD,
            PlacementMode::Fit,
        )
        .unwrap();

        let slide = read_part_string(&out, "ppt/slides/slide1.xml");
        assert!(slide.contains(r#"<a:off x="1143000" y="0"/>"#), "{slide}");
        assert!(slide.contains(r#"<a:ext cx="6858000" cy="6858000"/>"#), "{slide}");

        let pres = read_part_string(&out, "ppt/presentation.xml");
        assert!(pres.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));
    }

    #[test]
    fn fill_passes_pixel_crop_to_backend() {
        let tmp = TempDir::new().unwrap();
        let backend = squares(1);

        let artifact = build_presentation_with_backend(
            &backend,
            &paths(&["/a.jpg"]),
            &tmp.path().join("deck.pptx"),
            STANDARD,
            PlacementMode::Fill,
        )
        .unwrap();

        let placement = artifact.slides[0].placement;
        assert_eq!(
            (placement.left, placement.top, placement.width, placement.height),
            (0.0, 0.0, 10.0, 7.5)
        );
        let prepared_crop = backend.get_operations().into_iter().find_map(|op| match op {
            RecordedOp::Prepare { crop, .. } => crop,
            _ => None,
        });
        let PixelCrop { width, height, .. } = prepared_crop.unwrap();
        assert_eq!((width, height), (100, 75));
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let tmp = TempDir::new().unwrap();
        build_presentation_with_backend(
            &squares(1),
            &paths(&["/a.png"]),
            &tmp.path().join("deck.pptx"),
            STANDARD,
            PlacementMode::Fit,
        )
        .unwrap();

        assert_eq!(dir_entries(tmp.path()), vec!["deck.pptx"]);
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn new_deck_gets_the_same_mode_as_any_new_file() {
        let tmp = TempDir::new().unwrap();
        let reference = tmp.path().join("reference");
        std::fs::write(&reference, b"").unwrap();
        let out = tmp.path().join("deck.pptx");

        build_presentation_with_backend(
            &squares(1),
            &paths(&["/a.png"]),
            &out,
            STANDARD,
            PlacementMode::Fit,
        )
        .unwrap();

        assert_eq!(mode_of(&out), mode_of(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn replaced_deck_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("deck.pptx");
        std::fs::write(&out, b"old deck").unwrap();
        std::fs::set_permissions(&out, std::fs::Permissions::from_mode(0o640)).unwrap();

        build_presentation_with_backend(
            &squares(1),
            &paths(&["/a.png"]),
            &out,
            STANDARD,
            PlacementMode::Fit,
        )
        .unwrap();

        assert_eq!(mode_of(&out), 0o640);
        assert_ne!(std::fs::read(&out).unwrap(), b"old deck");
    }

    // =========================================================================
    // Failures write nothing
    // =========================================================================

    #[test]
    fn invalid_slide_size_is_config_error_before_io() {
        let result = build_presentation(
            &paths(&["/a.png"]),
            Path::new("/nonexistent/dir/deck.pptx"),
            0.0,
            7.5,
            PlacementMode::Fit,
        );
        assert!(matches!(
            result,
            Err(BuildError::Config(ConfigError::InvalidSlideSize { .. }))
        ));
    }

    #[test]
    fn empty_input_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("deck.pptx");

        let result =
            build_presentation_with_backend(&squares(0), &[], &out, STANDARD, PlacementMode::Fit);
        assert!(matches!(result, Err(BuildError::EmptyInput)));
        assert!(!out.exists());
        assert!(dir_entries(tmp.path()).is_empty());
    }

    #[test]
    fn unreadable_image_names_the_file_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("deck.pptx");
        // Dimensions for the first image only; the second fails to identify.
        let backend = squares(1);

        let err = build_presentation_with_backend(
            &backend,
            &paths(&["/good.png", "/bad.png"]),
            &out,
            STANDARD,
            PlacementMode::Fit,
        )
        .unwrap_err();

        match err {
            BuildError::UnreadableImage { path, .. } => assert_eq!(path, Path::new("/bad.png")),
            other => panic!("expected UnreadableImage, got {other:?}"),
        }
        assert!(!out.exists());
        assert!(dir_entries(tmp.path()).is_empty());
        assert!(
            !backend
                .get_operations()
                .iter()
                .any(|op| matches!(op, RecordedOp::Prepare { .. }))
        );
    }

    #[test]
    fn failed_build_leaves_existing_deck_untouched() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("deck.pptx");
        std::fs::write(&out, b"old deck").unwrap();

        let result = build_presentation_with_backend(
            &squares(0),
            &paths(&["/bad.png"]),
            &out,
            STANDARD,
            PlacementMode::Fit,
        );
        assert!(matches!(result, Err(BuildError::UnreadableImage { .. })));
        assert_eq!(std::fs::read(&out).unwrap(), b"old deck");
        assert_eq!(dir_entries(tmp.path()), vec!["deck.pptx"]);
    }

    #[test]
    fn missing_output_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("missing").join("deck.pptx");

        let result = build_presentation_with_backend(
            &squares(1),
            &paths(&["/a.png"]),
            &out,
            STANDARD,
            PlacementMode::Fit,
        );
        assert!(matches!(result, Err(BuildError::Io(_))));
        assert!(!tmp.path().join("missing").exists());
    }

    // =========================================================================
    // Planning
    // =========================================================================

    #[test]
    fn plan_records_are_numbered_from_one() {
        let records = plan_records(
            &squares(2),
            &paths(&["/a.png", "/b.png"]),
            STANDARD,
            PlacementMode::Fit,
        )
        .unwrap();
        let numbers: Vec<usize> = records.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(records[1].placement.left, 1.25);
    }

    #[test]
    fn plan_rejects_empty_input() {
        assert!(matches!(
            plan_records(&squares(0), &[], STANDARD, PlacementMode::Fill),
            Err(BuildError::EmptyInput)
        ));
    }
}
