//! CLI output formatting.
//!
//! Every slide is shown by its position first, with the source file and the
//! geometry as indented context lines. The same shape is used for the
//! resolved input list, the layout plan and the build summary, so the three
//! read alike.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Slides: 10 x 7.5 in, fill
//! 001 cover.png (100x100 px)
//!     Placed: 10.000 x 7.500 in at (0.000, 0.000)
//!     Crop: 100.0 x 75.0 px at (0.0, 12.5)
//! 002 page-1.png (2550x3300 px)
//!     Placed: 5.795 x 7.500 in at (2.102, 0.000)
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 cover.png
//! 002 page-1.png
//! Wrote 2 slides (10 x 7.5 in, fill) → deck.pptx
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::builder::{PresentationArtifact, SlideRecord};
use crate::presets::SLIDE_SIZES;
use crate::types::{PlacementMode, SlideSpec};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn size_label(slide: SlideSpec) -> String {
    format!("{} x {} in", slide.width_in, slide.height_in)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn slide_line(record: &SlideRecord) -> Vec<String> {
    let p = &record.placement;
    let mut lines = vec![
        format!(
            "{} {} ({}x{} px)",
            format_index(record.number),
            file_label(&record.source),
            record.pixel_width,
            record.pixel_height
        ),
        format!(
            "{}Placed: {:.3} x {:.3} in at ({:.3}, {:.3})",
            indent(1),
            p.width,
            p.height,
            p.left,
            p.top
        ),
    ];
    if let Some(c) = &p.crop {
        lines.push(format!(
            "{}Crop: {:.1} x {:.1} px at ({:.1}, {:.1})",
            indent(1),
            c.width,
            c.height,
            c.x,
            c.y
        ));
    }
    lines
}

// ============================================================================
// Inputs
// ============================================================================

/// Resolved image list, one numbered line per future slide.
pub fn format_inputs(images: &[PathBuf]) -> Vec<String> {
    let mut lines = vec![format!("Inputs ({})", plural(images.len(), "image", "images"))];
    for (i, path) in images.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), file_label(path)));
        lines.push(format!("{}Source: {}", indent(1), path.display()));
    }
    lines
}

pub fn print_inputs(images: &[PathBuf]) {
    for line in format_inputs(images) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

pub fn format_plan(records: &[SlideRecord], slide: SlideSpec, mode: PlacementMode) -> Vec<String> {
    let mut lines = vec![format!("Slides: {}, {mode}", size_label(slide))];
    for record in records {
        lines.extend(slide_line(record));
    }
    lines
}

pub fn print_plan(records: &[SlideRecord], slide: SlideSpec, mode: PlacementMode) {
    for line in format_plan(records, slide, mode) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_summary(artifact: &PresentationArtifact) -> Vec<String> {
    let mut lines: Vec<String> = artifact
        .slides
        .iter()
        .map(|s| format!("{} {}", format_index(s.number), file_label(&s.source)))
        .collect();
    lines.push(format!(
        "Wrote {} ({}, {}) \u{2192} {}",
        plural(artifact.slides.len(), "slide", "slides"),
        size_label(artifact.slide),
        artifact.mode,
        artifact.path.display()
    ));
    lines
}

pub fn print_build_summary(artifact: &PresentationArtifact) {
    for line in format_build_summary(artifact) {
        println!("{}", line);
    }
}

// ============================================================================
// Presets
// ============================================================================

pub fn format_presets() -> Vec<String> {
    let key_width = SLIDE_SIZES.iter().map(|p| p.key.len()).max().unwrap_or(0);
    let label_width = SLIDE_SIZES.iter().map(|p| p.label.len()).max().unwrap_or(0);
    SLIDE_SIZES
        .iter()
        .map(|p| {
            format!(
                "{:<key_width$}  {:<label_width$}  {}",
                p.key,
                p.label,
                size_label(p.spec())
            )
        })
        .collect()
}

pub fn print_presets() {
    for line in format_presets() {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
