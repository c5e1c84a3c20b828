//! Presentation package output.
//!
//! A `.pptx` is a zip of XML parts plus media. [`parts`] renders the XML,
//! [`package`] streams parts into the archive. Nothing here knows about
//! layout; callers hand over EMU rectangles and encoded pictures.

pub mod package;
pub mod parts;

pub use package::PackageWriter;
pub use parts::{EmuRect, escape_xml};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
