//! Streaming writer for the zip container.
//!
//! Slides are written as they are added, so only one encoded picture is in
//! memory at a time. Parts that depend on the slide count are written by
//! [`PackageWriter::finish`].

use super::PackageError;
use super::parts::{self, EmuRect};
use crate::imaging::EncodedImage;
use std::io::{Seek, Write};
use tracing::debug;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Builds a `.pptx` into any seekable writer.
pub struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    slide_width_emu: i64,
    slide_height_emu: i64,
    slide_count: usize,
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn new(writer: W, slide_width_emu: i64, slide_height_emu: i64) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            slide_width_emu,
            slide_height_emu,
            slide_count: 0,
        }
    }

    fn add_part(&mut self, name: &str, content: &[u8]) -> Result<(), PackageError> {
        // Media is already compressed; deflating it again only costs time.
        let method = if name.starts_with("ppt/media/") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);
        self.zip.start_file(name, options)?;
        self.zip.write_all(content)?;
        Ok(())
    }

    /// Append a slide showing `image` at `rect`. Returns the 1-based slide number.
    pub fn add_picture_slide(
        &mut self,
        image: &EncodedImage,
        rect: EmuRect,
        description: &str,
    ) -> Result<usize, PackageError> {
        let n = self.slide_count + 1;
        let media = format!("image{n}.{}", image.format.extension());

        self.add_part(&format!("ppt/media/{media}"), &image.bytes)?;
        self.add_part(
            &format!("ppt/slides/slide{n}.xml"),
            parts::picture_slide(rect, description).as_bytes(),
        )?;
        self.add_part(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            parts::picture_slide_rels(&media).as_bytes(),
        )?;

        self.slide_count = n;
        debug!(slide = n, media = %media, bytes = image.bytes.len(), "added slide");
        Ok(n)
    }

    /// Write the shared parts and close the archive.
    pub fn finish(mut self, title: &str) -> Result<W, PackageError> {
        let n = self.slide_count;
        let application = env!("CARGO_PKG_NAME");

        let shared = [
            ("[Content_Types].xml", parts::content_types(n)),
            ("_rels/.rels", parts::root_rels()),
            ("docProps/core.xml", parts::core_properties(title, application)),
            ("docProps/app.xml", parts::app_properties(application, n)),
            (
                "ppt/presentation.xml",
                parts::presentation(self.slide_width_emu, self.slide_height_emu, n),
            ),
            ("ppt/_rels/presentation.xml.rels", parts::presentation_rels(n)),
            ("ppt/presProps.xml", parts::pres_props()),
            ("ppt/viewProps.xml", parts::view_props()),
            ("ppt/tableStyles.xml", parts::table_styles()),
            ("ppt/slideMasters/slideMaster1.xml", parts::slide_master()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels",
                parts::slide_master_rels(),
            ),
            ("ppt/slideLayouts/slideLayout1.xml", parts::slide_layout()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
                parts::slide_layout_rels(),
            ),
            ("ppt/theme/theme1.xml", parts::theme()),
        ];
        for (name, xml) in &shared {
            self.add_part(name, xml.as_bytes())?;
        }

        Ok(self.zip.finish()?)
    }
}
