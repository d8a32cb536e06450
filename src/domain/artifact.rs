//! In-memory image artifacts owned by a single verification run.

use image::{DynamicImage, GrayImage, ImageFormat, imageops::FilterType};
use imageproc::contrast::{ThresholdType, threshold};
use std::io::Cursor;

use crate::core::VerifyResult;

/// A decoded raster plus the format it came from.
///
/// The pixel buffer is always RGB8 and carries no colour-profile data.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    image: DynamicImage,
    source_format: ImageFormat,
}

impl ImageArtifact {
    /// Wraps a decoded image, converting it to RGB8.
    pub fn new(image: DynamicImage, source_format: ImageFormat) -> Self {
        let image = match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        Self {
            image,
            source_format,
        }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Bits per pixel of the stored buffer.
    pub fn color_depth(&self) -> u16 {
        self.image.color().bits_per_pixel()
    }

    pub fn source_format(&self) -> ImageFormat {
        self.source_format
    }

    pub fn is_canonical_format(&self) -> bool {
        self.source_format == ImageFormat::Png
    }

    pub fn grayscale(&self) -> GrayImage {
        self.image.to_luma8()
    }

    /// Grayscale hard-thresholded at `level`: `> level` becomes 255, the rest 0.
    pub fn binarized(&self, level: u8) -> GrayImage {
        threshold(&self.grayscale(), level, ThresholdType::Binary)
    }

    /// Grayscale resized to `size` x `size`, used for template comparison.
    pub fn canonical(&self, size: u32) -> GrayImage {
        canonical_form(&self.grayscale(), size)
    }

    /// Lossless PNG encoding of the artifact.
    ///
    /// The encoder writes no ICC chunk, so collaborators receive the same
    /// pixels the pipeline works on.
    pub fn encode_png(&self) -> VerifyResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

/// Resizes a grayscale image to the canonical square.
pub fn canonical_form(gray: &GrayImage, size: u32) -> GrayImage {
    if gray.dimensions() == (size, size) {
        return gray.clone();
    }
    image::imageops::resize(gray, size, size, FilterType::Triangle)
}
