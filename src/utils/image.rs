//! Utility functions for image loading and conversion.
//!
//! This module provides the format allow-list, byte decoding, grayscale
//! helpers and directory listing used by the normalizer and the template
//! corpus.

use crate::core::constants::ALLOWED_EXTENSIONS;
use crate::core::{VerifyError, VerifyResult};
use image::{DynamicImage, GrayImage, ImageFormat};
use std::path::{Path, PathBuf};

/// Converts a DynamicImage to a GrayImage.
pub fn dynamic_to_gray(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Returns true when `format` is one of the accepted containers.
pub fn is_allowed_format(format: ImageFormat) -> bool {
    format
        .extensions_str()
        .iter()
        .any(|ext| ALLOWED_EXTENSIONS.contains(ext))
}

/// Maps a path's extension onto an accepted container format.
///
/// # Errors
///
/// Returns `VerifyError::UnsupportedFormat` when the extension is missing or
/// not on the allow-list.
pub fn format_from_path(path: &Path) -> VerifyResult<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| VerifyError::unsupported_format(path.display().to_string()))?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(VerifyError::unsupported_format(ext));
    }
    ImageFormat::from_extension(&ext).ok_or_else(|| VerifyError::unsupported_format(ext))
}

/// Decodes image bytes, sniffing the container from the content.
///
/// # Errors
///
/// * `VerifyError::UnsupportedFormat` if the container is not accepted.
/// * `VerifyError::ImageLoad` if the bytes cannot be decoded.
pub fn decode_image(bytes: &[u8]) -> VerifyResult<(DynamicImage, ImageFormat)> {
    let format = image::guess_format(bytes).map_err(VerifyError::ImageLoad)?;
    if !is_allowed_format(format) {
        return Err(VerifyError::unsupported_format(format!("{format:?}")));
    }
    let img = image::load_from_memory_with_format(bytes, format).map_err(VerifyError::ImageLoad)?;
    Ok((img, format))
}

/// Loads an image file and converts it to grayscale.
pub fn load_gray_image(path: &Path) -> VerifyResult<GrayImage> {
    let bytes = std::fs::read(path)?;
    let (img, _) = decode_image(&bytes)?;
    Ok(dynamic_to_gray(&img))
}

/// Lists the regular files in `dir` whose extension equals `extension`
/// (case-insensitive), sorted by file name.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> VerifyResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
