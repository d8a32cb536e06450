//! Input loading and format normalization.

use image::ImageFormat;
use std::path::PathBuf;
use tracing::debug;

use crate::core::{VerifyError, VerifyResult};
use crate::domain::ImageArtifact;
use crate::utils::{decode_image, format_from_path, is_allowed_format};

/// Where the submitted image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image file on disk.
    Path(PathBuf),
    /// Raw bytes, with the format the caller claims they are in.
    Bytes {
        data: Vec<u8>,
        declared_format: Option<ImageFormat>,
    },
}

impl ImageSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ImageSource::Path(path.into())
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        ImageSource::Bytes {
            data: data.into(),
            declared_format: None,
        }
    }

    /// Existence check.
    ///
    /// # Errors
    ///
    /// `VerifyError::NotFound` when the path is missing or not a regular
    /// file, or when the byte buffer is empty.
    pub fn ensure_exists(&self) -> VerifyResult<()> {
        match self {
            ImageSource::Path(path) if path.is_file() => Ok(()),
            ImageSource::Path(path) => Err(VerifyError::NotFound { path: path.clone() }),
            ImageSource::Bytes { data, .. } if data.is_empty() => Err(VerifyError::NotFound {
                path: PathBuf::from("<memory>"),
            }),
            ImageSource::Bytes { .. } => Ok(()),
        }
    }
}

/// Decodes a submitted image into a canonical artifact.
///
/// Only allow-listed containers are accepted. Decoding never applies an
/// embedded colour profile, so the artifact's pixels are profile-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer;

impl ImageNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Loads and decodes `source`.
    ///
    /// # Errors
    ///
    /// * `VerifyError::NotFound` if the source does not exist.
    /// * `VerifyError::UnsupportedFormat` if the declared or detected
    ///   container is not accepted.
    /// * `VerifyError::ImageLoad` if the bytes cannot be decoded.
    pub fn normalize(&self, source: &ImageSource) -> VerifyResult<ImageArtifact> {
        source.ensure_exists()?;
        self.normalize_existing(source)
    }

    /// Decodes a source whose existence the caller has already checked
    /// with [`ImageSource::ensure_exists`].
    ///
    /// A path that vanished in between still reports `VerifyError::NotFound`.
    pub fn normalize_existing(&self, source: &ImageSource) -> VerifyResult<ImageArtifact> {
        let (bytes, declared) = match source {
            ImageSource::Path(path) => {
                let declared = format_from_path(path)?;
                let bytes = std::fs::read(path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => VerifyError::NotFound { path: path.clone() },
                    _ => VerifyError::Io(e),
                })?;
                (std::borrow::Cow::Owned(bytes), Some(declared))
            }
            ImageSource::Bytes {
                data,
                declared_format,
            } => {
                if let Some(format) = declared_format
                    && !is_allowed_format(*format)
                {
                    return Err(VerifyError::unsupported_format(format!("{format:?}")));
                }
                (std::borrow::Cow::Borrowed(data.as_slice()), *declared_format)
            }
        };

        let (decoded, detected) = decode_image(&bytes)?;
        if let Some(declared) = declared
            && declared != detected
        {
            debug!(
                "Declared format {:?} differs from content ({:?}), using content",
                declared, detected
            );
        }

        let artifact = ImageArtifact::new(decoded, detected);
        debug!(
            "Normalized {:?} image {}x{} (canonical: {})",
            detected,
            artifact.width(),
            artifact.height(),
            artifact.is_canonical_format()
        );
        Ok(artifact)
    }
}
