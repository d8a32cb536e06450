//! Error types for the verification pipeline.
//!
//! Stage-level rejections are not errors: they travel as
//! [`StageResult`](crate::domain::StageResult) values. The types here cover
//! collaborator and configuration failures. Stage boundaries turn them into a
//! [`ReasonCode`](crate::domain::ReasonCode) via
//! [`ReasonCode::from_error`](crate::domain::ReasonCode::from_error).

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;

/// Convenient result alias for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Enum representing the errors that can occur while verifying a document.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The image could not be decoded.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// The input image does not exist or is not a regular file.
    #[error("image not found: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The container format is not part of the accepted set.
    #[error("unsupported image format: {format}")]
    UnsupportedFormat {
        /// The declared or detected format.
        format: String,
    },

    /// The OCR collaborator failed.
    #[error("text extraction failed: {message}")]
    Ocr {
        /// A message describing the failure.
        message: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The template worker pool could not be created.
    #[error("worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration file could not be parsed.
    #[error("json")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl VerifyError {
    /// Creates an OCR error without an underlying cause.
    pub fn ocr_error(message: impl Into<String>) -> Self {
        Self::Ocr {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an OCR error wrapping the collaborator's error.
    pub fn ocr_failure(
        message: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Ocr {
            message: message.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}

impl From<image::ImageError> for VerifyError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_ocr_failure_keeps_source() {
        let io = std::io::Error::other("engine crashed");
        let err = VerifyError::ocr_failure("tesseract exited", io);
        assert_eq!(err.to_string(), "text extraction failed: tesseract exited");
        assert!(err.source().is_some());

        let err = VerifyError::ocr_error("empty output");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_not_found_display() {
        let err = VerifyError::NotFound {
            path: PathBuf::from("missing.png"),
        };
        assert_eq!(err.to_string(), "image not found: missing.png");
    }
}
