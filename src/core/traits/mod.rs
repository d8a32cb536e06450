//! Trait definitions for the verification pipeline's collaborators.
//!
//! The pipeline never extracts text itself. It hands the normalized image
//! to a [`TextExtractor`] and works with the returned string.

use crate::core::VerifyResult;
use crate::domain::ImageArtifact;

/// A source of OCR text for a document image.
///
/// Implementations must be shareable across threads; a verifier holding one
/// may be used concurrently.
pub trait TextExtractor: Send + Sync {
    /// Extracts the text of `image`.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying engine. The pipeline maps it to an
    /// unreadable verdict.
    fn extract_text(&self, image: &ImageArtifact) -> VerifyResult<String>;

    /// A short name used in logs.
    fn name(&self) -> &str {
        "text-extractor"
    }
}

impl<F> TextExtractor for F
where
    F: Fn(&ImageArtifact) -> VerifyResult<String> + Send + Sync,
{
    fn extract_text(&self, image: &ImageArtifact) -> VerifyResult<String> {
        self(image)
    }

    fn name(&self) -> &str {
        "closure"
    }
}
