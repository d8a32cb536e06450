//! Stage results and the final verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::VerifyError;

/// Why a stage accepted or rejected the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Ok,
    NotFound,
    FormatError,
    TooBlurry,
    Unreadable,
    KeywordMismatch,
    TemplateMismatch,
}

impl ReasonCode {
    /// The user-visible message for this reason.
    ///
    /// Accepting and rejecting messages carry different prefixes.
    pub fn message(self) -> &'static str {
        match self {
            ReasonCode::Ok => "ACCEPTED",
            ReasonCode::NotFound => "REJECTED: image does not exist",
            ReasonCode::FormatError => "REJECTED: invalid image format",
            ReasonCode::TooBlurry => "REJECTED: image too blurry",
            ReasonCode::Unreadable => "REJECTED: image not readable",
            ReasonCode::KeywordMismatch => {
                "REJECTED: image not matched during OCR keyword matching"
            }
            ReasonCode::TemplateMismatch => "REJECTED: image not matched during template matching",
        }
    }

    /// Maps a collaborator failure onto the reason code of the stage that hit it.
    pub fn from_error(error: &VerifyError) -> Self {
        match error {
            VerifyError::NotFound { .. } => ReasonCode::NotFound,
            VerifyError::ImageLoad(_) | VerifyError::UnsupportedFormat { .. } => {
                ReasonCode::FormatError
            }
            VerifyError::Ocr { .. } => ReasonCode::Unreadable,
            VerifyError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ReasonCode::NotFound,
            _ => ReasonCode::FormatError,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReasonCode::Ok => "ok",
            ReasonCode::NotFound => "not_found",
            ReasonCode::FormatError => "format_error",
            ReasonCode::TooBlurry => "too_blurry",
            ReasonCode::Unreadable => "unreadable",
            ReasonCode::KeywordMismatch => "keyword_mismatch",
            ReasonCode::TemplateMismatch => "template_mismatch",
        };
        f.write_str(name)
    }
}

/// The uniform result shape of every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub accepted: bool,
    pub reason: ReasonCode,
    pub message: String,
}

impl StageResult {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: ReasonCode::Ok,
            message: ReasonCode::Ok.message().to_string(),
        }
    }

    /// A rejection. `reason` must not be [`ReasonCode::Ok`].
    pub fn reject(reason: ReasonCode) -> Self {
        debug_assert_ne!(reason, ReasonCode::Ok);
        Self {
            accepted: false,
            reason,
            message: reason.message().to_string(),
        }
    }

    pub fn from_error(error: &VerifyError) -> Self {
        Self::reject(ReasonCode::from_error(error))
    }
}

/// The externally visible outcome of one verification run.
pub type Verdict = StageResult;
