//! Verification stages.
//!
//! Each stage implements [`VerificationStage`] and produces a uniform
//! [`StageResult`](crate::domain::StageResult) plus stage-specific metrics.
//! The orchestrator evaluates them in order:
//!
//! 1. [`QualityGate`] - blur rejection on the skew-corrected image
//! 2. [`OcrClassifier`] - keyword classification of the extracted text
//! 3. [`TemplateMatcher`] - comparison against the type's reference corpus

mod ocr_classification;
mod quality;
mod template_matching;
mod types;

pub use ocr_classification::{KeywordScore, OcrClassifier};
pub use quality::QualityGate;
pub use template_matching::{CorpusScan, TemplateMatch, TemplateMatcher, first_meeting_threshold};
pub use types::{StageInput, StageMetrics, StageOutcome, StageTrace, VerificationStage};
