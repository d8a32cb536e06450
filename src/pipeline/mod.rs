//! The document verification pipeline.
//!
//! [`DocumentVerifier`] sequences normalization, skew correction and the
//! gated [`stages`], producing one [`VerificationReport`] per submission.

pub mod stages;
mod verifier;

pub use stages::{
    OcrClassifier, QualityGate, StageInput, StageMetrics, StageOutcome, StageTrace,
    TemplateMatcher, VerificationStage,
};
pub use verifier::{DocumentVerifier, VerificationReport};
