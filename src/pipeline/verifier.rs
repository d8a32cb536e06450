//! The verification orchestrator.
//!
//! A run moves through a fixed sequence and stops at the first rejection:
//!
//! 1. existence check
//! 2. normalization (decode into an [`ImageArtifact`])
//! 3. skew correction, which never rejects
//! 4. the ordered [`VerificationStage`] list: quality gate, OCR
//!    classification, template matching
//!
//! The verdict is the result of the first rejecting step, or the template
//! matcher's acceptance.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::stages::{
    OcrClassifier, QualityGate, StageInput, StageMetrics, StageOutcome, StageTrace,
    TemplateMatcher, VerificationStage,
};
use crate::core::VerifyResult;
use crate::core::config::{ConfigValidator, VerifierConfig};
use crate::core::traits::TextExtractor;
use crate::domain::{DocumentType, ProfileRegistry, ReasonCode, StageResult, Verdict};
use crate::processors::{ImageNormalizer, ImageSource, SkewCorrector};

/// The verdict of one run plus what each executed step observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    /// The type string as submitted.
    pub requested_type: String,
    /// The recognized document type; `None` when the fallback profile was used.
    pub document_type: Option<DocumentType>,
    pub verdict: Verdict,
    /// Estimated skew in degrees, when the run got that far.
    pub skew_angle: Option<f32>,
    pub stages: Vec<StageTrace>,
}

impl VerificationReport {
    fn new(requested_type: &str, document_type: Option<DocumentType>) -> Self {
        Self {
            requested_type: requested_type.to_string(),
            document_type,
            verdict: StageResult::accept(),
            skew_angle: None,
            stages: Vec::new(),
        }
    }

    pub fn accepted(&self) -> bool {
        self.verdict.accepted
    }

    pub fn reason(&self) -> ReasonCode {
        self.verdict.reason
    }

    pub fn message(&self) -> &str {
        &self.verdict.message
    }

    /// The trace of a stage by name, if it ran.
    pub fn stage(&self, name: &str) -> Option<&StageTrace> {
        self.stages.iter().find(|trace| trace.stage == name)
    }

    /// Records a step; returns `true` when the run may continue.
    fn record(&mut self, stage: &str, outcome: StageOutcome, elapsed: Duration) -> bool {
        debug!(
            "Stage {} finished in {:?}: {}",
            stage, elapsed, outcome.result.message
        );
        let accepted = outcome.result.accepted;
        self.verdict = outcome.result.clone();
        self.stages.push(StageTrace::new(stage, outcome, elapsed));
        accepted
    }
}

/// Decides whether a document image is a genuine instance of a declared type.
///
/// Built once from a validated configuration and then shared freely; `verify`
/// takes `&self` and keeps no state between runs.
#[derive(Debug)]
pub struct DocumentVerifier {
    config: Arc<VerifierConfig>,
    registry: ProfileRegistry,
    normalizer: ImageNormalizer,
    skew: SkewCorrector,
    stages: Vec<Box<dyn VerificationStage>>,
}

impl DocumentVerifier {
    /// Creates a verifier.
    ///
    /// # Errors
    ///
    /// * `VerifyError::Config` if the configuration is invalid.
    /// * `VerifyError::ThreadPool` if the template worker pool cannot be built.
    pub fn new(
        config: VerifierConfig,
        extractor: impl TextExtractor + 'static,
    ) -> VerifyResult<Self> {
        Self::with_extractor(config, Arc::new(extractor))
    }

    /// Creates a verifier around an already shared extractor.
    pub fn with_extractor(
        config: VerifierConfig,
        extractor: Arc<dyn TextExtractor>,
    ) -> VerifyResult<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let stages: Vec<Box<dyn VerificationStage>> = vec![
            Box::new(QualityGate::new(config.quality.clone())),
            Box::new(OcrClassifier::new(extractor, config.ocr.keyword_threshold)),
            Box::new(TemplateMatcher::with_policy(
                config.matching.clone(),
                &config.parallel,
            )?),
        ];

        Ok(Self {
            registry: ProfileRegistry::from_config(&config),
            normalizer: ImageNormalizer::new(),
            skew: SkewCorrector::new(&config.skew),
            stages,
            config,
        })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Names of the gated stages in evaluation order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.stage_name()).collect()
    }

    /// Convenience wrapper for a file on disk.
    pub fn verify_path(&self, doc_type: &str, path: impl Into<PathBuf>) -> VerificationReport {
        self.verify(doc_type, &ImageSource::path(path))
    }

    /// Runs the full pipeline. Never fails; every problem becomes a
    /// rejecting verdict.
    pub fn verify(&self, doc_type: &str, source: &ImageSource) -> VerificationReport {
        let started = Instant::now();
        let profile = self.registry.resolve(doc_type);
        let mut report = VerificationReport::new(doc_type, profile.document_type);
        if profile.document_type.is_none() {
            debug!("Unknown document type '{}', using fallback profile", doc_type);
        }

        let timer = Instant::now();
        let exists = match source.ensure_exists() {
            Ok(()) => StageOutcome::new(StageResult::accept(), StageMetrics::new()),
            Err(e) => StageOutcome::new(
                StageResult::from_error(&e),
                StageMetrics::new().with_info("error", e),
            ),
        };
        if !report.record("existence_check", exists, timer.elapsed()) {
            return self.finish(report, started);
        }

        let timer = Instant::now();
        let artifact = match self.normalizer.normalize_existing(source) {
            Ok(artifact) => {
                let metrics = StageMetrics::new()
                    .with_info("format", format!("{:?}", artifact.source_format()))
                    .with_info("width", artifact.width())
                    .with_info("height", artifact.height());
                let outcome = StageOutcome::new(StageResult::accept(), metrics);
                report.record("normalization", outcome, timer.elapsed());
                artifact
            }
            Err(e) => {
                let outcome = StageOutcome::new(
                    StageResult::from_error(&e),
                    StageMetrics::new().with_info("error", e),
                );
                report.record("normalization", outcome, timer.elapsed());
                return self.finish(report, started);
            }
        };

        let timer = Instant::now();
        let skew = self.skew.correct(&artifact.grayscale());
        report.skew_angle = Some(skew.angle);
        report.record(
            "skew_correction",
            StageOutcome::new(
                StageResult::accept(),
                StageMetrics::new().with_info("angle", skew.angle),
            ),
            timer.elapsed(),
        );

        let input = StageInput {
            profile,
            artifact: &artifact,
            skew: &skew,
        };
        for stage in &self.stages {
            let timer = Instant::now();
            let outcome = stage.evaluate(&input);
            if !report.record(stage.stage_name(), outcome, timer.elapsed()) {
                break;
            }
        }

        self.finish(report, started)
    }

    fn finish(&self, report: VerificationReport, started: Instant) -> VerificationReport {
        info!(
            "Verification of '{}' finished in {:?}: {}",
            report.requested_type,
            started.elapsed(),
            report.verdict.message
        );
        report
    }
}
