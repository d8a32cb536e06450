//! Shared types and traits for verification stages.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

use crate::domain::{ImageArtifact, StageResult, TypeProfile};
use crate::processors::SkewEstimate;

/// Everything a stage may look at.
///
/// Borrowed from the orchestrator for the duration of one run.
#[derive(Debug, Clone, Copy)]
pub struct StageInput<'a> {
    /// The resolved profile of the declared document type.
    pub profile: &'a TypeProfile,
    /// The normalized source image.
    pub artifact: &'a ImageArtifact,
    /// The skew estimate and the grayscale image corrected by it.
    pub skew: &'a SkewEstimate,
}

/// Stage-specific measurements recorded alongside the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageMetrics {
    /// Additional stage-specific metrics
    pub additional_info: BTreeMap<String, String>,
}

impl StageMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add additional information to the metrics
    pub fn with_info<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.additional_info.get(key).map(String::as_str)
    }
}

/// A stage result together with its metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub result: StageResult,
    pub metrics: StageMetrics,
}

impl StageOutcome {
    pub fn new(result: StageResult, metrics: StageMetrics) -> Self {
        Self { result, metrics }
    }
}

/// One gate of the verification pipeline.
///
/// Stages are evaluated in order; the first rejection ends the run.
pub trait VerificationStage: Send + Sync + Debug {
    /// Stable identifier used in traces and logs.
    fn stage_name(&self) -> &'static str;

    /// Evaluates the stage. Failures of collaborators are reported as a
    /// rejecting result, never as an error.
    fn evaluate(&self, input: &StageInput<'_>) -> StageOutcome;
}

/// What one executed stage produced, for the verification report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageTrace {
    pub stage: String,
    pub result: StageResult,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    pub metrics: BTreeMap<String, String>,
}

impl StageTrace {
    pub fn new(stage: impl Into<String>, outcome: StageOutcome, elapsed: Duration) -> Self {
        Self {
            stage: stage.into(),
            result: outcome.result,
            elapsed,
            metrics: outcome.metrics.additional_info,
        }
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReasonCode;

    #[test]
    fn test_metrics_builder() {
        let metrics = StageMetrics::new()
            .with_info("sharpness", 12.5)
            .with_info("threshold", "50");
        assert_eq!(metrics.get("sharpness"), Some("12.5"));
        assert_eq!(metrics.get("threshold"), Some("50"));
        assert_eq!(metrics.get("missing"), None);
    }

    #[test]
    fn test_trace_serializes_elapsed_in_millis() {
        let outcome = StageOutcome::new(
            StageResult::reject(ReasonCode::TooBlurry),
            StageMetrics::new().with_info("sharpness", 3),
        );
        let trace = StageTrace::new("quality_gate", outcome, Duration::from_millis(4));
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["stage"], "quality_gate");
        assert_eq!(json["elapsed_ms"], 4.0);
        assert_eq!(json["result"]["reason"], "too_blurry");
        assert_eq!(json["metrics"]["sharpness"], "3");
    }
}
