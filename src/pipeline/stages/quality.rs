//! Blur rejection on the skew-corrected image.

use tracing::debug;

use super::types::{StageInput, StageMetrics, StageOutcome, VerificationStage};
use crate::core::config::QualityConfig;
use crate::domain::{ReasonCode, StageResult};
use crate::processors::sharpness;

/// Rejects images whose Laplacian variance falls below the threshold.
#[derive(Debug, Clone, Default)]
pub struct QualityGate {
    config: QualityConfig,
}

impl QualityGate {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Decides on a measured sharpness. Equality with the threshold passes.
    pub fn judge(&self, sharpness: f64) -> StageResult {
        if sharpness < self.config.blur_threshold {
            StageResult::reject(ReasonCode::TooBlurry)
        } else {
            StageResult::accept()
        }
    }
}

impl VerificationStage for QualityGate {
    fn stage_name(&self) -> &'static str {
        "quality_gate"
    }

    fn evaluate(&self, input: &StageInput<'_>) -> StageOutcome {
        let measured = sharpness(
            &input.skew.corrected_image,
            self.config.apply_binarization,
            self.config.smoothing_sigma,
        );
        debug!(
            "Sharpness {:.3} against threshold {}",
            measured, self.config.blur_threshold
        );

        let metrics = StageMetrics::new()
            .with_info("sharpness", measured)
            .with_info("threshold", self.config.blur_threshold)
            .with_info("binarized", self.config.apply_binarization);
        StageOutcome::new(self.judge(measured), metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(threshold: f64) -> QualityGate {
        QualityGate::new(QualityConfig {
            blur_threshold: threshold,
            ..QualityConfig::default()
        })
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        assert!(gate(50.0).judge(50.0).accepted);
        assert!(gate(50.0).judge(50.000_001).accepted);
        let rejected = gate(50.0).judge(49.999);
        assert!(!rejected.accepted);
        assert_eq!(rejected.reason, ReasonCode::TooBlurry);
    }

    #[test]
    fn test_zero_threshold_accepts_uniform_images() {
        assert!(gate(0.0).judge(0.0).accepted);
    }
}
