//! Configuration for the document verifier.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::{ConfigError, ConfigValidator};
use super::parallel::ParallelPolicy;
use crate::core::VerifyResult;
use crate::core::constants::*;
use crate::domain::DocumentType;
use crate::domain::keywords::{
    GENERAL_KEYWORDS, INVOICE_KEYWORDS, LAB_REPORT_KEYWORDS, PRESCRIPTION_KEYWORDS,
    to_owned_list,
};

/// Per-type profile settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Type-specific keyword list; the general list is added on load.
    pub keywords: Vec<String>,
    /// Minimum good-match count for a template to accept.
    pub match_threshold: usize,
    /// Corpus directory, relative to `corpus_root` unless absolute.
    pub template_dir: PathBuf,
}

/// Profiles for every supported document type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default = "ProfilesConfig::default_invoice")]
    pub invoice: ProfileConfig,
    #[serde(default = "ProfilesConfig::default_prescription")]
    pub prescription: ProfileConfig,
    #[serde(default = "ProfilesConfig::default_lab_report")]
    pub lab_report: ProfileConfig,
}

impl ProfilesConfig {
    pub fn get(&self, doc_type: DocumentType) -> &ProfileConfig {
        match doc_type {
            DocumentType::Invoice => &self.invoice,
            DocumentType::Prescription => &self.prescription,
            DocumentType::LabReport => &self.lab_report,
        }
    }

    pub fn get_mut(&mut self, doc_type: DocumentType) -> &mut ProfileConfig {
        match doc_type {
            DocumentType::Invoice => &mut self.invoice,
            DocumentType::Prescription => &mut self.prescription,
            DocumentType::LabReport => &mut self.lab_report,
        }
    }

    fn default_invoice() -> ProfileConfig {
        ProfileConfig {
            keywords: to_owned_list(INVOICE_KEYWORDS),
            match_threshold: INVOICE_MATCH_THRESHOLD,
            template_dir: PathBuf::from("INVOICES"),
        }
    }

    fn default_prescription() -> ProfileConfig {
        ProfileConfig {
            keywords: to_owned_list(PRESCRIPTION_KEYWORDS),
            match_threshold: PRESCRIPTION_MATCH_THRESHOLD,
            template_dir: PathBuf::from("PRESCRIPTIONS"),
        }
    }

    fn default_lab_report() -> ProfileConfig {
        ProfileConfig {
            keywords: to_owned_list(LAB_REPORT_KEYWORDS),
            match_threshold: LAB_REPORT_MATCH_THRESHOLD,
            template_dir: PathBuf::from("LABREPORTS"),
        }
    }
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            invoice: Self::default_invoice(),
            prescription: Self::default_prescription(),
            lab_report: Self::default_lab_report(),
        }
    }
}

/// Blur gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Laplacian variance below this value rejects the image.
    pub blur_threshold: f64,
    /// Hard-threshold the image at mid-gray before measuring.
    pub apply_binarization: bool,
    /// Sigma of the smoothing pass applied before measuring.
    pub smoothing_sigma: f32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            blur_threshold: DEFAULT_BLUR_THRESHOLD,
            apply_binarization: false,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
        }
    }
}

impl ConfigValidator for QualityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.blur_threshold.is_finite() || self.blur_threshold < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "quality.blur_threshold",
                expected: "[0, inf)",
                actual: self.blur_threshold.to_string(),
            });
        }
        self.validate_positive_f32("quality.smoothing_sigma", self.smoothing_sigma)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Skew search range, in degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    pub max_angle: f32,
    pub step: f32,
}

impl SkewConfig {
    /// Candidate angles in ascending order.
    ///
    /// Generated from integer multiples of `step` so `0.0` is always exact.
    pub fn candidate_angles(&self) -> Vec<f32> {
        let steps = self.steps_per_side() as i32;
        (-steps..=steps).map(|i| i as f32 * self.step).collect()
    }

    /// Number of candidates `candidate_angles` yields, computed without
    /// building the list.
    pub fn candidate_count(&self) -> f64 {
        2.0 * self.steps_per_side() + 1.0
    }

    fn steps_per_side(&self) -> f64 {
        (f64::from(self.max_angle) / f64::from(self.step)).floor()
    }
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            max_angle: DEFAULT_SKEW_MAX_ANGLE,
            step: DEFAULT_SKEW_STEP,
        }
    }
}

impl ConfigValidator for SkewConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_positive_f32("skew.step", self.step)?;
        if !self.max_angle.is_finite() || self.max_angle < 0.0 || self.max_angle > 45.0 {
            return Err(ConfigError::OutOfRange {
                field: "skew.max_angle",
                expected: "[0, 45]",
                actual: self.max_angle.to_string(),
            });
        }
        let count = self.candidate_count();
        if count > MAX_SKEW_CANDIDATES as f64 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "skew.step {} over max_angle {} gives {} candidates, at most {} allowed",
                    self.step, self.max_angle, count, MAX_SKEW_CANDIDATES
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Keyword classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Minimum matched fraction of the lexicon.
    pub keyword_threshold: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            keyword_threshold: DEFAULT_KEYWORD_THRESHOLD,
        }
    }
}

impl ConfigValidator for OcrConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_unit_interval("ocr.keyword_threshold", self.keyword_threshold)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Template matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Side of the square both probe and templates are resized to.
    pub canonical_size: u32,
    /// Ratio test factor; a match is good if `best < ratio * second`.
    pub ratio: f32,
    pub max_keypoints: usize,
    pub fast_threshold: u8,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            canonical_size: DEFAULT_CANONICAL_SIZE,
            ratio: DEFAULT_MATCH_RATIO,
            max_keypoints: DEFAULT_MAX_KEYPOINTS,
            fast_threshold: DEFAULT_FAST_THRESHOLD,
        }
    }
}

impl ConfigValidator for MatchingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(64..=MAX_CANONICAL_SIZE).contains(&self.canonical_size) {
            return Err(ConfigError::OutOfRange {
                field: "matching.canonical_size",
                expected: "[64, 4096]",
                actual: self.canonical_size.to_string(),
            });
        }
        if self.max_keypoints == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "matching.max_keypoints must be greater than 0".to_string(),
            });
        }
        self.validate_positive_f32("matching.ratio", self.ratio)?;
        self.validate_unit_interval("matching.ratio", self.ratio)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Top-level verifier configuration.
///
/// Loaded once at start-up and shared read-only by every verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Root directory of the per-type template corpora.
    #[serde(default = "VerifierConfig::default_corpus_root")]
    pub corpus_root: PathBuf,

    /// Keywords added to every type's lexicon.
    #[serde(default = "VerifierConfig::default_general_keywords")]
    pub general_keywords: Vec<String>,

    #[serde(default)]
    pub profiles: ProfilesConfig,

    /// Match threshold for unrecognized document types.
    #[serde(default = "VerifierConfig::default_fallback_threshold")]
    pub fallback_match_threshold: usize,

    #[serde(default)]
    pub quality: QualityConfig,

    #[serde(default)]
    pub skew: SkewConfig,

    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    /// Worker pool used by the template scan.
    #[serde(default)]
    pub parallel: ParallelPolicy,
}

impl VerifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the corpus root.
    pub fn with_corpus_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.corpus_root = root.into();
        self
    }

    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> VerifyResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> VerifyResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    fn default_corpus_root() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_general_keywords() -> Vec<String> {
        to_owned_list(GENERAL_KEYWORDS)
    }

    fn default_fallback_threshold() -> usize {
        FALLBACK_MATCH_THRESHOLD
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            corpus_root: Self::default_corpus_root(),
            general_keywords: Self::default_general_keywords(),
            profiles: ProfilesConfig::default(),
            fallback_match_threshold: Self::default_fallback_threshold(),
            quality: QualityConfig::default(),
            skew: SkewConfig::default(),
            ocr: OcrConfig::default(),
            matching: MatchingConfig::default(),
            parallel: ParallelPolicy::default(),
        }
    }
}

impl ConfigValidator for VerifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.quality.validate()?;
        self.skew.validate()?;
        self.ocr.validate()?;
        self.matching.validate()?;
        self.parallel.validate()?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
