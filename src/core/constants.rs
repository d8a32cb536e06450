//! Default values used throughout the verification pipeline.
//!
//! These are policy defaults. Every one of them can be overridden through
//! [`VerifierConfig`](crate::core::config::VerifierConfig).

/// Minimum Laplacian variance for an image to count as sharp.
pub const DEFAULT_BLUR_THRESHOLD: f64 = 50.0;

/// Gaussian sigma equivalent to a 5x5 kernel with automatic sigma.
pub const DEFAULT_SMOOTHING_SIGMA: f32 = 1.1;

/// Hard binarization level used by the quality gate.
pub const BINARIZATION_LEVEL: u8 = 127;

/// Largest skew angle searched, in degrees.
pub const DEFAULT_SKEW_MAX_ANGLE: f32 = 5.0;

/// Step between skew candidates, in degrees.
pub const DEFAULT_SKEW_STEP: f32 = 1.0;

/// Upper bound on the number of skew candidates a configuration may produce.
pub const MAX_SKEW_CANDIDATES: usize = 1001;

/// Minimum fraction of the lexicon that must appear in the OCR text.
pub const DEFAULT_KEYWORD_THRESHOLD: f32 = 0.05;

/// Side of the square both probe and templates are resized to.
pub const DEFAULT_CANONICAL_SIZE: u32 = 256;

/// Largest accepted canonical side.
pub const MAX_CANONICAL_SIZE: u32 = 4096;

/// Nearest-neighbour ratio test factor.
pub const DEFAULT_MATCH_RATIO: f32 = 0.7;

/// Maximum keypoints kept per image.
pub const DEFAULT_MAX_KEYPOINTS: usize = 500;

/// FAST intensity threshold.
pub const DEFAULT_FAST_THRESHOLD: u8 = 20;

/// Default number of template worker threads.
pub const DEFAULT_MATCH_WORKERS: usize = 4;

/// Good-match thresholds per document type.
pub const INVOICE_MATCH_THRESHOLD: usize = 15;
pub const PRESCRIPTION_MATCH_THRESHOLD: usize = 20;
pub const LAB_REPORT_MATCH_THRESHOLD: usize = 25;
/// Threshold applied to unrecognized document types.
pub const FALLBACK_MATCH_THRESHOLD: usize = 15;

/// Extension of the canonical container; corpus files must carry it.
pub const CANONICAL_EXTENSION: &str = "png";

/// Container formats accepted by the normalizer, by file extension.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];
