//! Skew estimation by projection-profile search.
//!
//! Text lines that are perfectly horizontal produce a row-sum profile with
//! sharp peaks and valleys. The search rotates the binarized page through a
//! range of candidate angles and keeps the one whose profile changes the
//! most between adjacent rows.

use image::GrayImage;
use imageproc::contrast::{ThresholdType, otsu_level, threshold};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::SkewConfig;
use crate::utils::{rotate_bicubic_replicate, rotate_mask};

/// The winning skew angle and the image corrected by it.
#[derive(Debug, Clone)]
pub struct SkewEstimate {
    /// Degrees; positive means the page was rotated counter-clockwise to fix it.
    pub angle: f32,
    pub corrected_image: GrayImage,
}

/// Score of a single candidate angle, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub angle: f32,
    pub score: f64,
}

/// Sum of foreground intensities per row.
pub fn horizontal_projection(mask: &GrayImage) -> Vec<f64> {
    let width = mask.width() as usize;
    if width == 0 {
        return vec![0.0; mask.height() as usize];
    }
    mask.as_raw()
        .chunks_exact(width)
        .map(|row| row.iter().map(|&v| v as f64).sum())
        .collect()
}

/// Sum of squared differences between adjacent profile entries.
pub fn profile_score(profile: &[f64]) -> f64 {
    profile.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum()
}

/// Estimates and corrects rotational skew.
#[derive(Debug, Clone)]
pub struct SkewCorrector {
    candidates: Vec<f32>,
}

impl SkewCorrector {
    pub fn new(config: &SkewConfig) -> Self {
        Self {
            candidates: config.candidate_angles(),
        }
    }

    pub fn candidates(&self) -> &[f32] {
        &self.candidates
    }

    /// Otsu-binarized mask with text as foreground.
    pub fn text_mask(gray: &GrayImage) -> GrayImage {
        let level = otsu_level(gray);
        threshold(gray, level, ThresholdType::BinaryInverted)
    }

    /// Scores every candidate angle against the mask.
    ///
    /// Each candidate rotates its own copy of the mask.
    pub fn score_candidates(&self, mask: &GrayImage) -> Vec<CandidateScore> {
        self.candidates
            .iter()
            .map(|&angle| {
                let rotated = if angle == 0.0 {
                    mask.clone()
                } else {
                    rotate_mask(mask, angle)
                };
                CandidateScore {
                    angle,
                    score: profile_score(&horizontal_projection(&rotated)),
                }
            })
            .collect()
    }

    /// Highest score wins; ties keep the earliest candidate.
    pub fn select_best(scores: &[CandidateScore]) -> Option<f32> {
        let mut best: Option<CandidateScore> = None;
        for &candidate in scores {
            if best.is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best.map(|b| b.angle)
    }

    /// Returns the estimated skew angle in degrees.
    ///
    /// A mask with no foreground, or nothing but foreground, carries no line
    /// structure and yields 0.
    pub fn estimate_angle(&self, gray: &GrayImage) -> f32 {
        if gray.width() == 0 || gray.height() == 0 || self.candidates.is_empty() {
            return 0.0;
        }
        let mask = Self::text_mask(gray);
        let foreground = mask.as_raw().iter().filter(|&&v| v > 0).count();
        if foreground == 0 || foreground == mask.as_raw().len() {
            return 0.0;
        }

        let scores = self.score_candidates(&mask);
        Self::select_best(&scores).unwrap_or(0.0)
    }

    /// Estimates the skew and rotates the original (non-binarized) image by it.
    pub fn correct(&self, gray: &GrayImage) -> SkewEstimate {
        let angle = self.estimate_angle(gray);
        debug!("Estimated skew angle: {} degrees", angle);
        SkewEstimate {
            angle,
            corrected_image: rotate_bicubic_replicate(gray, angle),
        }
    }
}

impl Default for SkewCorrector {
    fn default() -> Self {
        Self::new(&SkewConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

    /// White page with dark horizontal bars in the central region.
    fn striped_page() -> GrayImage {
        GrayImage::from_fn(200, 200, |x, y| {
            let inside = (40..160).contains(&x) && (40..160).contains(&y);
            if inside && (y - 40) % 16 < 6 {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    /// Rotates clockwise as displayed by `degrees`.
    fn skew_clockwise(img: &GrayImage, degrees: f32) -> GrayImage {
        rotate_about_center(img, degrees.to_radians(), Interpolation::Nearest, Luma([255]))
    }

    #[test]
    fn test_projection_and_score() {
        let mut mask = GrayImage::new(3, 3);
        for x in 0..3 {
            mask.put_pixel(x, 1, Luma([255]));
        }
        let profile = horizontal_projection(&mask);
        assert_eq!(profile, vec![0.0, 765.0, 0.0]);
        assert_eq!(profile_score(&profile), 2.0 * 765.0f64.powi(2));
    }

    #[test]
    fn test_straight_page_has_zero_angle() {
        let corrector = SkewCorrector::default();
        let estimate = corrector.correct(&striped_page());
        assert_eq!(estimate.angle, 0.0);
        assert_eq!(estimate.corrected_image, striped_page());
    }

    #[test]
    fn test_detects_clockwise_skew() {
        let corrector = SkewCorrector::default();
        let skewed = skew_clockwise(&striped_page(), 3.0);
        assert_eq!(corrector.estimate_angle(&skewed), 3.0);
    }

    #[test]
    fn test_detects_counter_clockwise_skew() {
        let corrector = SkewCorrector::default();
        let skewed = skew_clockwise(&striped_page(), -2.0);
        assert_eq!(corrector.estimate_angle(&skewed), -2.0);
    }

    #[test]
    fn test_correction_is_idempotent() {
        let corrector = SkewCorrector::default();
        let skewed = skew_clockwise(&striped_page(), 4.0);
        let first = corrector.correct(&skewed);
        assert_eq!(first.angle, 4.0);
        let second = corrector.correct(&first.corrected_image);
        assert_eq!(second.angle, 0.0);
    }

    #[test]
    fn test_text_mask_marks_dark_pixels() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([[10, 30, 220, 240][x as usize]]));
        let mask = SkewCorrector::text_mask(&gray);
        assert_eq!(mask.as_raw(), &vec![255, 255, 0, 0]);
    }

    #[test]
    fn test_uniform_pages_need_no_correction() {
        let corrector = SkewCorrector::default();
        let white = GrayImage::from_pixel(50, 50, Luma([255]));
        let black = GrayImage::from_pixel(50, 50, Luma([0]));
        assert_eq!(corrector.estimate_angle(&white), 0.0);
        assert_eq!(corrector.estimate_angle(&black), 0.0);
        assert_eq!(corrector.estimate_angle(&GrayImage::new(0, 0)), 0.0);
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let corrector = SkewCorrector::default();
        let scores = corrector.score_candidates(&GrayImage::new(20, 20));
        assert!(scores.iter().all(|c| c.score == 0.0));
        assert_eq!(SkewCorrector::select_best(&scores), Some(-5.0));
    }
}
