//! Visual comparison against the reference corpus of a document type.
//!
//! The probe's descriptors are computed once and shared read-only by the
//! workers. Templates are scanned in file-name order on a bounded pool; the
//! first template, in that order, whose good-match count reaches the
//! threshold wins and work on later templates is abandoned.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

use super::types::{StageInput, StageMetrics, StageOutcome, VerificationStage};
use crate::core::VerifyResult;
use crate::core::config::{MatchingConfig, ParallelPolicy};
use crate::core::constants::CANONICAL_EXTENSION;
use crate::domain::{ImageArtifact, ReasonCode, StageResult, canonical_form};
use crate::processors::{FeatureExtractor, FeatureSet, count_good_matches};
use crate::utils::{list_files_with_extension, load_gray_image};

/// Returns the index and score of the first candidate, in slice order,
/// whose score reaches `threshold`.
///
/// `score` returning `None` marks a candidate that could not be scored.
/// Runs on the current rayon pool.
pub fn first_meeting_threshold<T, F>(
    candidates: &[T],
    threshold: usize,
    score: F,
) -> Option<(usize, usize)>
where
    T: Sync,
    F: Fn(&T) -> Option<usize> + Sync,
{
    candidates
        .par_iter()
        .enumerate()
        .find_map_first(|(index, candidate)| {
            score(candidate)
                .filter(|&s| s >= threshold)
                .map(|s| (index, s))
        })
}

/// The template that satisfied the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMatch {
    pub path: PathBuf,
    pub score: usize,
}

/// Summary of one corpus scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusScan {
    pub matched: Option<TemplateMatch>,
    /// Number of PNG templates in the corpus.
    pub templates: usize,
    /// Templates that could not be loaded.
    pub skipped: usize,
    /// Highest score among the templates that were actually scored.
    pub best_score: usize,
}

/// Accepts a document when one corpus template matches it well enough.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    config: MatchingConfig,
    features: FeatureExtractor,
    pool: Arc<ThreadPool>,
}

impl TemplateMatcher {
    pub fn new(config: MatchingConfig, pool: Arc<ThreadPool>) -> Self {
        let features = FeatureExtractor::new(config.max_keypoints, config.fast_threshold);
        Self {
            config,
            features,
            pool,
        }
    }

    /// Builds the matcher with its own pool.
    pub fn with_policy(config: MatchingConfig, policy: &ParallelPolicy) -> VerifyResult<Self> {
        let pool = policy.build_pool()?;
        Ok(Self::new(config, Arc::new(pool)))
    }

    /// Features of the probe's canonical form.
    pub fn probe_features(&self, artifact: &ImageArtifact) -> FeatureSet {
        self.features
            .extract(&artifact.canonical(self.config.canonical_size))
    }

    /// Good-match count of the probe against one template file.
    pub fn score_template(&self, probe: &FeatureSet, path: &Path) -> VerifyResult<usize> {
        let gray = load_gray_image(path)?;
        let template = self
            .features
            .extract(&canonical_form(&gray, self.config.canonical_size));
        Ok(count_good_matches(
            &probe.descriptors,
            &template.descriptors,
            self.config.ratio,
        ))
    }

    /// Scans the corpus in `dir` for the first template reaching `threshold`.
    ///
    /// A missing or unreadable directory is an empty corpus.
    pub fn scan(&self, dir: &Path, threshold: usize, probe: &FeatureSet) -> CorpusScan {
        let templates = match list_files_with_extension(dir, CANONICAL_EXTENSION) {
            Ok(templates) => templates,
            Err(e) => {
                warn!("Template corpus {} unavailable: {}", dir.display(), e);
                return CorpusScan::default();
            }
        };

        let skipped = AtomicUsize::new(0);
        let best = AtomicUsize::new(0);
        let found = self.pool.install(|| {
            first_meeting_threshold(&templates, threshold, |path| {
                match self.score_template(probe, path) {
                    Ok(score) => {
                        debug!("Template {} scored {}", path.display(), score);
                        best.fetch_max(score, Ordering::Relaxed);
                        Some(score)
                    }
                    Err(e) => {
                        warn!("Skipping template {}: {}", path.display(), e);
                        skipped.fetch_add(1, Ordering::Relaxed);
                        None
                    }
                }
            })
        });

        CorpusScan {
            matched: found.map(|(index, score)| TemplateMatch {
                path: templates[index].clone(),
                score,
            }),
            templates: templates.len(),
            skipped: skipped.into_inner(),
            best_score: best.into_inner(),
        }
    }
}

impl VerificationStage for TemplateMatcher {
    fn stage_name(&self) -> &'static str {
        "template_matching"
    }

    fn evaluate(&self, input: &StageInput<'_>) -> StageOutcome {
        let threshold = input.profile.match_threshold;
        let metrics = StageMetrics::new().with_info("threshold", threshold);

        let Some(dir) = input.profile.template_dir.as_deref() else {
            debug!("No template corpus for this document type");
            return StageOutcome::new(
                StageResult::reject(ReasonCode::TemplateMismatch),
                metrics.with_info("corpus", "none"),
            );
        };

        let probe = self.probe_features(input.artifact);
        let scan = self.scan(dir, threshold, &probe);
        let metrics = metrics
            .with_info("corpus", dir.display())
            .with_info("probe_keypoints", probe.len())
            .with_info("templates", scan.templates)
            .with_info("skipped", scan.skipped)
            .with_info("best_score", scan.best_score);

        match scan.matched {
            Some(found) => {
                debug!(
                    "Matched template {} with {} good matches",
                    found.path.display(),
                    found.score
                );
                StageOutcome::new(
                    StageResult::accept(),
                    metrics
                        .with_info("matched_template", found.path.display())
                        .with_info("match_score", found.score),
                )
            }
            None => StageOutcome::new(StageResult::reject(ReasonCode::TemplateMismatch), metrics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KeywordLexicon, TypeProfile};
    use crate::processors::SkewEstimate;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pool() -> Arc<ThreadPool> {
        Arc::new(
            rayon::ThreadPoolBuilder::new()
                .num_threads(2)
                .build()
                .unwrap(),
        )
    }

    fn matcher() -> TemplateMatcher {
        TemplateMatcher::new(MatchingConfig::default(), pool())
    }

    fn document(seed: u64) -> GrayImage {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid: Vec<u8> = (0..43 * 43)
            .map(|_| if rng.gen_bool(0.5) { 0 } else { 255 })
            .collect();
        GrayImage::from_fn(256, 256, |x, y| Luma([grid[((y / 6) * 43 + x / 6) as usize]]))
    }

    fn artifact(gray: GrayImage) -> ImageArtifact {
        ImageArtifact::new(DynamicImage::ImageLuma8(gray), ImageFormat::Png)
    }

    fn profile(dir: Option<PathBuf>, threshold: usize) -> TypeProfile {
        TypeProfile {
            document_type: None,
            lexicon: KeywordLexicon::default(),
            match_threshold: threshold,
            template_dir: dir,
        }
    }

    fn evaluate(
        matcher: &TemplateMatcher,
        probe: &ImageArtifact,
        profile: &TypeProfile,
    ) -> StageOutcome {
        let skew = SkewEstimate {
            angle: 0.0,
            corrected_image: probe.grayscale(),
        };
        matcher.evaluate(&StageInput {
            profile,
            artifact: probe,
            skew: &skew,
        })
    }

    #[test]
    fn test_first_in_order_wins() {
        let pool = pool();
        let scores = [5usize, 25, 40, 30];
        let found = pool.install(|| first_meeting_threshold(&scores, 20, |&s| Some(s)));
        assert_eq!(found, Some((1, 25)));
    }

    #[test]
    fn test_scan_stops_after_first_acceptance() {
        let pool = pool();
        let scored = AtomicUsize::new(0);
        let candidates: Vec<usize> = (0..2000).collect();
        let found = pool.install(|| {
            first_meeting_threshold(&candidates, 15, |&index| {
                scored.fetch_add(1, Ordering::Relaxed);
                if index == 0 {
                    Some(20)
                } else {
                    std::thread::sleep(std::time::Duration::from_millis(1));
                    Some(30)
                }
            })
        });
        assert_eq!(found, Some((0, 20)));
        let scored = scored.load(Ordering::Relaxed);
        assert!(scored < 100, "scored {scored} of {}", candidates.len());
    }

    #[test]
    fn test_score_equal_to_threshold_accepts() {
        let pool = pool();
        let scores = [14usize, 15];
        let found = pool.install(|| first_meeting_threshold(&scores, 15, |&s| Some(s)));
        assert_eq!(found, Some((1, 15)));
        let none = pool.install(|| first_meeting_threshold(&scores, 16, |&s| Some(s)));
        assert_eq!(none, None);
    }

    #[test]
    fn test_unscorable_candidates_are_skipped() {
        let pool = pool();
        let scores = [None, Some(3), Some(50)];
        let found = pool.install(|| first_meeting_threshold(&scores, 10, |s| *s));
        assert_eq!(found, Some((2, 50)));
        let empty: [usize; 0] = [];
        assert_eq!(first_meeting_threshold(&empty, 0, |&s| Some(s)), None);
    }

    #[test]
    fn test_identical_template_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let page = document(21);
        page.save(dir.path().join("reference.png")).unwrap();

        let matcher = matcher();
        let outcome = evaluate(&matcher, &artifact(page), &profile(Some(dir.path().into()), 25));
        assert!(outcome.result.accepted);
        assert!(outcome.metrics.get("matched_template").is_some());
    }

    #[test]
    fn test_blank_probe_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        document(21).save(dir.path().join("reference.png")).unwrap();

        let blank = artifact(GrayImage::from_pixel(256, 256, Luma([255])));
        let outcome = evaluate(&matcher(), &blank, &profile(Some(dir.path().into()), 15));
        assert_eq!(outcome.result.reason, ReasonCode::TemplateMismatch);
        assert_eq!(outcome.metrics.get("best_score"), Some("0"));
    }

    #[test]
    fn test_broken_and_foreign_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let page = document(33);
        std::fs::write(dir.path().join("a_broken.png"), b"not a png").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();
        page.save(dir.path().join("b_reference.png")).unwrap();

        let matcher = matcher();
        let probe = matcher.probe_features(&artifact(page));
        let scan = matcher.scan(dir.path(), 15, &probe);
        assert_eq!(scan.templates, 2);
        assert_eq!(scan.skipped, 1);
        let found = scan.matched.unwrap();
        assert!(found.path.ends_with("b_reference.png"));
        assert!(found.score >= 15);
    }

    #[test]
    fn test_missing_corpus_is_template_mismatch() {
        let probe = artifact(document(5));
        let missing = profile(Some(PathBuf::from("/nonexistent/corpus")), 15);
        let outcome = evaluate(&matcher(), &probe, &missing);
        assert_eq!(outcome.result.reason, ReasonCode::TemplateMismatch);

        let outcome = evaluate(&matcher(), &probe, &profile(None, 15));
        assert_eq!(outcome.result.reason, ReasonCode::TemplateMismatch);
        assert_eq!(outcome.metrics.get("corpus"), Some("none"));
    }
}
