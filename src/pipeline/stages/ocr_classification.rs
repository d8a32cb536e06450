//! Keyword classification of OCR text.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{StageInput, StageMetrics, StageOutcome, VerificationStage};
use crate::core::traits::TextExtractor;
use crate::domain::{KeywordLexicon, ReasonCode, StageResult};
use crate::processors::{has_word_content, keyword_match_fraction, tokenize};

/// The keyword measurement behind a classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordScore {
    pub matched: usize,
    pub lexicon_size: usize,
    pub fraction: f32,
}

/// Asks the text extractor for the document's text and scores it against
/// the type lexicon.
#[derive(Clone)]
pub struct OcrClassifier {
    extractor: Arc<dyn TextExtractor>,
    keyword_threshold: f32,
}

impl fmt::Debug for OcrClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrClassifier")
            .field("extractor", &self.extractor.name())
            .field("keyword_threshold", &self.keyword_threshold)
            .finish()
    }
}

impl OcrClassifier {
    pub fn new(extractor: Arc<dyn TextExtractor>, keyword_threshold: f32) -> Self {
        Self {
            extractor,
            keyword_threshold,
        }
    }

    /// Scores already-extracted text.
    ///
    /// Returns `None` when the text carries no word character at all.
    pub fn score_text(text: &str, lexicon: &KeywordLexicon) -> Option<KeywordScore> {
        if !has_word_content(text) {
            return None;
        }
        let tokens = tokenize(text);
        let (matched, fraction) = keyword_match_fraction(&tokens, lexicon);
        Some(KeywordScore {
            matched,
            lexicon_size: lexicon.len(),
            fraction,
        })
    }

    /// Decides on a keyword score. An empty lexicon never accepts.
    pub fn judge(&self, score: &KeywordScore) -> StageResult {
        if score.lexicon_size > 0 && score.fraction >= self.keyword_threshold {
            StageResult::accept()
        } else {
            StageResult::reject(ReasonCode::KeywordMismatch)
        }
    }
}

impl VerificationStage for OcrClassifier {
    fn stage_name(&self) -> &'static str {
        "ocr_classification"
    }

    fn evaluate(&self, input: &StageInput<'_>) -> StageOutcome {
        let metrics = StageMetrics::new().with_info("extractor", self.extractor.name());

        let text = match self.extractor.extract_text(input.artifact) {
            Ok(text) => text,
            // Whatever the extractor reports, the text is unavailable.
            Err(e) => {
                warn!("Text extraction failed: {}", e);
                return StageOutcome::new(
                    StageResult::reject(ReasonCode::Unreadable),
                    metrics.with_info("error", e),
                );
            }
        };

        let Some(score) = Self::score_text(&text, &input.profile.lexicon) else {
            debug!("Extracted text has no word characters");
            return StageOutcome::new(StageResult::reject(ReasonCode::Unreadable), metrics);
        };
        debug!(
            "Keyword fraction {:.4} ({}/{}) against threshold {}",
            score.fraction, score.matched, score.lexicon_size, self.keyword_threshold
        );

        let metrics = metrics
            .with_info("keywords_matched", score.matched)
            .with_info("lexicon_size", score.lexicon_size)
            .with_info("keyword_fraction", score.fraction)
            .with_info("threshold", self.keyword_threshold);
        StageOutcome::new(self.judge(&score), metrics)
    }
}
