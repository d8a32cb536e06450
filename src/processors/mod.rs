//! Image processing building blocks for document verification.
//!
//! # Modules
//!
//! * `normalize` - Input loading, format allow-list and decoding
//! * `skew` - Projection-profile skew estimation and correction
//! * `sharpness` - Laplacian-variance sharpness statistic
//! * `text` - OCR text tokenization and keyword scoring
//! * `features` - Oriented binary keypoint descriptors and ratio-test matching

pub mod features;
pub mod normalize;
pub mod sharpness;
pub mod skew;
pub mod text;

pub use features::{Descriptor, FeatureExtractor, FeatureSet, Keypoint, count_good_matches};
pub use normalize::{ImageNormalizer, ImageSource};
pub use sharpness::{laplacian_variance, sharpness};
pub use skew::{CandidateScore, SkewCorrector, SkewEstimate, horizontal_projection, profile_score};
pub use text::{has_word_content, keyword_match_fraction, tokenize};
