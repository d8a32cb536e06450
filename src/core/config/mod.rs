//! Configuration types for the verification pipeline.

pub mod errors;
pub mod parallel;
pub mod verifier;

pub use errors::{ConfigError, ConfigValidator};
pub use parallel::ParallelPolicy;
pub use verifier::{
    MatchingConfig, OcrConfig, ProfileConfig, ProfilesConfig, QualityConfig, SkewConfig,
    VerifierConfig,
};
