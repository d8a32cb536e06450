//! # OAR Verify
//!
//! A Rust library that decides whether a submitted document image is a genuine
//! instance of a declared document class: invoice, prescription or lab report.
//!
//! ## Features
//!
//! - Format allow-list and normalization of the submitted image
//! - Projection-profile skew estimation and correction
//! - Laplacian-variance blur rejection
//! - Keyword classification of OCR text through a pluggable extractor
//! - Oriented binary descriptor matching against a per-type template corpus,
//!   scanned on a bounded worker pool
//! - One verdict per submission with a serializable diagnostic report
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, constants and collaborator traits
//! * [`domain`] - Document types, profiles, lexicons, artifacts and verdicts
//! * [`extractors`] - Text extractor implementations
//! * [`pipeline`] - The verification stages and their orchestrator
//! * [`processors`] - Image processing building blocks
//! * [`utils`] - Image loading, transforms and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oar_verify::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VerifierConfig::default().with_corpus_root("templates");
//! let verifier = DocumentVerifier::new(config, TesseractCli::new())?;
//!
//! let report = verifier.verify("invoice", &ImageSource::path("scan.jpg"));
//! println!("{}", report.message());
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Configuration
//!
//! ```rust
//! use oar_verify::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VerifierConfig::from_json_str(r#"
//! {
//!   "corpus_root": "templates",
//!   "quality": { "blur_threshold": 80.0 },
//!   "ocr": { "keyword_threshold": 0.1 }
//! }
//! "#)?;
//! assert_eq!(config.quality.blur_threshold, 80.0);
//! assert_eq!(config.profiles.invoice.match_threshold, 15);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod extractors;

pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use oar_verify::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - The verifier and its report (`DocumentVerifier`, `VerificationReport`)
/// - Configuration (`VerifierConfig`)
/// - Inputs and outcomes (`ImageSource`, `DocumentType`, `ReasonCode`, `Verdict`)
/// - Text extractors (`TextExtractor`, `StaticText`, `TesseractCli`)
/// - Essential error and result types (`VerifyError`, `VerifyResult`)
///
/// For custom stages or direct access to the processors, import from the
/// respective modules (e.g., `oar_verify::pipeline::stages`, `oar_verify::processors`).
pub mod prelude {
    pub use crate::pipeline::{DocumentVerifier, VerificationReport};

    pub use crate::core::config::VerifierConfig;
    pub use crate::core::traits::TextExtractor;
    pub use crate::domain::{DocumentType, ImageArtifact, ReasonCode, Verdict};
    pub use crate::extractors::{StaticText, TesseractCli};
    pub use crate::processors::ImageSource;

    // Error Handling (essential)
    pub use crate::core::{VerifyError, VerifyResult};
}
