//! Domain types for document verification.
//!
//! This module holds the document classes and their profiles, the keyword
//! lexicon, the image artifact passed between stages, and the uniform stage
//! result that becomes the final verdict.

pub mod artifact;
pub mod document_type;
pub mod keywords;
pub mod lexicon;
pub mod verdict;

pub use artifact::{ImageArtifact, canonical_form};
pub use document_type::{DocumentType, ProfileRegistry, TypeProfile};
pub use lexicon::KeywordLexicon;
pub use verdict::{ReasonCode, StageResult, Verdict};
