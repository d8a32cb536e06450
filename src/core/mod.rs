//! The core module of the verification pipeline.
//!
//! This module contains the fundamental components of the pipeline, including:
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//! - Traits defining the interfaces of external collaborators
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;

pub use crate::utils::init_tracing;
pub use config::{ConfigError, ConfigValidator, ParallelPolicy, VerifierConfig};
pub use constants::*;
pub use errors::{VerifyError, VerifyResult};
pub use traits::TextExtractor;
