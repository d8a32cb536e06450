//! Utility functions for the verification pipeline.
//!
//! This module provides image loading and conversion helpers, geometric
//! transforms, and logging setup.

pub mod image;
pub mod transform;

pub use image::{
    decode_image, dynamic_to_gray, format_from_path,
    is_allowed_format, list_files_with_extension, load_gray_image,
};
pub use transform::{rotate_bicubic_replicate, rotate_mask};

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
