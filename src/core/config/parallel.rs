//! Parallel processing configuration for the template scan.

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};
use crate::core::constants::DEFAULT_MATCH_WORKERS;

/// Controls the worker pool used by the template matcher.
///
/// Only the corpus scan runs in parallel; every other stage is sequential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Maximum number of worker threads for template comparisons.
    /// If None, rayon picks its default (typically the number of CPU cores).
    /// Default: Some(4)
    #[serde(default = "ParallelPolicy::default_max_threads")]
    pub max_threads: Option<usize>,

    /// Thread name prefix for pool workers, useful in tracing output.
    #[serde(default = "ParallelPolicy::default_thread_name")]
    pub thread_name: String,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Builds the rayon pool described by this policy.
    pub fn build_pool(&self) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        let prefix = self.thread_name.clone();
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(move |i| format!("{prefix}-{i}"));
        if let Some(threads) = self.max_threads {
            builder = builder.num_threads(threads);
        }
        builder.build()
    }

    fn default_max_threads() -> Option<usize> {
        Some(DEFAULT_MATCH_WORKERS)
    }

    fn default_thread_name() -> String {
        "template-match".to_string()
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: Self::default_max_threads(),
            thread_name: Self::default_thread_name(),
        }
    }
}

impl ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_threads == Some(0) {
            return Err(ConfigError::InvalidConfig {
                message: "max_threads must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pool_size() {
        let policy = ParallelPolicy::default();
        assert_eq!(policy.max_threads, Some(4));
        let pool = policy.build_pool().unwrap();
        assert_eq!(pool.current_num_threads(), 4);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let policy = ParallelPolicy::new().with_max_threads(Some(0));
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let policy: ParallelPolicy = serde_json::from_str(r#"{"max_threads": 2}"#).unwrap();
        assert_eq!(policy.max_threads, Some(2));
        assert_eq!(policy.thread_name, "template-match");
    }
}
