//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a value lies outside its accepted range.
    #[error("{field} must be in {expected}, got {actual}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },
}

/// A trait for validating configuration parameters.
///
/// Every configuration record of the pipeline implements this so that
/// [`VerifierConfig::validate`](crate::core::config::VerifierConfig) can walk
/// the whole tree before the verifier is built.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a floating point value is strictly positive and finite.
    fn validate_positive_f32(&self, field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                field,
                expected: "(0, inf)",
                actual: value.to_string(),
            })
        }
    }

    /// Validates that a floating point value lies in the closed unit interval.
    fn validate_unit_interval(&self, field: &'static str, value: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                field,
                expected: "[0, 1]",
                actual: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    impl ConfigValidator for Sample {
        fn validate(&self) -> Result<(), ConfigError> {
            Ok(())
        }

        fn get_defaults() -> Self {
            Sample
        }
    }

    #[test]
    fn test_validate_positive_f32() {
        assert!(Sample.validate_positive_f32("x", 0.5).is_ok());
        assert!(Sample.validate_positive_f32("x", 0.0).is_err());
        assert!(Sample.validate_positive_f32("x", f32::NAN).is_err());
        assert!(Sample.validate_positive_f32("x", f32::INFINITY).is_err());
    }

    #[test]
    fn test_validate_unit_interval() {
        assert!(Sample.validate_unit_interval("x", 0.0).is_ok());
        assert!(Sample.validate_unit_interval("x", 1.0).is_ok());
        let err = Sample.validate_unit_interval("ratio", 1.5).unwrap_err();
        assert_eq!(err.to_string(), "ratio must be in [0, 1], got 1.5");
    }
}
