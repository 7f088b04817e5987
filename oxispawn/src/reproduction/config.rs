use super::ConfigError;
use crate::GenomeKey;

use serde::{Deserialize, Serialize};

/// Configuration data for reproduction.
///
/// Validated when a [`Reproduction`] is created.
///
/// [`Reproduction`]: crate::Reproduction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    /// Top n of each species which is copied
    /// as-is to the next generation.
    pub elitism: usize,
    /// Top fraction of each species which can participate
    /// in mating. Must lie in `(0, 1]`.
    pub survival_threshold: f32,
    /// Key of the first genome created.
    pub first_genome_key: GenomeKey,
}

impl ReproductionConfig {
    /// Checks that all values are within their valid ranges.
    ///
    /// # Examples
    /// ```
    /// use oxispawn::ReproductionConfig;
    ///
    /// let config = ReproductionConfig {
    ///     survival_threshold: 0.0,
    ///     ..ReproductionConfig::default()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Written to also reject NaN.
        if !(self.survival_threshold > 0.0 && self.survival_threshold <= 1.0) {
            return Err(ConfigError::SurvivalThreshold(self.survival_threshold));
        }
        Ok(())
    }
}

impl Default for ReproductionConfig {
    fn default() -> ReproductionConfig {
        ReproductionConfig {
            elitism: 0,
            survival_threshold: 0.2,
            first_genome_key: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survival_threshold_bounds() {
        let with = |survival_threshold| ReproductionConfig {
            survival_threshold,
            ..ReproductionConfig::default()
        };
        assert!(with(1.0).validate().is_ok());
        assert!(with(0.01).validate().is_ok());
        assert_eq!(
            with(0.0).validate(),
            Err(ConfigError::SurvivalThreshold(0.0))
        );
        assert!(with(1.5).validate().is_err());
        assert!(with(-0.5).validate().is_err());
        assert!(with(f32::NAN).validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ReproductionConfig =
            serde_json::from_str(r#"{ "elitism": 2, "survival_threshold": 0.5 }"#).unwrap();
        assert_eq!(config.elitism, 2);
        assert_eq!(config.survival_threshold, 0.5);
        assert_eq!(config.first_genome_key, 1);
    }

    #[test]
    fn negative_elitism_is_rejected_by_deserialization() {
        let config = serde_json::from_str::<ReproductionConfig>(r#"{ "elitism": -1 }"#);
        assert!(config.is_err());
    }
}
