use crate::errors::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]; this is
/// checked by [`validate`](GeneticConfig::validate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of alleles in a genome.
    pub allele_count: NonZeroUsize,
    /// Lower bound of every allele.
    pub min_value: f64,
    /// Upper bound of every allele.
    pub max_value: f64,
    /// Maximum magnitude of a single mutation.
    pub mutation_step: f64,
    /// Chance that an allele mutates when copied
    /// into a child.
    pub mutation_rate: f64,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use rtevo::GeneticConfig;
    ///
    /// let cfg = GeneticConfig {
    ///     max_value: 1.0,
    ///     mutation_rate: 0.05,
    ///     ..GeneticConfig::zero()
    /// };
    /// assert!(cfg.validate().is_ok());
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            allele_count: NonZeroUsize::MIN,
            min_value: 0.0,
            max_value: 0.0,
            mutation_step: 0.0,
            mutation_rate: 0.0,
        }
    }

    /// Checks that bounds, step and rate are consistent.
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_value.is_finite() && self.max_value.is_finite())
            || self.min_value > self.max_value
        {
            return Err(ConfigError::AlleleBounds(self.min_value, self.max_value));
        }
        if !self.mutation_step.is_finite() || self.mutation_step < 0.0 {
            return Err(ConfigError::MutationStep(self.mutation_step));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::Probability {
                name: "mutation_rate",
                value: self.mutation_rate,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inconsistent_configs() {
        let base = GeneticConfig {
            min_value: -1.0,
            max_value: 1.0,
            mutation_step: 0.1,
            mutation_rate: 0.05,
            ..GeneticConfig::zero()
        };
        assert_eq!(base.validate(), Ok(()));
        assert_eq!(
            GeneticConfig { min_value: 2.0, ..base.clone() }.validate(),
            Err(ConfigError::AlleleBounds(2.0, 1.0))
        );
        assert_eq!(
            GeneticConfig { mutation_step: -0.5, ..base.clone() }.validate(),
            Err(ConfigError::MutationStep(-0.5))
        );
        assert!(matches!(
            GeneticConfig { mutation_rate: 1.5, ..base }.validate(),
            Err(ConfigError::Probability { name: "mutation_rate", .. })
        ));
    }
}
