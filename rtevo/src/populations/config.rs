use crate::errors::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Whether the best genome is copied as-is
    /// to the next generation.
    pub elitism: bool,
    /// Number of freshly resampled genomes
    /// inserted into each new generation.
    pub random_immigrants: usize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration:
    /// a single genome, no elitism and no immigrants.
    ///
    /// # Examples
    /// ```
    /// use rtevo::PopulationConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let cfg = PopulationConfig {
    ///     size: NonZeroUsize::new(100).unwrap(),
    ///     elitism: true,
    ///     ..PopulationConfig::zero()
    /// };
    /// assert!(cfg.validate().is_ok());
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            elitism: false,
            random_immigrants: 0,
        }
    }

    /// Number of slots of each generation not
    /// produced by mating.
    pub fn reserved_slots(&self) -> usize {
        usize::from(self.elitism) + self.random_immigrants
    }

    /// Checks that elite and immigrant slots fit
    /// in the population.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoRoomForOffspring`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reserved_slots() > self.size.get() {
            return Err(ConfigError::NoRoomForOffspring {
                size: self.size.get(),
                reserved: self.reserved_slots(),
            });
        }
        Ok(())
    }
}
