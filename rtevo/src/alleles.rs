use crate::errors::AlleleBoundsError;

use std::convert::TryFrom;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alleles are the components of genomes: a single
/// evolvable scalar with fixed bounds and a private
/// mutation step.
///
/// Alleles are immutable; mutation and resampling
/// return new alleles. The value never leaves
/// `[min, max]`, which is also checked when an allele
/// is deserialized from a checkpoint.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "AlleleRecord")]
pub struct Allele {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

/// Unchecked wire form of an [`Allele`].
#[derive(Deserialize)]
struct AlleleRecord {
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl TryFrom<AlleleRecord> for Allele {
    type Error = AlleleBoundsError;

    fn try_from(record: AlleleRecord) -> Result<Allele, AlleleBoundsError> {
        Allele::with_value(record.min, record.max, record.step, record.value)
    }
}

impl Allele {
    /// Returns an allele with a value drawn
    /// uniformly from `[min, max]`.
    ///
    /// # Panics
    /// Panics if `min > max`.
    ///
    /// # Examples
    /// ```
    /// use rtevo::Allele;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(0);
    /// let allele = Allele::new(-3.0, 3.0, 0.5, &mut rng);
    /// assert!((-3.0..=3.0).contains(&allele.value()));
    /// ```
    pub fn new<R: Rng + ?Sized>(min: f64, max: f64, step: f64, rng: &mut R) -> Allele {
        assert!(min <= max, "inverted allele bounds [{}, {}]", min, max);
        Allele {
            min,
            max,
            step,
            value: rng.gen_range(min..=max),
        }
    }

    /// Returns an allele with the given value.
    ///
    /// # Errors
    /// Returns an error if `value` is not within `[min, max]`.
    ///
    /// # Examples
    /// ```
    /// use rtevo::Allele;
    ///
    /// assert!(Allele::with_value(0.0, 1.0, 0.1, 0.5).is_ok());
    /// assert!(Allele::with_value(0.0, 1.0, 0.1, 1.5).is_err());
    /// ```
    pub fn with_value(min: f64, max: f64, step: f64, value: f64) -> Result<Allele, AlleleBoundsError> {
        if min <= value && value <= max {
            Ok(Allele {
                min,
                max,
                step,
                value,
            })
        } else {
            Err(AlleleBoundsError { min, max, value })
        }
    }

    /// With probability `rate`, returns a copy of the allele
    /// nudged by a uniform amount in
    /// `[-min(step, value - min), min(step, max - value)]`,
    /// which cannot leave the allele's bounds. Otherwise
    /// returns an unchanged copy.
    ///
    /// # Examples
    /// ```
    /// use rtevo::Allele;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(1);
    /// let allele = Allele::with_value(0.0, 1.0, 0.25, 0.9).unwrap();
    ///
    /// let mutated = allele.mutate(1.0, &mut rng);
    /// assert!((mutated.value() - 0.9).abs() <= 0.25);
    /// assert!(mutated.value() <= 1.0);
    ///
    /// assert_eq!(allele.mutate(0.0, &mut rng), allele);
    /// ```
    pub fn mutate<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> Allele {
        if rng.gen::<f64>() < rate {
            let down = -self.step.min(self.value - self.min);
            let up = self.step.min(self.max - self.value);
            let value = (self.value + rng.gen_range(down..=up)).clamp(self.min, self.max);
            Allele { value, ..*self }
        } else {
            self.clone()
        }
    }

    /// Returns a fresh allele with the same bounds and
    /// step, and a value drawn uniformly from `[min, max]`.
    pub fn resample<R: Rng + ?Sized>(&self, rng: &mut R) -> Allele {
        Allele::new(self.min, self.max, self.step, rng)
    }

    /// Returns the allele's value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the allele's lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the allele's upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns the allele's maximum mutation step.
    pub fn step(&self) -> f64 {
        self.step
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn mutation_never_leaves_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut allele = Allele::new(-1.0, 1.0, 0.7, &mut rng);
        for _ in 0..20_000 {
            allele = allele.mutate(0.5, &mut rng);
            assert!(allele.min() <= allele.value() && allele.value() <= allele.max());
        }
    }

    #[test]
    fn mutation_at_bounds_stays_put_on_the_outer_side() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let at_max = Allele::with_value(0.0, 2.0, 0.5, 2.0).unwrap();
        for _ in 0..1000 {
            let m = at_max.mutate(1.0, &mut rng);
            assert!(m.value() <= 2.0 && m.value() >= 1.5);
        }
    }

    #[test]
    fn degenerate_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let allele = Allele::new(4.0, 4.0, 1.0, &mut rng);
        assert_eq!(allele.value(), 4.0);
        assert_eq!(allele.mutate(1.0, &mut rng).value(), 4.0);
    }

    #[test]
    fn resample_keeps_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let allele = Allele::with_value(-5.0, 5.0, 0.1, 0.0).unwrap();
        let fresh = allele.resample(&mut rng);
        assert_eq!((fresh.min(), fresh.max(), fresh.step()), (-5.0, 5.0, 0.1));
        assert!((-5.0..=5.0).contains(&fresh.value()));
    }

    #[test]
    fn deserializing_out_of_bounds_allele_fails() {
        let good = r#"{"min":0.0,"max":1.0,"step":0.1,"value":0.5}"#;
        let bad = r#"{"min":0.0,"max":1.0,"step":0.1,"value":3.0}"#;
        assert!(serde_json::from_str::<Allele>(good).is_ok());
        assert!(serde_json::from_str::<Allele>(bad).is_err());
    }
}
