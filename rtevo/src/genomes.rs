//! A Genome is an ordered, fixed-length sequence
//! of [`Allele`]s, together with the fitness and
//! task-specific diagnostics attached to it by an
//! [`Evaluator`](crate::Evaluator).
mod config;

pub use crate::alleles::Allele;
pub use config::GeneticConfig;

use crate::evaluation::Evaluation;

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A genome, parameterized over the diagnostics
/// type `D` its evaluator reports.
///
/// Genomes are never modified after creation except
/// to attach their evaluation; reproduction always
/// produces new genomes.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome<D> {
    alleles: Box<[Allele]>,
    fitness: Option<f64>,
    diagnostics: Option<D>,
}

impl<D> Genome<D> {
    /// Returns an unevaluated genome made of `alleles`.
    ///
    /// # Examples
    /// ```
    /// use rtevo::{Allele, Genome};
    ///
    /// let genome = Genome::<()>::new(vec![
    ///     Allele::with_value(0.0, 1.0, 0.1, 0.2).unwrap(),
    ///     Allele::with_value(0.0, 1.0, 0.1, 0.7).unwrap(),
    /// ]);
    /// assert_eq!(genome.len(), 2);
    /// assert_eq!(genome.fitness(), None);
    /// ```
    pub fn new(alleles: Vec<Allele>) -> Genome<D> {
        Genome {
            alleles: alleles.into(),
            fitness: None,
            diagnostics: None,
        }
    }

    /// Returns a randomized genome shaped after `config`.
    pub fn random<R: Rng + ?Sized>(config: &GeneticConfig, rng: &mut R) -> Genome<D> {
        Genome::new(
            (0..config.allele_count.get())
                .map(|_| {
                    Allele::new(
                        config.min_value,
                        config.max_value,
                        config.mutation_step,
                        rng,
                    )
                })
                .collect(),
        )
    }

    /// Returns a new unevaluated genome of the same
    /// shape, with every allele independently resampled.
    pub fn resample<R: Rng + ?Sized>(&self, rng: &mut R) -> Genome<D> {
        Genome::new(self.alleles.iter().map(|a| a.resample(rng)).collect())
    }

    /// Combines two genomes and returns a "child" genome.
    ///
    /// Each position takes the allele of either parent
    /// with equal chance (uniform crossover), after which
    /// every allele is given a `mutation_rate` chance of
    /// mutating.
    ///
    /// # Panics
    /// Panics if the parents differ in length.
    ///
    /// # Examples
    /// ```
    /// use rtevo::{Allele, Genome};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let zeros = Genome::<()>::new(vec![Allele::with_value(0.0, 1.0, 0.1, 0.0).unwrap(); 8]);
    /// let ones = Genome::<()>::new(vec![Allele::with_value(0.0, 1.0, 0.1, 1.0).unwrap(); 8]);
    ///
    /// let mut rng = ChaCha8Rng::seed_from_u64(4);
    /// let child = zeros.recombine(&ones, 0.0, &mut rng);
    /// assert!(child.values().all(|v| v == 0.0 || v == 1.0));
    /// ```
    pub fn recombine<R: Rng + ?Sized>(
        &self,
        other: &Genome<D>,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Genome<D> {
        assert_eq!(
            self.len(),
            other.len(),
            "recombination of genomes of different lengths"
        );
        let chosen: Vec<&Allele> = self
            .alleles
            .iter()
            .zip(other.alleles.iter())
            .map(|(a, b)| if rng.gen::<bool>() { a } else { b })
            .collect();
        Genome::new(
            chosen
                .into_iter()
                .map(|a| a.mutate(mutation_rate, rng))
                .collect(),
        )
    }

    /// Returns the number of alleles.
    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    /// Returns `true` if the genome has no alleles.
    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Returns the genome's alleles.
    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    /// Returns an iterator over the alleles' values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.alleles.iter().map(Allele::value)
    }

    /// Returns the genome's fitness, if it has been evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Returns the diagnostics reported by the genome's evaluation.
    pub fn diagnostics(&self) -> Option<&D> {
        self.diagnostics.as_ref()
    }

    /// Returns `true` once an evaluation has been attached.
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Attaches an evaluation to the genome.
    ///
    /// # Panics
    /// Panics if the fitness is not a finite number.
    pub fn set_evaluation(&mut self, evaluation: Evaluation<D>) {
        assert!(
            evaluation.fitness.is_finite(),
            "evaluator assigned non-finite fitness {}",
            evaluation.fitness
        );
        self.fitness = Some(evaluation.fitness);
        self.diagnostics = Some(evaluation.diagnostics);
    }

    /// Compares two genomes by fitness.
    ///
    /// # Panics
    /// Panics if either genome has not been evaluated.
    pub fn fitness_cmp(&self, other: &Genome<D>) -> Ordering {
        self.expect_fitness()
            .partial_cmp(&other.expect_fitness())
            .unwrap_or_else(|| panic!("uncomparable fitness value detected"))
    }

    pub(crate) fn expect_fitness(&self) -> f64 {
        self.fitness
            .unwrap_or_else(|| panic!("genome compared before evaluation"))
    }
}

impl<D> Index<usize> for Genome<D> {
    type Output = Allele;

    fn index(&self, index: usize) -> &Allele {
        &self.alleles[index]
    }
}

impl<D> fmt::Display for Genome<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome {{ fitness: ")?;
        match self.fitness {
            Some(fitness) => write!(f, "{:.3}", fitness)?,
            None => write!(f, "-")?,
        }
        write!(
            f,
            ", alleles: [{}] }}",
            self.alleles
                .iter()
                .map(|a| format!("{:.4}", a.value()))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> GeneticConfig {
        GeneticConfig {
            allele_count: std::num::NonZeroUsize::new(40).unwrap(),
            min_value: -10.0,
            max_value: 10.0,
            mutation_step: 1.0,
            mutation_rate: 0.05,
        }
    }

    #[test]
    fn recombined_alleles_come_from_a_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let p1 = Genome::<()>::random(&config(), &mut rng);
        let p2 = Genome::<()>::random(&config(), &mut rng);
        for _ in 0..50 {
            let child = p1.recombine(&p2, 0.0, &mut rng);
            assert_eq!(child.len(), p1.len());
            for i in 0..child.len() {
                assert!(child[i] == p1[i] || child[i] == p2[i]);
            }
        }
    }

    #[test]
    fn recombination_uses_both_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let p1 = Genome::<()>::random(&config(), &mut rng);
        let p2 = Genome::<()>::random(&config(), &mut rng);
        let child = p1.recombine(&p2, 0.0, &mut rng);
        assert!((0..child.len()).any(|i| child[i] == p1[i]));
        assert!((0..child.len()).any(|i| child[i] == p2[i]));
    }

    #[test]
    fn mutated_children_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mut genome = Genome::<()>::random(&config(), &mut rng);
        let other = Genome::<()>::random(&config(), &mut rng);
        for _ in 0..500 {
            genome = genome.recombine(&other, 1.0, &mut rng);
        }
        assert!(genome.values().all(|v| (-10.0..=10.0).contains(&v)));
    }

    #[test]
    fn resample_is_unevaluated_and_same_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let mut genome = Genome::<u8>::random(&config(), &mut rng);
        genome.set_evaluation(Evaluation::new(3.0, 1));
        let fresh = genome.resample(&mut rng);
        assert_eq!(fresh.len(), genome.len());
        assert!(!fresh.is_evaluated());
        assert_eq!(fresh.diagnostics(), None);
    }

    #[test]
    #[should_panic(expected = "genome compared before evaluation")]
    fn comparing_unevaluated_genomes_panics() {
        let mut rng = ChaCha8Rng::seed_from_u64(25);
        let a = Genome::<()>::random(&config(), &mut rng);
        let b = Genome::<()>::random(&config(), &mut rng);
        a.fitness_cmp(&b);
    }

    #[test]
    #[should_panic(expected = "non-finite fitness")]
    fn non_finite_fitness_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(26);
        let mut a = Genome::<()>::random(&config(), &mut rng);
        a.set_evaluation(Evaluation::new(f64::NAN, ()));
    }
}
