//! A Run is an island model: several populations
//! evolving in lock-step, which can exchange their
//! champions and be reset when they stagnate.
use crate::{Evaluator, GeneticConfig, Genome, Population, PopulationConfig, SimContext};

use std::cmp::Ordering;

use log::info;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A group of populations sharing a generation counter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Run<D> {
    populations: Vec<Population<D>>,
    generation: usize,
}

impl<D: Send> Run<D> {
    /// Creates `population_count` independent random
    /// populations at generation 0.
    ///
    /// # Panics
    /// Panics if `population_count` is 0.
    ///
    /// # Examples
    /// ```
    /// use rtevo::{GeneticConfig, Genome, PopulationConfig, Run, SimContext};
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// fn sum(genome: &Genome<()>, _: &mut ChaCha8Rng) -> f64 {
    ///     genome.values().sum()
    /// }
    ///
    /// let mut ctx = SimContext::new(0);
    /// let mut run = Run::new(
    ///     3,
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(8).unwrap(),
    ///         elitism: true,
    ///         random_immigrants: 0,
    ///     },
    ///     GeneticConfig {
    ///         allele_count: NonZeroUsize::new(4).unwrap(),
    ///         max_value: 1.0,
    ///         mutation_step: 0.1,
    ///         mutation_rate: 0.05,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut ctx,
    ///     &sum,
    /// );
    ///
    /// run.iterate(5, &mut ctx, &sum);
    /// assert_eq!(run.generation(), 5);
    /// assert!(run.populations().iter().all(|p| p.age() == 5));
    /// ```
    pub fn new<E>(
        population_count: usize,
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        ctx: &mut SimContext,
        evaluator: &E,
    ) -> Run<D>
    where
        E: Evaluator<Diagnostics = D>,
    {
        assert!(population_count > 0, "a run needs at least one population");
        let populations = (0..population_count)
            .map(|_| {
                Population::new(
                    population_config.clone(),
                    genetic_config.clone(),
                    ctx,
                    evaluator,
                )
            })
            .collect();
        Run {
            populations,
            generation: 0,
        }
    }

    /// Advances every population by one generation.
    pub fn advance<E>(&mut self, ctx: &mut SimContext, evaluator: &E)
    where
        E: Evaluator<Diagnostics = D>,
        D: Clone,
    {
        self.generation += 1;
        for population in &mut self.populations {
            population.advance(ctx, evaluator);
        }
    }

    /// Advances the run `generations` times.
    pub fn iterate<E>(&mut self, generations: usize, ctx: &mut SimContext, evaluator: &E)
    where
        E: Evaluator<Diagnostics = D>,
        D: Clone,
    {
        for _ in 0..generations {
            self.advance(ctx, evaluator);
        }
    }

    /// Exchanges champions between populations: every
    /// population receives exactly one champion, and
    /// every champion is sent exactly once, in an order
    /// given by a uniform random permutation. A
    /// population may receive its own champion back.
    pub fn migrate(&mut self, ctx: &mut SimContext)
    where
        D: Clone,
    {
        let mut champions: Vec<Genome<D>> = self
            .populations
            .iter()
            .map(|p| p.champion().clone())
            .collect();
        champions.shuffle(ctx.rng());
        for (population, champion) in self.populations.iter_mut().zip(champions) {
            population.inject_immigrant(champion);
        }
        info!("generation {}: migrated champions", self.generation);
    }

    /// Replaces every population stagnant for at least
    /// `threshold` generations with a fresh random one,
    /// except for the population holding the highest
    /// maximum mean fitness (the earliest one on ties).
    ///
    /// Returns the indices of the replaced populations.
    ///
    /// # Examples
    /// ```
    /// use rtevo::{GeneticConfig, Genome, PopulationConfig, Run, SimContext};
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// fn flat(_: &Genome<()>, _: &mut ChaCha8Rng) -> f64 {
    ///     1.0
    /// }
    ///
    /// let mut ctx = SimContext::new(0);
    /// let mut run = Run::new(
    ///     2,
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(4).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     GeneticConfig {
    ///         allele_count: NonZeroUsize::new(2).unwrap(),
    ///         max_value: 1.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut ctx,
    ///     &flat,
    /// );
    /// run.iterate(3, &mut ctx, &flat);
    ///
    /// // Both are stagnant, but the first one is protected.
    /// assert_eq!(run.remove_stagnant(2, &mut ctx, &flat), vec![1]);
    /// assert_eq!(run.populations()[1].age(), 0);
    /// ```
    pub fn remove_stagnant<E>(
        &mut self,
        threshold: usize,
        ctx: &mut SimContext,
        evaluator: &E,
    ) -> Vec<usize>
    where
        E: Evaluator<Diagnostics = D>,
    {
        let protected = self.best_population_index();
        let stagnant: Vec<usize> = self
            .populations
            .iter()
            .enumerate()
            .filter(|&(i, p)| i != protected && p.generations_since_improvement() >= threshold)
            .map(|(i, _)| i)
            .collect();
        for &i in &stagnant {
            let fresh = self.populations[i].reseeded(ctx, evaluator);
            self.populations[i] = fresh;
        }
        if !stagnant.is_empty() {
            info!(
                "generation {}: reset stagnant populations {:?}",
                self.generation, stagnant
            );
        }
        stagnant
    }
}

impl<D> Run<D> {
    /// Returns the number of generations the run has advanced.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the run's populations.
    pub fn populations(&self) -> &[Population<D>] {
        &self.populations
    }

    /// Returns the fittest champion across populations,
    /// the earliest one on ties.
    pub fn champion(&self) -> &Genome<D> {
        let mut best = self.populations[0].champion();
        for population in &self.populations[1..] {
            if population.champion().fitness_cmp(best) == Ordering::Greater {
                best = population.champion();
            }
        }
        best
    }

    /// Index of the first population with the highest
    /// maximum mean fitness.
    fn best_population_index(&self) -> usize {
        let mut best = 0;
        for (i, population) in self.populations.iter().enumerate().skip(1) {
            if population.max_mean_fitness() > self.populations[best].max_mean_fitness() {
                best = i;
            }
        }
        best
    }
}
