//! A Population is a fixed-size collection of
//! genomes sharing a fitness evaluator. Each
//! generation is produced by elitism, random
//! immigration and binary tournament mating,
//! and is evaluated in parallel.
mod config;
pub mod stats;

use crate::{Evaluator, GeneticConfig, Genome, SimContext};
pub use config::PopulationConfig;
use stats::Stats;

use std::cmp::Ordering;

use log::debug;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A population of genomes.
///
/// The population's size never changes: every
/// generation replaces all of its members.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Population<D> {
    genomes: Vec<Genome<D>>,
    champion: usize,
    age: usize,
    mean_fitness: f64,
    max_mean_fitness: f64,
    generations_since_improvement: usize,
    population_config: PopulationConfig,
    genetic_config: GeneticConfig,
}

impl<D: Send> Population<D> {
    /// Creates a new, evaluated population of random
    /// genomes using the passed configurations.
    ///
    /// # Panics
    /// Panics if the evaluator breaks its contract
    /// (see [`Evaluator`]).
    ///
    /// # Examples
    /// ```
    /// use rtevo::{GeneticConfig, Genome, Population, PopulationConfig, SimContext};
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// fn sum(genome: &Genome<()>, _: &mut ChaCha8Rng) -> f64 {
    ///     genome.values().sum()
    /// }
    ///
    /// let mut ctx = SimContext::new(0);
    /// let population = Population::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(20).unwrap(),
    ///         ..PopulationConfig::zero()
    ///     },
    ///     GeneticConfig {
    ///         allele_count: NonZeroUsize::new(4).unwrap(),
    ///         max_value: 1.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut ctx,
    ///     &sum,
    /// );
    ///
    /// assert_eq!(population.len(), 20);
    /// assert!(population.genomes().iter().all(|g| g.is_evaluated()));
    /// ```
    pub fn new<E>(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        ctx: &mut SimContext,
        evaluator: &E,
    ) -> Population<D>
    where
        E: Evaluator<Diagnostics = D>,
    {
        let template = Genome::random(&genetic_config, ctx.rng());
        Population::from_template(&template, population_config, genetic_config, ctx, evaluator)
    }

    /// Creates a new, evaluated population whose genomes
    /// are resampled from the shape of `template`.
    ///
    /// # Panics
    /// Panics if the template does not have
    /// `genetic_config.allele_count` alleles.
    pub fn from_template<E>(
        template: &Genome<D>,
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        ctx: &mut SimContext,
        evaluator: &E,
    ) -> Population<D>
    where
        E: Evaluator<Diagnostics = D>,
    {
        assert_eq!(
            template.len(),
            genetic_config.allele_count.get(),
            "template genome does not match the genetic configuration"
        );
        let mut genomes: Vec<Genome<D>> = (0..population_config.size.get())
            .map(|_| template.resample(ctx.rng()))
            .collect();
        evaluate_all(&mut genomes, ctx, evaluator);
        let champion = find_champion(&genomes);
        let mean_fitness = mean_fitness(&genomes);
        Population {
            genomes,
            champion,
            age: 0,
            mean_fitness,
            max_mean_fitness: mean_fitness,
            generations_since_improvement: 0,
            population_config,
            genetic_config,
        }
    }

    /// Replaces every genome with a new generation
    /// and evaluates it.
    ///
    /// The new generation holds, in order: a copy of
    /// the current champion (if elitism is enabled),
    /// the configured number of random immigrants,
    /// and children of parents picked by binary
    /// tournaments.
    ///
    /// # Panics
    /// Panics if the evaluator breaks its contract
    /// (see [`Evaluator`]).
    ///
    /// # Examples
    /// ```
    /// use rtevo::{GeneticConfig, Genome, Population, PopulationConfig, SimContext};
    /// use rand_chacha::ChaCha8Rng;
    /// use std::num::NonZeroUsize;
    ///
    /// fn sum(genome: &Genome<()>, _: &mut ChaCha8Rng) -> f64 {
    ///     genome.values().sum()
    /// }
    ///
    /// let mut ctx = SimContext::new(1);
    /// let mut population = Population::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(10).unwrap(),
    ///         elitism: true,
    ///         random_immigrants: 1,
    ///     },
    ///     GeneticConfig {
    ///         allele_count: NonZeroUsize::new(3).unwrap(),
    ///         max_value: 1.0,
    ///         mutation_step: 0.1,
    ///         mutation_rate: 0.05,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut ctx,
    ///     &sum,
    /// );
    ///
    /// population.advance(&mut ctx, &sum);
    ///
    /// assert_eq!(population.age(), 1);
    /// assert_eq!(population.len(), 10);
    /// ```
    pub fn advance<E>(&mut self, ctx: &mut SimContext, evaluator: &E)
    where
        E: Evaluator<Diagnostics = D>,
        D: Clone,
    {
        let size = self.genomes.len();
        let mut offspring = Vec::with_capacity(size);
        if self.population_config.elitism {
            offspring.push(self.champion().clone());
        }
        for _ in 0..self.population_config.random_immigrants {
            offspring.push(self.genomes[0].resample(ctx.rng()));
        }
        while offspring.len() < size {
            let parent1 = self.tournament(ctx);
            let parent2 = self.tournament(ctx);
            offspring.push(parent1.recombine(
                parent2,
                self.genetic_config.mutation_rate,
                ctx.rng(),
            ));
        }
        assert_eq!(offspring.len(), size, "population size changed during advance");

        self.genomes = offspring;
        evaluate_all(&mut self.genomes, ctx, evaluator);
        self.champion = find_champion(&self.genomes);
        self.mean_fitness = mean_fitness(&self.genomes);
        if self.mean_fitness > self.max_mean_fitness {
            self.max_mean_fitness = self.mean_fitness;
            self.generations_since_improvement = 0;
        } else {
            self.generations_since_improvement += 1;
        }
        self.age += 1;
        debug!(
            "population age {}: mean fitness {:.3}, champion fitness {:.3}, stagnant for {}",
            self.age,
            self.mean_fitness,
            self.champion().expect_fitness(),
            self.generations_since_improvement
        );
    }

    /// Returns a fresh population with the same size,
    /// configuration and genome shape, as if the
    /// population had just been created.
    pub fn reseeded<E>(&self, ctx: &mut SimContext, evaluator: &E) -> Population<D>
    where
        E: Evaluator<Diagnostics = D>,
    {
        Population::from_template(
            &self.genomes[0],
            self.population_config.clone(),
            self.genetic_config.clone(),
            ctx,
            evaluator,
        )
    }

    /// Picks two genomes uniformly at random (with
    /// replacement) and returns the fitter one.
    fn tournament(&self, ctx: &mut SimContext) -> &Genome<D> {
        let first = &self.genomes[ctx.rng().gen_range(0..self.genomes.len())];
        let second = &self.genomes[ctx.rng().gen_range(0..self.genomes.len())];
        if second.fitness_cmp(first) == Ordering::Greater {
            second
        } else {
            first
        }
    }
}

impl<D> Population<D> {
    /// Places `immigrant` in the slot currently held
    /// by the population's champion, then looks for
    /// the new champion. The mean fitness is left as is.
    ///
    /// # Panics
    /// Panics if the immigrant has not been evaluated
    /// or does not have the population's genome length.
    pub fn inject_immigrant(&mut self, immigrant: Genome<D>) {
        assert!(
            immigrant.is_evaluated(),
            "immigrant injected before evaluation"
        );
        assert_eq!(
            immigrant.len(),
            self.genomes[0].len(),
            "immigrant genome length does not match the population"
        );
        self.genomes[self.champion] = immigrant;
        self.champion = find_champion(&self.genomes);
    }

    /// Returns the currently best-performing genome.
    /// Ties go to the earliest genome.
    pub fn champion(&self) -> &Genome<D> {
        &self.genomes[self.champion]
    }

    /// Returns the position of the champion.
    pub fn champion_index(&self) -> usize {
        self.champion
    }

    /// Returns all current genomes.
    pub fn genomes(&self) -> &[Genome<D>] {
        &self.genomes
    }

    /// Returns the number of genomes.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Always `false`: populations hold at least one genome.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Returns the number of generations the
    /// population has advanced.
    pub fn age(&self) -> usize {
        self.age
    }

    /// Returns the current generation's mean fitness.
    pub fn mean_fitness(&self) -> f64 {
        self.mean_fitness
    }

    /// Returns the highest mean fitness the population
    /// has ever reached.
    pub fn max_mean_fitness(&self) -> f64 {
        self.max_mean_fitness
    }

    /// Returns the number of consecutive generations
    /// without an improvement of the maximum mean fitness.
    pub fn generations_since_improvement(&self) -> usize {
        self.generations_since_improvement
    }

    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    pub fn genetic_config(&self) -> &GeneticConfig {
        &self.genetic_config
    }

    #[cfg(test)]
    pub(crate) fn force_stagnation(&mut self, generations: usize, max_mean_fitness: f64) {
        self.generations_since_improvement = generations;
        self.max_mean_fitness = max_mean_fitness;
    }

    /// Returns statistics over the current fitness values.
    pub fn fitness_stats(&self) -> Stats {
        Stats::from(self.genomes.iter().map(Genome::expect_fitness))
            .expect("empty population has no statistics")
    }
}

/// Evaluates every genome on its own random sub-stream.
/// Sub-streams depend only on a single draw from the
/// master stream and on the genome's position.
fn evaluate_all<D, E>(genomes: &mut [Genome<D>], ctx: &mut SimContext, evaluator: &E)
where
    D: Send,
    E: Evaluator<Diagnostics = D>,
{
    let seed = ctx.next_evaluation_seed();
    genomes
        .par_iter_mut()
        .enumerate()
        .for_each(|(index, genome)| {
            let mut rng = SimContext::evaluation_stream(seed, index);
            let evaluation = evaluator.evaluate(genome, &mut rng);
            genome.set_evaluation(evaluation);
        });
}

/// Returns the index of the first genome with maximal fitness.
fn find_champion<D>(genomes: &[Genome<D>]) -> usize {
    let mut champion = 0;
    for (i, genome) in genomes.iter().enumerate().skip(1) {
        if genome.fitness_cmp(&genomes[champion]) == Ordering::Greater {
            champion = i;
        }
    }
    champion
}

fn mean_fitness<D>(genomes: &[Genome<D>]) -> f64 {
    genomes.iter().map(Genome::expect_fitness).sum::<f64>() / genomes.len() as f64
}
