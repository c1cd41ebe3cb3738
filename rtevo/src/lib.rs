//! A resumable, multi-population genetic algorithm over
//! fixed-length genomes of bounded real values.
//!
//! A [`Run`] evolves several [`Population`]s in lock-step.
//! Each generation keeps an optional elite, adds random
//! immigrants, and fills the rest with children of binary
//! tournament winners (uniform crossover followed by
//! bounded mutation). Populations can exchange their
//! champions, and stagnant ones can be reset.
//!
//! All randomness is drawn from an explicit [`SimContext`],
//! and a run can be checkpointed together with its context
//! through a [`CheckpointStore`]: resuming from a checkpoint
//! reproduces exactly the run that would have happened
//! without interruption. Genomes are evaluated in parallel,
//! each on its own random sub-stream.
//!
//! # Example usage: maximizing the sum of a genome's values
//! ```
//! use rtevo::{GeneticConfig, Genome, PopulationConfig, Run, SimContext};
//! use rand_chacha::ChaCha8Rng;
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_sum(genome: &Genome<()>, _: &mut ChaCha8Rng) -> f64 {
//!     genome.values().sum()
//! }
//!
//! fn main() {
//!     let genetic_config = GeneticConfig {
//!         allele_count: NonZeroUsize::new(8).unwrap(),
//!         min_value: -1.0,
//!         max_value: 1.0,
//!         mutation_step: 0.2,
//!         mutation_rate: 0.1,
//!     };
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(30).unwrap(),
//!         elitism: true,
//!         random_immigrants: 1,
//!     };
//!
//!     let mut ctx = SimContext::new(2021);
//!     let mut run = Run::new(3, population_config, genetic_config, &mut ctx, &evaluate_sum);
//!     let initial = run.champion().fitness().unwrap();
//!     for generation in 1..=40 {
//!         run.advance(&mut ctx, &evaluate_sum);
//!         if generation % 10 == 0 {
//!             run.migrate(&mut ctx);
//!         }
//!     }
//!
//!     assert!(run.champion().fitness().unwrap() >= initial);
//!     assert!(run.champion().values().all(|v| (-1.0..=1.0).contains(&v)));
//! }
//! ```

mod alleles;
mod checkpoints;
mod context;
pub mod errors;
mod evaluation;
mod genomes;
mod populations;
mod runs;

pub use checkpoints::*;
pub use context::SimContext;
pub use evaluation::{Evaluation, Evaluator};
pub use genomes::*;
pub use populations::*;
pub use runs::Run;
