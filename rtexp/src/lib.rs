//! # rtexp
//! Evolution of spiking network controllers performing cued
//! reaction-time tasks, in their simple (one response) and
//! choice (left or right response) forms.
//!
//! Every trial starts with a settling period, shows a cue that
//! is valid, neutral or invalid about the upcoming target's side,
//! and then presents the target, or nothing at all on catch
//! trials. Controllers are rewarded for fast correct responses
//! and for withholding responses on catch trials, and report the
//! median reaction time of each cue validity.
//!
//! Experiments are described by a RON file (see
//! [`ExperimentConfig`](config::ExperimentConfig)) and driven by
//! [`Experiment`](driver::Experiment), which checkpoints every run
//! so that interrupted experiments resume where they stopped.
//!
//! # Example usage: scoring a single random controller
//! ```
//! use rtevo::{Evaluator, GeneticConfig, Genome, SimContext};
//! use rtexp::{
//!     evaluator::RtEvaluator,
//!     simulator::{TrialSimulator, TrialTiming},
//!     tasks::TaskType,
//!     trials::TrialBattery,
//! };
//! use rtevo_nn::networks::Topology;
//! use std::num::NonZeroUsize;
//!
//! let topology = Topology {
//!     inputs: NonZeroUsize::new(5).unwrap(),
//!     outputs: NonZeroUsize::new(1).unwrap(),
//!     hidden: 2,
//! };
//! let simulator = TrialSimulator::new(TaskType::Simple, TrialTiming::default(), 20.0, 20.0, None).unwrap();
//! let evaluator = RtEvaluator::new(topology, 10.0, simulator, TrialBattery::new(1, 1, 1, 0.5, 1));
//!
//! let mut ctx = SimContext::new(0);
//! let genome = Genome::random(
//!     &GeneticConfig {
//!         allele_count: NonZeroUsize::new(topology.parameter_count()).unwrap(),
//!         min_value: -30.0,
//!         max_value: 30.0,
//!         ..GeneticConfig::zero()
//!     },
//!     ctx.rng(),
//! );
//! let evaluation = evaluator.evaluate(&genome, ctx.rng());
//! println!("{}", evaluation.diagnostics);
//! ```

pub mod config;
pub mod driver;
pub mod evaluator;
pub mod simulator;
pub mod tasks;
pub mod trials;
