//! The resumable experiment loop: each run advances
//! in save intervals, and every interval ends with a
//! checkpoint. Intervals already checkpointed are
//! loaded instead of recomputed.
use crate::config::{ExperimentConfig, ExperimentConfigError};
use crate::evaluator::RtEvaluator;
use crate::tasks::RtDiagnostics;

use rtevo::errors::CheckpointError;
use rtevo::{CheckpointStore, Genome, Run, SimContext};

use log::{debug, info};
use thiserror::Error;

use std::time::{Duration, Instant};

/// An error type for experiment failures.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Config(#[from] ExperimentConfigError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

/// The final state of a finished run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub run_index: usize,
    pub generation: usize,
    pub champion: Genome<RtDiagnostics>,
}

/// A configured experiment.
#[derive(Debug)]
pub struct Experiment {
    config: ExperimentConfig,
    evaluator: RtEvaluator,
    store: CheckpointStore,
}

impl Experiment {
    /// Prepares an experiment, creating its
    /// checkpoint directory if needed.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    /// or the checkpoint directory cannot be created.
    pub fn new(config: ExperimentConfig) -> Result<Experiment, DriverError> {
        config.validate()?;
        let evaluator = RtEvaluator::from_config(&config)?;
        let store = CheckpointStore::open(&config.directory)?;
        Ok(Experiment {
            config,
            evaluator,
            store,
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn store(&self) -> &CheckpointStore {
        &self.store
    }

    /// Runs (or resumes) every run of the experiment in turn.
    ///
    /// # Errors
    /// Stops at the first checkpoint error.
    pub fn run_all(&self) -> Result<Vec<RunSummary>, DriverError> {
        (0..self.config.runs).map(|i| self.run(i)).collect()
    }

    /// Runs (or resumes) a single run up to the
    /// configured number of generations.
    ///
    /// # Errors
    /// Returns an error if a checkpoint cannot be read or written.
    pub fn run(&self, run_index: usize) -> Result<RunSummary, DriverError> {
        let start = Instant::now();
        let save = self.config.save.get();
        info!("run {}", run_index + 1);

        let (mut ctx, mut run) = match self.store.load::<RtDiagnostics>(run_index, 0)? {
            Some(checkpoint) => checkpoint.into_parts(),
            None => {
                let mut ctx = SimContext::for_run(self.config.seed, run_index);
                let run = Run::new(
                    self.config.populations.get(),
                    self.config.population_config(),
                    self.config.genetic_config(),
                    &mut ctx,
                    &self.evaluator,
                );
                self.store.save(run_index, &ctx, &run)?;
                (ctx, run)
            }
        };
        info!("generation 0: {}", report(run.champion()));

        while run.generation() < self.config.generations {
            let next = run.generation() + save;
            match self.store.load::<RtDiagnostics>(run_index, next)? {
                Some(checkpoint) => (ctx, run) = checkpoint.into_parts(),
                None => {
                    run.iterate(save, &mut ctx, &self.evaluator);
                    assert_eq!(run.generation(), next, "run skipped generations");
                    if self.config.migrate > 0 && run.generation() % self.config.migrate == 0 {
                        run.migrate(&mut ctx);
                    }
                    if self.config.max_stagnation > 0 {
                        run.remove_stagnant(self.config.max_stagnation, &mut ctx, &self.evaluator);
                    }
                    self.store.save(run_index, &ctx, &run)?;
                }
            }
            info!("generation {}: {}", run.generation(), report(run.champion()));
            for (i, population) in run.populations().iter().enumerate() {
                debug!(
                    "population {}: fitness {}, stagnant for {}",
                    i,
                    population.fitness_stats(),
                    population.generations_since_improvement()
                );
            }
        }

        info!(
            "run {} finished in {}",
            run_index + 1,
            friendly_time(start.elapsed())
        );
        Ok(RunSummary {
            run_index,
            generation: run.generation(),
            champion: run.champion().clone(),
        })
    }
}

/// One-line report of a genome's evaluation.
fn report(genome: &Genome<RtDiagnostics>) -> String {
    match genome.diagnostics() {
        Some(diagnostics) => diagnostics.to_string(),
        None => "unevaluated".to_string(),
    }
}

/// Formats a duration in days, hours, minutes and
/// seconds, omitting leading units that are zero.
///
/// # Examples
/// ```
/// use rtexp::driver::friendly_time;
/// use std::time::Duration;
///
/// assert_eq!(friendly_time(Duration::from_secs(42)), "42 second(s)");
/// assert_eq!(
///     friendly_time(Duration::from_secs(90_061)),
///     "1 day(s) 1 hour(s) 1 minute(s) 1 second(s)"
/// );
/// ```
pub fn friendly_time(elapsed: Duration) -> String {
    let mut seconds = elapsed.as_secs();
    let mut parts = Vec::new();
    for (unit, name) in [(86_400, "day"), (3_600, "hour"), (60, "minute")] {
        if seconds > unit {
            parts.push(format!("{} {}(s)", seconds / unit, name));
            seconds %= unit;
        }
    }
    parts.push(format!("{} second(s)", seconds));
    parts.join(" ")
}
