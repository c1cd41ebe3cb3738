//! Experiment configuration, read from a RON file.
use crate::simulator::{SimulatorError, TrialSimulator, TrialTiming};
use crate::tasks::TaskType;
use crate::trials::{TrialBattery, INPUT_COUNT};

use rtevo::errors::ConfigError;
use rtevo::{GeneticConfig, PopulationConfig};
use rtevo_nn::networks::Topology;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// An error type indicating an unusable
/// experiment configuration.
#[derive(Debug, Error)]
pub enum ExperimentConfigError {
    #[error("cannot read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] ron::Error),
    #[error("invalid `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error(transparent)]
    Engine(#[from] ConfigError),
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
}

/// All parameters of an experiment. Immutable
/// for the lifetime of its runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Simple or choice reaction-time task.
    pub task: TaskType,
    /// Input current of a target.
    pub ext_stimuli: f64,
    /// Input current of a cue; defaults to `ext_stimuli`.
    #[serde(default)]
    pub cue_stimuli: Option<f64>,
    /// Membrane time constant of every unit.
    #[serde(default = "default_tau")]
    pub tau: f64,
    pub min_gene: f64,
    pub max_gene: f64,
    pub mutation_step: f64,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Generations per run; a multiple of `save`.
    pub generations: usize,
    /// Generations between checkpoints.
    pub save: NonZeroUsize,
    pub runs: usize,
    pub populations: NonZeroUsize,
    pub individuals: NonZeroUsize,
    /// Generations between migrations; 0 disables migration.
    #[serde(default)]
    pub migrate: usize,
    /// Generations without improvement after which a
    /// population is reset; 0 disables resets.
    #[serde(default)]
    pub max_stagnation: usize,
    #[serde(default = "default_elitism")]
    pub elitism: bool,
    #[serde(default)]
    pub random_immigrants: usize,
    #[serde(default)]
    pub noise: bool,
    #[serde(default)]
    pub noise_sigma: f64,
    pub hidden_neurons: usize,
    pub valid: usize,
    pub neutral: usize,
    pub invalid: usize,
    /// Catch trials per target trial, for each cue validity.
    #[serde(default)]
    pub catch: f64,
    pub reps: usize,
    #[serde(default = "default_pre_time")]
    pub pre_time: usize,
    #[serde(default = "default_min_cue_time")]
    pub min_cue_time: usize,
    #[serde(default = "default_max_cue_time")]
    pub max_cue_time: usize,
    #[serde(default = "default_max_rt")]
    pub max_rt: usize,
    /// Checkpoint directory.
    pub directory: PathBuf,
    #[serde(default)]
    pub seed: u64,
}

fn default_tau() -> f64 {
    10.0
}

fn default_mutation_rate() -> f64 {
    0.05
}

fn default_elitism() -> bool {
    true
}

fn default_pre_time() -> usize {
    TrialTiming::default().pre_time
}

fn default_min_cue_time() -> usize {
    TrialTiming::default().min_cue_time
}

fn default_max_cue_time() -> usize {
    TrialTiming::default().max_cue_time
}

fn default_max_rt() -> usize {
    TrialTiming::default().max_rt
}

impl ExperimentConfig {
    /// Reads and validates a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read,
    /// is not a valid configuration, or fails
    /// [`validate`](ExperimentConfig::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<ExperimentConfig, ExperimentConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ExperimentConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ExperimentConfig::from_ron(&text)
    }

    /// Parses and validates a configuration.
    ///
    /// # Examples
    /// ```
    /// use rtexp::config::ExperimentConfig;
    /// use rtexp::tasks::TaskType;
    ///
    /// let config = ExperimentConfig::from_ron(r#"(
    ///     task: Choice,
    ///     ext_stimuli: 20.0,
    ///     min_gene: -30.0,
    ///     max_gene: 30.0,
    ///     mutation_step: 3.0,
    ///     generations: 100,
    ///     save: 20,
    ///     runs: 2,
    ///     populations: 4,
    ///     individuals: 50,
    ///     hidden_neurons: 2,
    ///     valid: 3,
    ///     neutral: 2,
    ///     invalid: 1,
    ///     reps: 1,
    ///     directory: "out",
    /// )"#).unwrap();
    ///
    /// assert_eq!(config.task, TaskType::Choice);
    /// assert_eq!(config.cue_stimuli(), 20.0);
    /// assert_eq!(config.topology().parameter_count(), 9 + 81);
    /// ```
    ///
    /// # Errors
    /// See [`load`](ExperimentConfig::load).
    pub fn from_ron(text: &str) -> Result<ExperimentConfig, ExperimentConfigError> {
        let config: ExperimentConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ExperimentConfigError> {
        let invalid = |key, reason: String| Err(ExperimentConfigError::Invalid { key, reason });

        if self.generations % self.save.get() != 0 {
            return invalid(
                "generations",
                format!(
                    "{} is not a multiple of the save interval {}",
                    self.generations, self.save
                ),
            );
        }
        if !self.ext_stimuli.is_finite() {
            return invalid("ext_stimuli", format!("{} is not finite", self.ext_stimuli));
        }
        if !self.cue_stimuli().is_finite() {
            return invalid("cue_stimuli", format!("{} is not finite", self.cue_stimuli()));
        }
        if !(self.tau.is_finite() && self.tau > 0.0) {
            return invalid("tau", format!("{} is not a positive number", self.tau));
        }
        if !(self.noise_sigma.is_finite() && self.noise_sigma >= 0.0) {
            return invalid(
                "noise_sigma",
                format!("{} is not a non-negative number", self.noise_sigma),
            );
        }
        if !(self.catch.is_finite() && self.catch >= 0.0) {
            return invalid("catch", format!("{} is not a non-negative number", self.catch));
        }
        if self.min_cue_time > self.max_cue_time {
            return invalid(
                "min_cue_time",
                format!(
                    "{} exceeds max_cue_time {}",
                    self.min_cue_time, self.max_cue_time
                ),
            );
        }
        if self.battery().is_empty() {
            return invalid("reps", "the trial battery is empty".to_string());
        }
        self.genetic_config().validate()?;
        self.population_config().validate()?;
        Ok(())
    }

    pub fn cue_stimuli(&self) -> f64 {
        self.cue_stimuli.unwrap_or(self.ext_stimuli)
    }

    /// Network shape: five inputs, the configured hidden
    /// units and one output per response side.
    pub fn topology(&self) -> Topology {
        Topology {
            inputs: NonZeroUsize::new(INPUT_COUNT).expect("input layout is not empty"),
            outputs: NonZeroUsize::new(self.task.output_count())
                .expect("tasks have at least one output"),
            hidden: self.hidden_neurons,
        }
    }

    /// Genomes hold one allele per network parameter.
    pub fn genetic_config(&self) -> GeneticConfig {
        GeneticConfig {
            allele_count: NonZeroUsize::new(self.topology().parameter_count())
                .expect("networks have at least one parameter"),
            min_value: self.min_gene,
            max_value: self.max_gene,
            mutation_step: self.mutation_step,
            mutation_rate: self.mutation_rate,
        }
    }

    pub fn population_config(&self) -> PopulationConfig {
        PopulationConfig {
            size: self.individuals,
            elitism: self.elitism,
            random_immigrants: self.random_immigrants,
        }
    }

    pub fn battery(&self) -> TrialBattery {
        TrialBattery::new(self.valid, self.neutral, self.invalid, self.catch, self.reps)
    }

    pub fn timing(&self) -> TrialTiming {
        TrialTiming {
            pre_time: self.pre_time,
            min_cue_time: self.min_cue_time,
            max_cue_time: self.max_cue_time,
            max_rt: self.max_rt,
        }
    }

    /// Standard deviation of the per-step noise
    /// currents, if noise is enabled.
    pub fn noise_sigma(&self) -> Option<f64> {
        self.noise.then_some(self.noise_sigma)
    }

    /// Builds the trial simulator described by the configuration.
    ///
    /// # Errors
    /// Returns an error if the noise intensity or
    /// the cue period range is unusable.
    pub fn simulator(&self) -> Result<TrialSimulator, ExperimentConfigError> {
        Ok(TrialSimulator::new(
            self.task,
            self.timing(),
            self.ext_stimuli,
            self.cue_stimuli(),
            self.noise_sigma(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"(
        task: Simple,
        ext_stimuli: 15.0,
        cue_stimuli: Some(5.0),
        min_gene: -20.0,
        max_gene: 20.0,
        mutation_step: 2.0,
        generations: 60,
        save: 20,
        runs: 1,
        populations: 3,
        individuals: 10,
        migrate: 20,
        noise: true,
        noise_sigma: 1.5,
        hidden_neurons: 0,
        valid: 2,
        neutral: 1,
        invalid: 1,
        catch: 0.25,
        reps: 1,
        directory: "checkpoints",
        seed: 9,
    )"#;

    #[test]
    fn defaults_are_filled_in() {
        let config = ExperimentConfig::from_ron(BASE).unwrap();
        assert_eq!(config.tau, 10.0);
        assert_eq!(config.mutation_rate, 0.05);
        assert!(config.elitism);
        assert_eq!(config.max_stagnation, 0);
        assert_eq!(config.timing(), TrialTiming::default());
        assert_eq!(config.cue_stimuli(), 5.0);
        assert_eq!(config.noise_sigma(), Some(1.5));
        assert_eq!(config.genetic_config().allele_count.get(), 6 + 36);
        assert_eq!(config.population_config().size.get(), 10);
        assert_eq!(config.battery().len(), 8 + 1);
    }

    #[test]
    fn generations_must_be_a_multiple_of_save() {
        let text = BASE.replace("generations: 60", "generations: 50");
        assert!(matches!(
            ExperimentConfig::from_ron(&text),
            Err(ExperimentConfigError::Invalid { key: "generations", .. })
        ));
    }

    #[test]
    fn zero_save_interval_is_rejected() {
        let text = BASE.replace("save: 20", "save: 0");
        assert!(matches!(
            ExperimentConfig::from_ron(&text),
            Err(ExperimentConfigError::Parse(_))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let text = BASE.replace("seed: 9,", "seed: 9, cost_factor: 1.0,");
        assert!(matches!(
            ExperimentConfig::from_ron(&text),
            Err(ExperimentConfigError::Parse(_))
        ));
    }

    #[test]
    fn inverted_gene_bounds_are_rejected() {
        let text = BASE.replace("min_gene: -20.0", "min_gene: 25.0");
        assert!(matches!(
            ExperimentConfig::from_ron(&text),
            Err(ExperimentConfigError::Engine(ConfigError::AlleleBounds(..)))
        ));
    }

    #[test]
    fn inverted_cue_range_is_rejected() {
        let text = BASE.replace("seed: 9,", "seed: 9, min_cue_time: 300,");
        assert!(matches!(
            ExperimentConfig::from_ron(&text),
            Err(ExperimentConfigError::Invalid { key: "min_cue_time", .. })
        ));
    }

    #[test]
    fn empty_battery_is_rejected() {
        let text = BASE.replace("reps: 1", "reps: 0");
        assert!(matches!(
            ExperimentConfig::from_ron(&text),
            Err(ExperimentConfigError::Invalid { key: "reps", .. })
        ));
    }

    #[test]
    fn reserved_slots_must_fit() {
        let text = BASE.replace("seed: 9,", "seed: 9, random_immigrants: 10,");
        assert!(matches!(
            ExperimentConfig::from_ron(&text),
            Err(ExperimentConfigError::Engine(ConfigError::NoRoomForOffspring {
                size: 10,
                reserved: 11
            }))
        ));
    }

    #[test]
    fn negative_noise_is_rejected() {
        let text = BASE.replace("noise_sigma: 1.5", "noise_sigma: -1.5");
        assert!(ExperimentConfig::from_ron(&text).is_err());
    }

    #[test]
    fn shipped_configs_are_valid() {
        let simple = ExperimentConfig::from_ron(include_str!("../configs/simple.ron")).unwrap();
        assert_eq!(simple.task, TaskType::Simple);
        let choice = ExperimentConfig::from_ron(include_str!("../configs/choice.ron")).unwrap();
        assert_eq!(choice.topology().outputs.get(), 2);
        assert_eq!(choice.tau, 10.0);
    }
}
