use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An error type indicating an allele whose
/// value lies outside of its bounds.
#[derive(Debug, Error, PartialEq)]
#[error("allele value {value} outside of bounds [{min}, {max}]")]
pub struct AlleleBoundsError {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

/// An error type indicating an inconsistent
/// genetic or population configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The allele bounds are inverted or not finite.
    #[error("invalid allele bounds [{0}, {1}]")]
    AlleleBounds(f64, f64),
    /// The mutation step is negative or not finite.
    #[error("invalid mutation step {0}")]
    MutationStep(f64),
    /// A probability lies outside of [0, 1].
    #[error("probability `{name}` = {value} is not in [0, 1]")]
    Probability { name: &'static str, value: f64 },
    /// Elite and immigrant slots exceed the population size.
    #[error("population of {size} cannot hold {reserved} elite/immigrant slots")]
    NoRoomForOffspring { size: usize, reserved: usize },
}

/// An error type indicating a failure to
/// persist or restore a checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The checkpoint could not be read or written.
    #[error("checkpoint I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The checkpoint exists but its content is unreadable.
    #[error("corrupt checkpoint {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The checkpoint could not be encoded.
    #[error("could not encode checkpoint for run {run_index}, generation {generation}: {source}")]
    Encode {
        run_index: usize,
        generation: usize,
        #[source]
        source: serde_json::Error,
    },
    /// The checkpoint file holds a different (run, generation) key.
    #[error("checkpoint {path} holds run {found:?}, expected {expected:?}")]
    KeyMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },
}
