use thiserror::Error;

/// An error type indicating a network that
/// cannot be built from the given parameters.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    /// The parameter count does not match the topology.
    #[error("expected {expected} network parameters, got {found}")]
    ParameterCount { expected: usize, found: usize },
    /// The membrane time constant is not a positive number.
    #[error("invalid membrane time constant {0}")]
    TimeConstant(f64),
}
