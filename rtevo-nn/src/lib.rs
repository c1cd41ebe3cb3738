//! # rtevo-nn
//! Leaky integrate-and-fire network controllers whose biases and
//! synaptic weights are read from an [`rtevo`] genome.
//!
//! Provides the [`Controller`] interface used by time-stepped tasks
//! and one implementation of it, [`SpikingNetwork`]: a fully
//! connected network of spiking units advanced one time step at a
//! time, with new inputs (and optionally noise currents) set for
//! each step.
//!
//! [`SpikingNetwork`]: crate::networks::SpikingNetwork
//!
//! # Example usage
//! ```
//! use rtevo_nn::{networks::{SpikingNetwork, Topology}, Controller};
//! use std::num::NonZeroUsize;
//!
//! // One input unit wired to one output unit.
//! let topology = Topology {
//!     inputs: NonZeroUsize::new(1).unwrap(),
//!     outputs: NonZeroUsize::new(1).unwrap(),
//!     hidden: 0,
//! };
//! // Biases, then the row-major (pre, post) weight matrix.
//! let parameters = [0.0, 0.0, 0.0, 30.0, 0.0, 0.0];
//! let mut network = SpikingNetwork::new(topology, &parameters, 10.0).unwrap();
//!
//! // A strong input makes the input unit fire,
//! // and its spike reaches the output one step later.
//! assert_eq!(network.advance(&[30.0], None), &[false]);
//! assert_eq!(network.advance(&[0.0], None), &[true]);
//! ```

pub mod errors;
pub mod networks;

/// An interface for controllers advanced in discrete
/// time steps, mapping input currents to binary outputs.
pub trait Controller {
    /// Returns the controller to its initial state.
    fn reset(&mut self);

    /// Number of input values expected by [`advance`](Controller::advance).
    fn input_count(&self) -> usize;

    /// Number of output flags returned by [`advance`](Controller::advance).
    fn output_count(&self) -> usize;

    /// Total number of units, which is also the number
    /// of noise values expected by [`advance`](Controller::advance).
    fn unit_count(&self) -> usize;

    /// Advances the controller by one time step and
    /// returns which outputs fired.
    ///
    /// # Panics
    /// Implementations panic if `input` does not hold
    /// `input_count()` values or `noise` does not hold
    /// `unit_count()` values.
    fn advance(&mut self, input: &[f64], noise: Option<&[f64]>) -> &[bool];
}
