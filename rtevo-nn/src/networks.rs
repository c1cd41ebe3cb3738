//! A Network is the phenotype of a genome: every
//! allele value is either a unit's bias or the
//! weight of a synapse. Networks are fully connected
//! (self-connections included), and units are laid
//! out as inputs, then hidden units, then outputs.
mod connection;
mod neuron;

pub use neuron::{RESET_POTENTIAL, REST_POTENTIAL, THRESHOLD};

use crate::errors::NetworkError;
use crate::Controller;
use connection::Connection;
use neuron::Neuron;

use rtevo::Genome;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::NonZeroUsize;

/// Shape of a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub inputs: NonZeroUsize,
    pub outputs: NonZeroUsize,
    pub hidden: usize,
}

impl Topology {
    /// Total number of units.
    pub fn unit_count(&self) -> usize {
        self.inputs.get() + self.hidden + self.outputs.get()
    }

    /// Number of parameters needed to build a network:
    /// one bias per unit plus one weight per ordered
    /// pair of units.
    ///
    /// # Examples
    /// ```
    /// use rtevo_nn::networks::Topology;
    /// use std::num::NonZeroUsize;
    ///
    /// let topology = Topology {
    ///     inputs: NonZeroUsize::new(5).unwrap(),
    ///     outputs: NonZeroUsize::new(2).unwrap(),
    ///     hidden: 3,
    /// };
    /// assert_eq!(topology.unit_count(), 10);
    /// assert_eq!(topology.parameter_count(), 110);
    /// ```
    pub fn parameter_count(&self) -> usize {
        let n = self.unit_count();
        n + n * n
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inputs / {} hidden / {} outputs",
            self.inputs, self.hidden, self.outputs
        )
    }
}

/// A network of leaky integrate-and-fire units.
///
/// On every step, noise and input currents are added,
/// spikes fired on the previous step are propagated
/// through the weight matrix, and then every unit
/// integrates its current.
#[derive(Clone, Debug)]
pub struct SpikingNetwork {
    topology: Topology,
    neurons: Box<[Neuron]>,
    connections: Box<[Box<[Connection]>]>,
    spikes: Box<[bool]>,
}

impl SpikingNetwork {
    /// Builds a network from `parameters`: `n` biases
    /// followed by the `n × n` weight matrix, row `i`
    /// holding the weights of the synapses leaving unit `i`.
    ///
    /// # Errors
    /// Returns an error if the number of parameters does
    /// not match the topology, or if `tau` is not a
    /// positive finite number.
    ///
    /// # Examples
    /// ```
    /// use rtevo_nn::{errors::NetworkError, networks::{SpikingNetwork, Topology}};
    /// use std::num::NonZeroUsize;
    ///
    /// let topology = Topology {
    ///     inputs: NonZeroUsize::new(1).unwrap(),
    ///     outputs: NonZeroUsize::new(1).unwrap(),
    ///     hidden: 0,
    /// };
    /// assert!(SpikingNetwork::new(topology, &[0.0; 6], 10.0).is_ok());
    /// assert_eq!(
    ///     SpikingNetwork::new(topology, &[0.0; 5], 10.0).unwrap_err(),
    ///     NetworkError::ParameterCount { expected: 6, found: 5 },
    /// );
    /// assert_eq!(
    ///     SpikingNetwork::new(topology, &[0.0; 6], 0.0).unwrap_err(),
    ///     NetworkError::TimeConstant(0.0),
    /// );
    /// ```
    pub fn new(
        topology: Topology,
        parameters: &[f64],
        tau: f64,
    ) -> Result<SpikingNetwork, NetworkError> {
        if parameters.len() != topology.parameter_count() {
            return Err(NetworkError::ParameterCount {
                expected: topology.parameter_count(),
                found: parameters.len(),
            });
        }
        if !(tau.is_finite() && tau > 0.0) {
            return Err(NetworkError::TimeConstant(tau));
        }

        let n = topology.unit_count();
        let (biases, weights) = parameters.split_at(n);
        let neurons = biases.iter().map(|&bias| Neuron::new(bias, tau)).collect();
        let connections = weights
            .chunks_exact(n)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(post, &weight)| Connection::new(post, weight))
                    .collect()
            })
            .collect();

        Ok(SpikingNetwork {
            topology,
            neurons,
            connections,
            spikes: vec![false; n].into(),
        })
    }

    /// Builds a network from a genome's allele values.
    ///
    /// # Errors
    /// See [`SpikingNetwork::new`].
    pub fn from_genome<D>(
        topology: Topology,
        genome: &Genome<D>,
        tau: f64,
    ) -> Result<SpikingNetwork, NetworkError> {
        let parameters: Vec<f64> = genome.values().collect();
        SpikingNetwork::new(topology, &parameters, tau)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Returns every unit's membrane potential.
    pub fn potentials(&self) -> Vec<f64> {
        self.neurons.iter().map(Neuron::potential).collect()
    }

    /// Returns which units fired on the last step.
    pub fn spikes(&self) -> &[bool] {
        &self.spikes
    }

    /// Propagates each spike of the previous step
    /// through all of the unit's outgoing synapses.
    fn propagate_spikes(&mut self) {
        for (&fired, outgoing) in self.spikes.iter().zip(self.connections.iter()) {
            if fired {
                for connection in outgoing.iter() {
                    self.neurons[connection.output].add_current(connection.weight);
                }
            }
        }
    }
}

impl Controller for SpikingNetwork {
    /// Returns all units to the reset potential,
    /// clearing currents and spikes.
    ///
    /// # Examples
    /// ```
    /// use rtevo_nn::{networks::{SpikingNetwork, Topology, RESET_POTENTIAL}, Controller};
    /// use std::num::NonZeroUsize;
    ///
    /// let topology = Topology {
    ///     inputs: NonZeroUsize::new(1).unwrap(),
    ///     outputs: NonZeroUsize::new(1).unwrap(),
    ///     hidden: 0,
    /// };
    /// let mut network = SpikingNetwork::new(topology, &[5.0, 5.0, 0.0, 0.0, 0.0, 0.0], 10.0).unwrap();
    /// network.advance(&[0.0], None);
    /// assert_ne!(network.potentials(), vec![RESET_POTENTIAL; 2]);
    ///
    /// network.reset();
    /// assert_eq!(network.potentials(), vec![RESET_POTENTIAL; 2]);
    /// ```
    fn reset(&mut self) {
        for neuron in self.neurons.iter_mut() {
            neuron.reset();
        }
        self.spikes.fill(false);
    }

    fn input_count(&self) -> usize {
        self.topology.inputs.get()
    }

    fn output_count(&self) -> usize {
        self.topology.outputs.get()
    }

    fn unit_count(&self) -> usize {
        self.neurons.len()
    }

    fn advance(&mut self, input: &[f64], noise: Option<&[f64]>) -> &[bool] {
        assert_eq!(
            input.len(),
            self.input_count(),
            "network input has the wrong length"
        );
        if let Some(noise) = noise {
            assert_eq!(
                noise.len(),
                self.neurons.len(),
                "network noise has the wrong length"
            );
            for (neuron, &current) in self.neurons.iter_mut().zip(noise) {
                neuron.add_current(current);
            }
        }
        for (neuron, &current) in self.neurons.iter_mut().zip(input) {
            neuron.add_current(current);
        }
        self.propagate_spikes();
        for (neuron, spike) in self.neurons.iter_mut().zip(self.spikes.iter_mut()) {
            *spike = neuron.advance();
        }
        let first_output = self.neurons.len() - self.output_count();
        &self.spikes[first_output..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtevo::{Allele, Genome};

    fn topology(inputs: usize, outputs: usize, hidden: usize) -> Topology {
        Topology {
            inputs: NonZeroUsize::new(inputs).unwrap(),
            outputs: NonZeroUsize::new(outputs).unwrap(),
            hidden,
        }
    }

    #[test]
    fn bias_alone_drives_firing() {
        let mut network =
            SpikingNetwork::new(topology(1, 1, 0), &[0.0, 30.0, 0.0, 0.0, 0.0, 0.0], 10.0)
                .unwrap();
        assert_eq!(network.advance(&[0.0], None), &[true]);
        assert_eq!(network.spikes(), &[false, true]);
        assert_eq!(network.potentials()[1], RESET_POTENTIAL);
    }

    #[test]
    fn spikes_propagate_with_one_step_delay() {
        // input -> hidden -> output chain
        let t = topology(1, 1, 1);
        let mut parameters = vec![0.0; t.parameter_count()];
        let n = t.unit_count();
        parameters[n + 1] = 30.0;
        parameters[n + n + 2] = 30.0;
        let mut network = SpikingNetwork::new(t, &parameters, 10.0).unwrap();

        assert_eq!(network.advance(&[30.0], None), &[false]);
        assert_eq!(network.spikes(), &[true, false, false]);
        assert_eq!(network.advance(&[0.0], None), &[false]);
        assert_eq!(network.spikes(), &[false, true, false]);
        assert_eq!(network.advance(&[0.0], None), &[true]);
    }

    #[test]
    fn noise_is_added_to_every_unit() {
        let t = topology(1, 2, 0);
        let mut network = SpikingNetwork::new(t, &vec![0.0; t.parameter_count()], 10.0).unwrap();
        let outputs = network.advance(&[0.0], Some(&[0.0, 30.0, 10.0])).to_vec();
        assert_eq!(outputs, vec![true, false]);
        assert_eq!(network.potentials(), vec![-65.0, RESET_POTENTIAL, -55.0]);
    }

    #[test]
    #[should_panic(expected = "network noise has the wrong length")]
    fn short_noise_is_rejected() {
        let t = topology(1, 1, 0);
        let mut network = SpikingNetwork::new(t, &vec![0.0; t.parameter_count()], 10.0).unwrap();
        network.advance(&[0.0], Some(&[1.0]));
    }

    #[test]
    fn built_from_genome_values() {
        let t = topology(1, 1, 0);
        let genome = Genome::<()>::new(
            [0.0, 30.0, 0.0, 0.0, 0.0, 0.0]
                .iter()
                .map(|&v| Allele::with_value(-50.0, 50.0, 1.0, v).unwrap())
                .collect(),
        );
        let mut network = SpikingNetwork::from_genome(t, &genome, 10.0).unwrap();
        assert_eq!(network.advance(&[0.0], None), &[true]);
        assert_eq!(
            SpikingNetwork::from_genome(topology(2, 1, 0), &genome, 10.0).unwrap_err(),
            NetworkError::ParameterCount {
                expected: 12,
                found: 6
            }
        );
    }

    #[test]
    fn reset_clears_spikes() {
        let t = topology(1, 1, 0);
        let mut network =
            SpikingNetwork::new(t, &[0.0, 30.0, 0.0, 0.0, 0.0, 0.0], 10.0).unwrap();
        network.advance(&[0.0], None);
        network.reset();
        assert_eq!(network.spikes(), &[false, false]);
    }
}
