use crate::config::{ExperimentConfig, ExperimentConfigError};
use crate::simulator::TrialSimulator;
use crate::tasks::RtDiagnostics;
use crate::trials::TrialBattery;

use rtevo::{Evaluation, Evaluator, Genome};
use rtevo_nn::networks::{SpikingNetwork, Topology};

use rand_chacha::ChaCha8Rng;

/// Scores genomes by building a spiking network from
/// their allele values and running the trial battery.
#[derive(Clone, Debug)]
pub struct RtEvaluator {
    topology: Topology,
    tau: f64,
    simulator: TrialSimulator,
    battery: TrialBattery,
}

impl RtEvaluator {
    pub fn new(
        topology: Topology,
        tau: f64,
        simulator: TrialSimulator,
        battery: TrialBattery,
    ) -> RtEvaluator {
        RtEvaluator {
            topology,
            tau,
            simulator,
            battery,
        }
    }

    /// Builds the evaluator described by an experiment configuration.
    ///
    /// # Errors
    /// Returns an error if the simulator cannot be built.
    pub fn from_config(config: &ExperimentConfig) -> Result<RtEvaluator, ExperimentConfigError> {
        Ok(RtEvaluator::new(
            config.topology(),
            config.tau,
            config.simulator()?,
            config.battery(),
        ))
    }

    pub fn battery(&self) -> &TrialBattery {
        &self.battery
    }
}

impl Evaluator for RtEvaluator {
    type Diagnostics = RtDiagnostics;

    /// # Panics
    /// Panics if the genome does not encode a network
    /// of the evaluator's topology.
    fn evaluate(
        &self,
        genome: &Genome<RtDiagnostics>,
        rng: &mut ChaCha8Rng,
    ) -> Evaluation<RtDiagnostics> {
        let mut network = SpikingNetwork::from_genome(self.topology, genome, self.tau)
            .unwrap_or_else(|e| panic!("genome does not encode a network: {}", e));
        self.simulator.evaluate(&mut network, &self.battery, rng)
    }
}
