/// Resting membrane potential.
pub const REST_POTENTIAL: f64 = -65.0;
/// Potential a unit returns to after firing.
pub const RESET_POTENTIAL: f64 = -65.0;
/// Potential at or above which a unit fires.
pub const THRESHOLD: f64 = -40.0;

/// A leaky integrate-and-fire unit.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct Neuron {
    bias: f64,
    decay: f64,
    potential: f64,
    current: f64,
}

impl Neuron {
    /// Creates a unit at the reset potential, with
    /// `decay = exp(-1 / tau)` applied to its
    /// distance from rest at every step.
    pub fn new(bias: f64, tau: f64) -> Neuron {
        Neuron {
            bias,
            decay: (-1.0 / tau).exp(),
            potential: RESET_POTENTIAL,
            current: bias,
        }
    }

    pub fn add_current(&mut self, current: f64) {
        self.current += current;
    }

    /// Integrates the accumulated current and returns
    /// whether the unit fired. The current then goes
    /// back to the unit's bias.
    pub fn advance(&mut self) -> bool {
        self.potential =
            REST_POTENTIAL + (self.potential - REST_POTENTIAL) * self.decay + self.current;
        self.current = self.bias;
        if self.potential >= THRESHOLD {
            self.potential = RESET_POTENTIAL;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.potential = RESET_POTENTIAL;
        self.current = self.bias;
    }

    pub fn potential(&self) -> f64 {
        self.potential
    }
}
