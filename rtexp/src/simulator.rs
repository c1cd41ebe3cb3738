//! Time-stepped simulation of reaction-time trials
//! against any [`Controller`].
use crate::tasks::{Response, RtDiagnostics, TaskType};
use crate::trials::{Trial, TrialBattery, INPUT_COUNT};

use rtevo::Evaluation;
use rtevo_nn::Controller;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error type indicating unusable simulator parameters.
#[derive(Debug, Error, PartialEq)]
pub enum SimulatorError {
    #[error("noise standard deviation {0} is not a non-negative number")]
    NoiseSigma(f64),
    #[error("cue period range {min}..={max} is empty")]
    CueTimes { min: usize, max: usize },
}

/// Durations of the trial phases, in time steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialTiming {
    /// Steps without any input before the cue.
    pub pre_time: usize,
    /// Shortest cue period before target onset.
    pub min_cue_time: usize,
    /// Longest cue period before target onset.
    pub max_cue_time: usize,
    /// Last step after target onset at which a
    /// response is still recorded.
    pub max_rt: usize,
}

impl Default for TrialTiming {
    fn default() -> TrialTiming {
        TrialTiming {
            pre_time: 50,
            min_cue_time: 100,
            max_cue_time: 200,
            max_rt: 1000,
        }
    }
}

/// What happened during one trial: the first response
/// and the step it happened at, counted from target
/// onset (non-positive steps precede the target).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrialRecord {
    pub trial: Trial,
    pub response: Option<(Response, i64)>,
}

/// Runs trials of one task with fixed stimuli.
#[derive(Clone, Debug)]
pub struct TrialSimulator {
    task: TaskType,
    timing: TrialTiming,
    target_intensity: f64,
    cue_intensity: f64,
    noise: Option<Normal<f64>>,
}

impl TrialSimulator {
    /// Creates a simulator. If `noise_sigma` is given,
    /// every unit receives a fresh zero-mean Gaussian
    /// current of that standard deviation on every step.
    ///
    /// # Errors
    /// Returns an error if `noise_sigma` is negative or not
    /// finite, or if the cue period range is empty.
    pub fn new(
        task: TaskType,
        timing: TrialTiming,
        target_intensity: f64,
        cue_intensity: f64,
        noise_sigma: Option<f64>,
    ) -> Result<TrialSimulator, SimulatorError> {
        if timing.min_cue_time > timing.max_cue_time {
            return Err(SimulatorError::CueTimes {
                min: timing.min_cue_time,
                max: timing.max_cue_time,
            });
        }
        let noise = noise_sigma
            .map(|sigma| {
                if !(sigma.is_finite() && sigma >= 0.0) {
                    return Err(SimulatorError::NoiseSigma(sigma));
                }
                Normal::new(0.0, sigma).map_err(|_| SimulatorError::NoiseSigma(sigma))
            })
            .transpose()?;
        Ok(TrialSimulator {
            task,
            timing,
            target_intensity,
            cue_intensity,
            noise,
        })
    }

    pub fn task(&self) -> TaskType {
        self.task
    }

    pub fn timing(&self) -> TrialTiming {
        self.timing
    }

    /// Runs a single trial: a settling period without
    /// input, a cue period of random length, then target
    /// onset at step 0 and a response window up to the
    /// deadline. Stops at the first response.
    ///
    /// # Panics
    /// Panics if the controller does not have the task's
    /// input and output counts.
    pub fn run_trial<C, R>(&self, controller: &mut C, trial: &Trial, rng: &mut R) -> TrialRecord
    where
        C: Controller + ?Sized,
        R: Rng + ?Sized,
    {
        assert_eq!(
            controller.input_count(),
            INPUT_COUNT,
            "controller input count does not match the trial layout"
        );
        controller.reset();
        let mut input = [0.0; INPUT_COUNT];
        let mut noise = vec![0.0; controller.unit_count()];

        for _ in 0..self.timing.pre_time {
            self.step(controller, &input, &mut noise, rng);
        }

        input[1..INPUT_COUNT - 1].copy_from_slice(&trial.cue_pattern(self.cue_intensity));
        let cue_time = rng.gen_range(self.timing.min_cue_time..=self.timing.max_cue_time);
        let deadline = self.timing.max_rt as i64;
        let mut t = -(cue_time as i64);
        while t <= deadline {
            if t == 0 {
                if let Some(side) = trial.target {
                    input[side.target_input()] = self.target_intensity;
                }
            }
            let outputs = self.step(controller, &input, &mut noise, rng);
            if let Some(response) = self.task.classify(outputs, rng) {
                return TrialRecord {
                    trial: *trial,
                    response: Some((response, t)),
                };
            }
            t += 1;
        }
        TrialRecord {
            trial: *trial,
            response: None,
        }
    }

    /// Runs every trial of `battery`, in order.
    pub fn run_battery<C, R>(
        &self,
        controller: &mut C,
        battery: &TrialBattery,
        rng: &mut R,
    ) -> Vec<TrialRecord>
    where
        C: Controller + ?Sized,
        R: Rng + ?Sized,
    {
        battery
            .trials()
            .iter()
            .map(|trial| self.run_trial(controller, trial, rng))
            .collect()
    }

    /// Runs `battery` and scores the controller.
    pub fn evaluate<C, R>(
        &self,
        controller: &mut C,
        battery: &TrialBattery,
        rng: &mut R,
    ) -> Evaluation<RtDiagnostics>
    where
        C: Controller + ?Sized,
        R: Rng + ?Sized,
    {
        let records = self.run_battery(controller, battery, rng);
        self.task.score(
            records
                .iter()
                .map(|r| (&r.trial, self.task.outcome(&r.trial, r.response))),
        )
    }

    fn step<'c, C, R>(
        &self,
        controller: &'c mut C,
        input: &[f64],
        noise: &mut [f64],
        rng: &mut R,
    ) -> &'c [bool]
    where
        C: Controller + ?Sized,
        R: Rng + ?Sized,
    {
        match &self.noise {
            Some(normal) => {
                for current in noise.iter_mut() {
                    *current = normal.sample(rng);
                }
                controller.advance(input, Some(&*noise))
            }
            None => controller.advance(input, None),
        }
    }
}
