//! Trials of the cued reaction-time experiment and
//! the fixed battery each controller is scored on.
use serde::{Deserialize, Serialize};

use std::fmt;

/// Number of input units: left target, three cue
/// units (left, neutral, right), right target.
pub const INPUT_COUNT: usize = 5;

/// Side of the visual field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Index of the input unit receiving a target on this side.
    pub fn target_input(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => INPUT_COUNT - 1,
        }
    }
}

/// How well the cue predicts the target's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CueValidity {
    Valid,
    Neutral,
    Invalid,
}

/// A single trial: where the target appears (nowhere
/// for catch trials) and which cue precedes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub target: Option<Side>,
    pub cue: CueValidity,
}

impl Trial {
    pub fn new(target: Side, cue: CueValidity) -> Trial {
        Trial {
            target: Some(target),
            cue,
        }
    }

    pub fn catch(cue: CueValidity) -> Trial {
        Trial { target: None, cue }
    }

    pub fn is_catch(&self) -> bool {
        self.target.is_none()
    }

    /// Returns the currents of the three cue units.
    ///
    /// A neutral cue drives the middle unit. Otherwise
    /// the left unit is driven by valid left cues and
    /// invalid right cues, and the right unit by every
    /// other trial, catch trials included.
    ///
    /// # Examples
    /// ```
    /// use rtexp::trials::{CueValidity, Side, Trial};
    ///
    /// assert_eq!(Trial::new(Side::Left, CueValidity::Valid).cue_pattern(2.0), [2.0, 0.0, 0.0]);
    /// assert_eq!(Trial::new(Side::Right, CueValidity::Invalid).cue_pattern(2.0), [2.0, 0.0, 0.0]);
    /// assert_eq!(Trial::new(Side::Right, CueValidity::Valid).cue_pattern(2.0), [0.0, 0.0, 2.0]);
    /// assert_eq!(Trial::catch(CueValidity::Neutral).cue_pattern(2.0), [0.0, 2.0, 0.0]);
    /// assert_eq!(Trial::catch(CueValidity::Valid).cue_pattern(2.0), [0.0, 0.0, 2.0]);
    /// ```
    pub fn cue_pattern(&self, intensity: f64) -> [f64; 3] {
        match (self.target, self.cue) {
            (_, CueValidity::Neutral) => [0.0, intensity, 0.0],
            (Some(Side::Left), CueValidity::Valid) | (Some(Side::Right), CueValidity::Invalid) => {
                [intensity, 0.0, 0.0]
            }
            _ => [0.0, 0.0, intensity],
        }
    }
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Some(Side::Left) => 'L',
            Some(Side::Right) => 'R',
            None => 'C',
        };
        let cue = match self.cue {
            CueValidity::Valid => 'V',
            CueValidity::Neutral => 'N',
            CueValidity::Invalid => 'I',
        };
        write!(f, "{}{}", target, cue)
    }
}

/// The ordered list of trials run for every evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialBattery {
    trials: Vec<Trial>,
}

impl TrialBattery {
    /// Builds a battery of, in order: `valid · reps` pairs of
    /// valid (left, right) trials, `invalid · reps` pairs of
    /// invalid trials, `neutral · reps` pairs of neutral
    /// trials, then catch trials for each validity in
    /// proportion `catch` to that validity's target trials
    /// (rounded half to even).
    ///
    /// # Examples
    /// ```
    /// use rtexp::trials::TrialBattery;
    ///
    /// let battery = TrialBattery::new(2, 1, 1, 0.25, 1);
    /// assert_eq!(battery.non_catch_count(), 8);
    /// // round(0.25 * 2 * 2) = 1, round(0.25 * 1 * 2) = round(0.5) = 0
    /// assert_eq!(battery.catch_count(), 1);
    /// ```
    pub fn new(valid: usize, neutral: usize, invalid: usize, catch: f64, reps: usize) -> TrialBattery {
        let mut trials = Vec::new();
        for (validity, count) in [
            (CueValidity::Valid, valid),
            (CueValidity::Invalid, invalid),
            (CueValidity::Neutral, neutral),
        ] {
            for _ in 0..count * reps {
                trials.push(Trial::new(Side::Left, validity));
                trials.push(Trial::new(Side::Right, validity));
            }
        }
        for (validity, count) in [
            (CueValidity::Valid, valid),
            (CueValidity::Invalid, invalid),
            (CueValidity::Neutral, neutral),
        ] {
            let catches = (catch * count as f64 * 2.0 * reps as f64).round_ties_even() as usize;
            trials.extend(std::iter::repeat(Trial::catch(validity)).take(catches));
        }
        TrialBattery { trials }
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn catch_count(&self) -> usize {
        self.trials.iter().filter(|t| t.is_catch()).count()
    }

    pub fn non_catch_count(&self) -> usize {
        self.len() - self.catch_count()
    }
}
