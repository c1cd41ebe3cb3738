//! Response tasks: how controller outputs are read as
//! responses, and how a battery's outcomes reduce to a
//! fitness value and diagnostics.
use crate::trials::{CueValidity, Side, Trial};

use rtevo::stats::median;
use rtevo::Evaluation;

use ahash::RandomState;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;
use std::fmt;

/// Fitness awarded for withholding a response on a catch trial.
pub const WITHHOLD_REWARD: f64 = 1000.0;

/// Fitness awarded for a correct response after `rt` steps.
///
/// # Examples
/// ```
/// use rtexp::tasks::response_reward;
///
/// assert_eq!(response_reward(0), 1000.0);
/// assert!((response_reward(5) - 951.229).abs() < 1e-3);
/// ```
pub fn response_reward(rt: u32) -> f64 {
    1000.0 * (-0.01 * f64::from(rt)).exp()
}

/// The kind of reaction-time task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    /// A single output; any response to a target is correct.
    Simple,
    /// One output per side; the response must match the target's side.
    Choice,
}

/// A response read from a controller's outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// The single output of a simple task fired.
    Press,
    /// Exactly one output of a choice task fired.
    Choice(Side),
    /// Both outputs of a choice task fired at once.
    /// The reported side is drawn at random.
    Both(Side),
}

/// How a single trial ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Correct response `rt` steps after target onset.
    Correct { rt: u32 },
    /// Response on the wrong side, or on both sides.
    Wrong,
    /// Response before target onset.
    Anticipated,
    /// No response to a target before the deadline.
    Miss,
    /// No response on a catch trial.
    Withheld,
    /// Response on a catch trial.
    FalseAlarm,
}

impl TaskType {
    /// Number of output units the task reads.
    pub fn output_count(self) -> usize {
        match self {
            TaskType::Simple => 1,
            TaskType::Choice => 2,
        }
    }

    /// Reads one step's outputs, returning `None`
    /// if the controller did not respond.
    ///
    /// # Panics
    /// Panics if `outputs` does not hold
    /// [`output_count`](TaskType::output_count) values.
    pub fn classify<R: Rng + ?Sized>(self, outputs: &[bool], rng: &mut R) -> Option<Response> {
        assert_eq!(
            outputs.len(),
            self.output_count(),
            "controller output count does not match the task"
        );
        match (self, outputs) {
            (TaskType::Simple, &[fired]) => fired.then_some(Response::Press),
            (TaskType::Choice, &[true, true]) => Some(Response::Both(if rng.gen::<bool>() {
                Side::Left
            } else {
                Side::Right
            })),
            (TaskType::Choice, &[true, false]) => Some(Response::Choice(Side::Left)),
            (TaskType::Choice, &[false, true]) => Some(Response::Choice(Side::Right)),
            _ => None,
        }
    }

    /// Returns the outcome of `trial`, given the response
    /// (and the time step it happened at, relative to
    /// target onset) if there was one.
    ///
    /// # Examples
    /// ```
    /// use rtexp::tasks::{Outcome, Response, TaskType};
    /// use rtexp::trials::{CueValidity, Side, Trial};
    ///
    /// let trial = Trial::new(Side::Left, CueValidity::Valid);
    /// let choice = TaskType::Choice;
    /// assert_eq!(choice.outcome(&trial, Some((Response::Choice(Side::Left), 12))), Outcome::Correct { rt: 12 });
    /// assert_eq!(choice.outcome(&trial, Some((Response::Choice(Side::Right), 12))), Outcome::Wrong);
    /// assert_eq!(choice.outcome(&trial, Some((Response::Both(Side::Left), 12))), Outcome::Wrong);
    /// assert_eq!(choice.outcome(&trial, Some((Response::Choice(Side::Left), 0))), Outcome::Anticipated);
    /// assert_eq!(choice.outcome(&trial, None), Outcome::Miss);
    ///
    /// let catch = Trial::catch(CueValidity::Neutral);
    /// assert_eq!(TaskType::Simple.outcome(&catch, None), Outcome::Withheld);
    /// assert_eq!(TaskType::Simple.outcome(&catch, Some((Response::Press, 40))), Outcome::FalseAlarm);
    /// ```
    pub fn outcome(self, trial: &Trial, response: Option<(Response, i64)>) -> Outcome {
        let (response, time) = match response {
            None if trial.is_catch() => return Outcome::Withheld,
            None => return Outcome::Miss,
            Some(_) if trial.is_catch() => return Outcome::FalseAlarm,
            Some((_, time)) if time <= 0 => return Outcome::Anticipated,
            Some(timed) => timed,
        };
        let rt = u32::try_from(time).unwrap_or(u32::MAX);
        let correct = match (self, response) {
            (TaskType::Simple, _) => true,
            (TaskType::Choice, Response::Choice(side)) => trial.target == Some(side),
            (TaskType::Choice, _) => false,
        };
        if correct {
            Outcome::Correct { rt }
        } else {
            Outcome::Wrong
        }
    }

    /// Reduces the outcomes of a battery into a fitness
    /// value and diagnostics.
    ///
    /// # Panics
    /// Panics if the outcome counts are inconsistent,
    /// which indicates a bug in outcome classification.
    pub fn score<'a>(
        self,
        outcomes: impl IntoIterator<Item = (&'a Trial, Outcome)>,
    ) -> Evaluation<RtDiagnostics> {
        let mut fitness = 0.0;
        let mut counts = OutcomeCounts {
            wrong: match self {
                TaskType::Simple => None,
                TaskType::Choice => Some(0),
            },
            ..OutcomeCounts::default()
        };
        let mut rts: HashMap<CueValidity, Vec<f64>, RandomState> = HashMap::default();
        let mut non_catch = 0;

        for (trial, outcome) in outcomes {
            if !trial.is_catch() {
                non_catch += 1;
            }
            match outcome {
                Outcome::Correct { rt } => {
                    counts.responses += 1;
                    counts.correct += 1;
                    fitness += response_reward(rt);
                    rts.entry(trial.cue).or_default().push(f64::from(rt));
                }
                Outcome::Wrong => {
                    counts.responses += 1;
                    *counts
                        .wrong
                        .as_mut()
                        .unwrap_or_else(|| panic!("wrong response in a simple task")) += 1;
                }
                Outcome::Anticipated => {
                    counts.responses += 1;
                    counts.anticipated += 1;
                }
                Outcome::Miss => counts.misses += 1,
                Outcome::Withheld => {
                    counts.catches += 1;
                    fitness += WITHHOLD_REWARD;
                }
                Outcome::FalseAlarm => counts.false_alarms += 1,
            }
        }

        assert_eq!(
            counts.responses + counts.misses,
            non_catch,
            "responses and misses do not add up to the target trials"
        );
        assert_eq!(
            counts.responses,
            counts.correct + counts.wrong.unwrap_or(0) + counts.anticipated,
            "responses are not all correct, wrong or anticipated"
        );

        let mut median_rt = |cue: CueValidity| rts.get_mut(&cue).and_then(|v| median(v));
        let diagnostics = RtDiagnostics {
            fitness,
            median_rt_valid: median_rt(CueValidity::Valid),
            median_rt_neutral: median_rt(CueValidity::Neutral),
            median_rt_invalid: median_rt(CueValidity::Invalid),
            counts,
        };
        Evaluation::new(fitness, diagnostics)
    }
}

/// Trial outcome counts of one evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    /// Responses to target trials (correct, wrong or anticipated).
    pub responses: usize,
    pub correct: usize,
    pub misses: usize,
    pub anticipated: usize,
    /// Wrong-side or dual responses; only tracked in choice tasks.
    pub wrong: Option<usize>,
    /// Catch trials without a response.
    pub catches: usize,
    pub false_alarms: usize,
}

impl fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:3}\t{:3}\t{:3}", self.responses, self.misses, self.anticipated)?;
        if let Some(wrong) = self.wrong {
            write!(f, "\t{:3}", wrong)?;
        }
        write!(f, "\t{:3}\t{:3}", self.catches, self.false_alarms)
    }
}

/// Diagnostics attached to every evaluated genome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RtDiagnostics {
    pub fitness: f64,
    /// Median reaction time of correct responses after
    /// valid cues, if there was any.
    pub median_rt_valid: Option<f64>,
    pub median_rt_neutral: Option<f64>,
    pub median_rt_invalid: Option<f64>,
    pub counts: OutcomeCounts,
}

impl fmt::Display for RtDiagnostics {
    /// Formats a one-line, tab-separated report: fitness,
    /// median RTs (valid, neutral, invalid) and counts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:10}", self.fitness.trunc() as i64)?;
        for rt in [
            self.median_rt_valid,
            self.median_rt_neutral,
            self.median_rt_invalid,
        ] {
            match rt {
                Some(rt) => write!(f, "\t{:7.2}", rt)?,
                None => write!(f, "\t-------")?,
            }
        }
        write!(f, "\t{}", self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trials::TrialBattery;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn simple_classification() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(TaskType::Simple.classify(&[false], &mut rng), None);
        assert_eq!(
            TaskType::Simple.classify(&[true], &mut rng),
            Some(Response::Press)
        );
    }

    #[test]
    fn dual_firing_reports_both_sides_over_time() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sides: Vec<Side> = (0..64)
            .map(|_| match TaskType::Choice.classify(&[true, true], &mut rng) {
                Some(Response::Both(side)) => side,
                other => panic!("unexpected classification {:?}", other),
            })
            .collect();
        assert!(sides.contains(&Side::Left));
        assert!(sides.contains(&Side::Right));
    }

    #[test]
    #[should_panic(expected = "controller output count does not match the task")]
    fn output_count_mismatch() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        TaskType::Choice.classify(&[true], &mut rng);
    }

    #[test]
    fn neutral_response_at_five_steps() {
        let trial = Trial::new(Side::Left, CueValidity::Neutral);
        let outcome = TaskType::Simple.outcome(&trial, Some((Response::Press, 5)));
        assert_eq!(outcome, Outcome::Correct { rt: 5 });
        let evaluation = TaskType::Simple.score([(&trial, outcome)]);
        assert!((evaluation.fitness - 951.229_424_500_714).abs() < 1e-9);
        assert_eq!(evaluation.diagnostics.median_rt_neutral, Some(5.0));
        assert_eq!(evaluation.diagnostics.median_rt_valid, None);
        assert_eq!(evaluation.diagnostics.counts.responses, 1);
        assert_eq!(evaluation.diagnostics.counts.wrong, None);
    }

    #[test]
    fn catch_withhold_is_rewarded() {
        let trial = Trial::catch(CueValidity::Valid);
        let evaluation = TaskType::Choice.score([(&trial, TaskType::Choice.outcome(&trial, None))]);
        assert_eq!(evaluation.fitness, 1000.0);
        assert_eq!(evaluation.diagnostics.counts.catches, 1);
        assert_eq!(evaluation.diagnostics.counts.responses, 0);
        assert_eq!(evaluation.diagnostics.counts.misses, 0);
    }

    #[test]
    fn choice_counts_add_up() {
        let battery = TrialBattery::new(1, 1, 1, 0.5, 1);
        let responses = [
            Some((Response::Choice(Side::Left), 10)),
            Some((Response::Choice(Side::Left), 20)),
            Some((Response::Both(Side::Left), 30)),
            Some((Response::Choice(Side::Right), -3)),
            None,
            Some((Response::Choice(Side::Right), 40)),
            None,
            Some((Response::Choice(Side::Left), 15)),
            None,
        ];
        let task = TaskType::Choice;
        let outcomes: Vec<(&Trial, Outcome)> = battery
            .trials()
            .iter()
            .zip(responses)
            .map(|(trial, response)| (trial, task.outcome(trial, response)))
            .collect();
        let evaluation = task.score(outcomes);
        let counts = evaluation.diagnostics.counts;
        assert_eq!(
            counts,
            OutcomeCounts {
                responses: 5,
                correct: 2,
                misses: 1,
                anticipated: 1,
                wrong: Some(2),
                catches: 2,
                false_alarms: 1,
            }
        );
        assert_eq!(evaluation.diagnostics.median_rt_valid, Some(10.0));
        assert_eq!(evaluation.diagnostics.median_rt_neutral, Some(40.0));
        assert_eq!(evaluation.diagnostics.median_rt_invalid, None);
        let expected = response_reward(10) + response_reward(40) + 2.0 * WITHHOLD_REWARD;
        assert!((evaluation.fitness - expected).abs() < 1e-9);
    }

    #[test]
    fn report_line() {
        let diagnostics = RtDiagnostics {
            fitness: 1951.7,
            median_rt_valid: Some(5.0),
            median_rt_neutral: None,
            median_rt_invalid: Some(12.5),
            counts: OutcomeCounts {
                responses: 1,
                correct: 1,
                catches: 1,
                ..OutcomeCounts::default()
            },
        };
        assert_eq!(
            diagnostics.to_string(),
            "      1951\t   5.00\t-------\t  12.50\t  1\t  0\t  0\t  1\t  0"
        );
    }
}
