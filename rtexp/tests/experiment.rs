use rtevo::{CheckpointStore, Run};
use rtevo_nn::Controller;
use rtexp::config::ExperimentConfig;
use rtexp::driver::Experiment;
use rtexp::simulator::{TrialSimulator, TrialTiming};
use rtexp::tasks::{RtDiagnostics, TaskType};
use rtexp::trials::{TrialBattery, INPUT_COUNT};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use std::fs;
use std::path::Path;

/// Presses once, `rt` steps after the target appears.
struct FixedLatency {
    rt: usize,
    steps_since_target: Option<usize>,
    output: [bool; 1],
}

impl FixedLatency {
    fn new(rt: usize) -> FixedLatency {
        FixedLatency {
            rt,
            steps_since_target: None,
            output: [false],
        }
    }
}

impl Controller for FixedLatency {
    fn reset(&mut self) {
        self.steps_since_target = None;
    }

    fn input_count(&self) -> usize {
        INPUT_COUNT
    }

    fn output_count(&self) -> usize {
        1
    }

    fn unit_count(&self) -> usize {
        INPUT_COUNT + 1
    }

    fn advance(&mut self, input: &[f64], _: Option<&[f64]>) -> &[bool] {
        let target_on = input[0] > 0.0 || input[INPUT_COUNT - 1] > 0.0;
        self.steps_since_target = match self.steps_since_target {
            Some(steps) => Some(steps + 1),
            None if target_on => Some(0),
            None => None,
        };
        self.output[0] = self.steps_since_target == Some(self.rt);
        &self.output
    }
}

fn short_timing() -> TrialTiming {
    TrialTiming {
        pre_time: 4,
        min_cue_time: 6,
        max_cue_time: 9,
        max_rt: 40,
    }
}

#[test]
fn neutral_responses_at_five_steps() {
    let simulator = TrialSimulator::new(TaskType::Simple, short_timing(), 10.0, 3.0, None).unwrap();
    let battery = TrialBattery::new(0, 1, 0, 0.0, 1);
    let evaluation = simulator.evaluate(
        &mut FixedLatency::new(5),
        &battery,
        &mut ChaCha8Rng::seed_from_u64(11),
    );

    assert!((evaluation.fitness - 2.0 * 951.229_424_500_714).abs() < 1e-6);
    let diagnostics = &evaluation.diagnostics;
    assert_eq!(diagnostics.median_rt_neutral, Some(5.0));
    assert_eq!(diagnostics.median_rt_valid, None);
    assert_eq!(diagnostics.median_rt_invalid, None);
    assert_eq!(diagnostics.counts.correct, 2);
    assert_eq!(diagnostics.counts.misses, 0);
}

#[test]
fn withholding_on_catch_trials() {
    let simulator = TrialSimulator::new(TaskType::Simple, short_timing(), 10.0, 3.0, None).unwrap();
    // Two valid target trials and one catch trial.
    let battery = TrialBattery::new(1, 0, 0, 0.5, 1);
    assert_eq!(battery.catch_count(), 1);

    let mut silent = FixedLatency::new(usize::MAX);
    let evaluation = simulator.evaluate(&mut silent, &battery, &mut ChaCha8Rng::seed_from_u64(12));
    assert_eq!(evaluation.fitness, 1000.0);
    assert_eq!(evaluation.diagnostics.counts.misses, 2);
    assert_eq!(evaluation.diagnostics.counts.catches, 1);
    assert_eq!(evaluation.diagnostics.counts.false_alarms, 0);

    let mut eager = FixedLatency::new(3);
    let evaluation = simulator.evaluate(&mut eager, &battery, &mut ChaCha8Rng::seed_from_u64(12));
    assert_eq!(evaluation.diagnostics.counts.correct, 2);
    assert_eq!(evaluation.diagnostics.counts.catches, 1);
}

fn small_experiment(directory: &Path) -> ExperimentConfig {
    let mut config = ExperimentConfig::from_ron(
        r#"(
            task: Choice,
            ext_stimuli: 25.0,
            cue_stimuli: Some(8.0),
            min_gene: -30.0,
            max_gene: 30.0,
            mutation_step: 3.0,
            mutation_rate: 0.2,
            generations: 4,
            save: 2,
            runs: 2,
            populations: 2,
            individuals: 5,
            migrate: 2,
            max_stagnation: 1,
            random_immigrants: 1,
            noise: true,
            noise_sigma: 1.0,
            hidden_neurons: 1,
            valid: 1,
            neutral: 1,
            invalid: 1,
            catch: 0.5,
            reps: 1,
            pre_time: 5,
            min_cue_time: 5,
            max_cue_time: 10,
            max_rt: 30,
            directory: "unused",
            seed: 2024,
        )"#,
    )
    .unwrap();
    config.directory = directory.to_path_buf();
    config
}

#[test]
fn runs_write_a_checkpoint_per_interval() {
    let dir = tempfile::tempdir().unwrap();
    let summaries = Experiment::new(small_experiment(dir.path()))
        .unwrap()
        .run_all()
        .unwrap();

    assert_eq!(summaries.len(), 2);
    let store = CheckpointStore::open(dir.path()).unwrap();
    for summary in &summaries {
        assert_eq!(summary.generation, 4);
        assert!(summary.champion.is_evaluated());
        for generation in [0, 2, 4] {
            assert!(store.contains(summary.run_index, generation));
        }
        assert_eq!(store.latest(summary.run_index).unwrap(), Some(4));

        let checkpoint = store
            .load::<RtDiagnostics>(summary.run_index, 4)
            .unwrap()
            .unwrap();
        let run: Run<RtDiagnostics> = checkpoint.run;
        for population in run.populations() {
            assert_eq!(population.len(), 5);
            for genome in population.genomes() {
                let counts = &genome.diagnostics().unwrap().counts;
                assert_eq!(counts.responses + counts.misses, 6);
                assert_eq!(counts.catches + counts.false_alarms, 3);
                assert_eq!(
                    counts.responses,
                    counts.correct + counts.wrong.unwrap() + counts.anticipated
                );
            }
        }
    }
}

#[test]
fn interrupted_experiment_resumes_identically() {
    let uninterrupted = tempfile::tempdir().unwrap();
    Experiment::new(small_experiment(uninterrupted.path()))
        .unwrap()
        .run_all()
        .unwrap();

    let interrupted = tempfile::tempdir().unwrap();
    let experiment = Experiment::new(small_experiment(interrupted.path())).unwrap();
    experiment.run_all().unwrap();
    // Lose everything after the first interval of the first run
    // and the whole second run except its initial state.
    fs::remove_file(experiment.store().path(0, 4)).unwrap();
    fs::remove_file(experiment.store().path(1, 2)).unwrap();
    fs::remove_file(experiment.store().path(1, 4)).unwrap();
    experiment.run_all().unwrap();

    for run_index in 0..2 {
        for generation in [0, 2, 4] {
            let expected = fs::read(
                CheckpointStore::open(uninterrupted.path())
                    .unwrap()
                    .path(run_index, generation),
            )
            .unwrap();
            let resumed = fs::read(experiment.store().path(run_index, generation)).unwrap();
            assert_eq!(
                expected, resumed,
                "run {} generation {} diverged",
                run_index, generation
            );
        }
    }
}

#[test]
fn completed_experiments_are_not_recomputed() {
    let dir = tempfile::tempdir().unwrap();
    let experiment = Experiment::new(small_experiment(dir.path())).unwrap();
    let first = experiment.run_all().unwrap();
    let modified = fs::metadata(experiment.store().path(0, 4))
        .unwrap()
        .modified()
        .unwrap();

    let second = experiment.run_all().unwrap();
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.champion, b.champion);
    }
    assert_eq!(
        fs::metadata(experiment.store().path(0, 4))
            .unwrap()
            .modified()
            .unwrap(),
        modified
    );
}
