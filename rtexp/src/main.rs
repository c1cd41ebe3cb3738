use rtexp::config::ExperimentConfig;
use rtexp::driver::Experiment;

use anyhow::Context;
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rtexp")]
#[command(about = "Evolves spiking controllers for cued reaction-time tasks")]
struct Args {
    /// Path to the experiment configuration (RON)
    config: PathBuf,

    /// Number of runs (overrides the configuration)
    #[arg(long)]
    runs: Option<usize>,

    /// Log per-generation population statistics
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = ExperimentConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(runs) = args.runs {
        config.runs = runs;
    }

    let experiment = Experiment::new(config).context("preparing the experiment")?;
    for summary in experiment.run_all()? {
        info!(
            "run {} champion after {} generations: fitness {:.2}",
            summary.run_index + 1,
            summary.generation,
            summary.champion.fitness().unwrap_or(f64::NAN)
        );
    }
    Ok(())
}
