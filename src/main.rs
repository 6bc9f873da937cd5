use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use faultbench::config::HarnessConfig;
use faultbench::pipeline::{self, RunOptions};

#[derive(Parser)]
#[command(
    name = "faultbench",
    version,
    about = "Build, run and plot the page-fault latency benchmark"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// TOML file with harness settings; flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Benchmark executable to run
    #[arg(long, global = true)]
    benchmark: Option<PathBuf>,

    /// Do not run the clean/build steps first
    #[arg(long, global = true)]
    skip_build: bool,

    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Output path for the three-panel figure
    #[arg(long, global = true)]
    results: Option<PathBuf>,

    /// Output path for the latency histogram
    #[arg(long, global = true)]
    histogram: Option<PathBuf>,

    #[arg(long, global = true)]
    bins: Option<usize>,

    #[arg(long, global = true)]
    dpi: Option<u32>,

    /// Skip rendering the PNG figures
    #[arg(long, global = true)]
    no_plot: bool,

    /// Print a JSON report instead of progress and statistics
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild, run the benchmark, save data, plots and statistics (default)
    Run,
    /// Re-render plots and statistics from a saved CSV file
    Replot {
        /// CSV to load (defaults to the configured data file)
        csv: Option<PathBuf>,
    },
}

impl Cli {
    fn harness_config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_file(path)?,
            None => HarnessConfig::default(),
        };

        if let Some(benchmark) = &self.benchmark {
            config.benchmark = benchmark.clone();
        }
        if self.skip_build {
            config.skip_build = true;
        }
        if let Some(csv) = &self.csv {
            config.csv_path = csv.clone();
        }
        if let Some(results) = &self.results {
            config.results_path = results.clone();
        }
        if let Some(histogram) = &self.histogram {
            config.histogram_path = histogram.clone();
        }
        if let Some(bins) = self.bins {
            config.bins = bins;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }

        Ok(config)
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            persist: true,
            plot: !self.no_plot,
            json: self.json,
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.harness_config()?;
    let options = cli.run_options();
    debug!(?config, ?options, "resolved configuration");

    match &cli.command {
        None | Some(Command::Run) => {
            pipeline::run(&config, &options)?;
        }
        Some(Command::Replot { csv }) => {
            let csv = csv.clone().unwrap_or_else(|| config.csv_path.clone());
            pipeline::replot(&csv, &config, &options)?;
        }
    }

    Ok(())
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    setup_tracing();

    if let Err(err) = run() {
        eprintln!("{}", err);
        process::exit(1);
    }
}
