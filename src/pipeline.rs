//! Build, run, parse, then persist/plot/summarise, in that order.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::builder;
use crate::config::HarnessConfig;
use crate::display::{self, OutputPaths};
use crate::errors::HarnessError;
use crate::parse;
use crate::persist;
use crate::plot::{self, Layout};
use crate::runner;
use crate::stats;
use crate::types::{Dataset, Summary};

/// Switches that shape what a run produces, independent of file locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Write the dataset to `csv_path`.
    pub persist: bool,
    /// Render the results figure and histogram.
    pub plot: bool,
    /// Print a JSON report instead of human-readable lines.
    pub json: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            persist: true,
            plot: true,
            json: false,
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub dataset: Dataset,
    pub summary: Option<Summary>,
    pub outputs: OutputPaths,
}

/// Console sink that stays quiet in JSON mode so stdout carries only the report.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(options: &RunOptions) -> Self {
        Self {
            quiet: options.json,
        }
    }

    pub fn line(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    pub fn block(&self, text: &str) {
        if !self.quiet {
            print!("{}", text);
        }
    }
}

/// Rebuild (unless skipped), run the benchmark and parse its output.
///
/// Build and runner failures come back as errors before any file is written.
pub fn collect(config: &HarnessConfig, console: Console) -> Result<Dataset, HarnessError> {
    if config.skip_build {
        info!("skipping build step");
    } else {
        console.line(&display::format_status("Building benchmarks..."));
        builder::rebuild(config)?;
    }

    console.line(&display::format_status(&format!(
        "Running {}...",
        config.benchmark.display()
    )));
    let text = runner::run_benchmark(&config.benchmark).map_err(|err| {
        if let runner::RunError::ExitedWithFailure { stdout, .. } = &err {
            warn!(captured_bytes = stdout.len(), "discarding output of failed benchmark run");
        }
        HarnessError::from(err)
    })?;

    parse::parse_records(&text)
}

/// Persist, plot and summarise a dataset.
///
/// An empty dataset prints a diagnostic and leaves every output file untouched.
pub fn report(
    dataset: Dataset,
    config: &HarnessConfig,
    options: &RunOptions,
    console: Console,
) -> Result<RunReport, HarnessError> {
    let mut outputs = OutputPaths {
        csv: None,
        results: None,
        histogram: None,
    };

    if dataset.is_empty() {
        warn!("benchmark produced no records");
        console.line(&display::format_no_data());
        return Ok(RunReport {
            dataset,
            summary: None,
            outputs,
        });
    }

    if options.persist {
        persist::write_csv(&dataset, &config.csv_path)?;
        console.line(&display::format_saved("Data", &config.csv_path));
        outputs.csv = Some(path_string(&config.csv_path));
    }

    if options.plot {
        let layout = Layout::new(config.dpi);
        if plot::draw_results(&dataset, &config.results_path, layout)? {
            console.line(&display::format_saved("Plots", &config.results_path));
            outputs.results = Some(path_string(&config.results_path));
        }
        if plot::draw_histogram(&dataset, &config.histogram_path, config.bins, layout)? {
            console.line(&display::format_saved("Histogram", &config.histogram_path));
            outputs.histogram = Some(path_string(&config.histogram_path));
        }
    }

    let summary = stats::summarize(&dataset);
    if let Some(summary) = &summary {
        console.block(&display::format_summary(summary));
    }

    Ok(RunReport {
        dataset,
        summary,
        outputs,
    })
}

/// The full pipeline: collect, then report, then point at the follow-on tasks.
pub fn run(config: &HarnessConfig, options: &RunOptions) -> Result<RunReport, HarnessError> {
    config.validate()?;
    let console = Console::new(options);

    let dataset = collect(config, console)?;
    let report = report(dataset, config, options, console)?;

    finish(&report, options);
    console.block(&display::format_next_steps());
    Ok(report)
}

/// Re-render plots and statistics from a previously saved CSV.
pub fn replot(
    csv: &Path,
    config: &HarnessConfig,
    options: &RunOptions,
) -> Result<RunReport, HarnessError> {
    config.validate()?;
    let console = Console::new(options);

    console.line(&display::format_status(&format!("Loading {}...", csv.display())));
    let dataset = persist::read_csv(csv)?;
    let options = RunOptions {
        persist: false,
        ..*options
    };
    let mut report = report(dataset, config, &options, console)?;
    report.outputs.csv = Some(path_string(csv));

    finish(&report, &options);
    Ok(report)
}

fn finish(report: &RunReport, options: &RunOptions) {
    if options.json {
        println!(
            "{}",
            display::format_json(report.summary.as_ref(), &report.outputs, Utc::now())
        );
    }
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}
