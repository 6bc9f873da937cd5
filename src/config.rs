use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::HarnessError;

/// Upper bound on `dpi`; the 12x10 inch figure is already 14400x12000 pixels here.
pub const MAX_DPI: u32 = 1200;

/// Everything the pipeline needs to know about where to find the benchmark
/// and where to put its results.
///
/// Defaults reproduce the classic lab layout: `make clean && make`, then
/// `./task1_latency`, with outputs written to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Benchmark executable, run with no arguments.
    pub benchmark: PathBuf,
    /// Build tool invoked for the clean and build steps.
    pub build_tool: String,
    /// Target passed to `build_tool` for the clean step.
    pub clean_target: String,
    /// Targets passed to `build_tool` for the build step (empty means the default target).
    pub build_targets: Vec<String>,
    pub skip_build: bool,
    pub csv_path: PathBuf,
    pub results_path: PathBuf,
    pub histogram_path: PathBuf,
    /// Histogram bin count.
    pub bins: usize,
    /// Raster resolution for both figures.
    pub dpi: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            benchmark: PathBuf::from("./task1_latency"),
            build_tool: "make".into(),
            clean_target: "clean".into(),
            build_targets: Vec::new(),
            skip_build: false,
            csv_path: PathBuf::from("task1_data.csv"),
            results_path: PathBuf::from("task1_results.png"),
            histogram_path: PathBuf::from("task1_histogram.png"),
            bins: 50,
            dpi: 300,
        }
    }
}

impl HarnessConfig {
    /// Load a TOML config file. Missing keys fall back to the defaults.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| HarnessError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.bins == 0 {
            return Err(HarnessError::InvalidConfig {
                detail: "bins must be greater than zero".into(),
            });
        }
        if self.dpi == 0 {
            return Err(HarnessError::InvalidConfig {
                detail: "dpi must be greater than zero".into(),
            });
        }
        if self.dpi > MAX_DPI {
            return Err(HarnessError::InvalidConfig {
                detail: format!("dpi must be at most {}", MAX_DPI),
            });
        }
        if self.build_tool.trim().is_empty() && !self.skip_build {
            return Err(HarnessError::InvalidConfig {
                detail: "build_tool must not be empty unless skip_build is set".into(),
            });
        }
        Ok(())
    }
}
