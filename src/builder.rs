use std::process::Command;

use tracing::debug;

use crate::config::HarnessConfig;
use crate::errors::HarnessError;

/// One invocation of the external build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStep {
    pub program: String,
    pub args: Vec<String>,
}

impl BuildStep {
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// The clean step followed by the build step, in that order.
pub fn build_steps(config: &HarnessConfig) -> Vec<BuildStep> {
    vec![
        BuildStep {
            program: config.build_tool.clone(),
            args: vec![config.clean_target.clone()],
        },
        BuildStep {
            program: config.build_tool.clone(),
            args: config.build_targets.clone(),
        },
    ]
}

/// Run a single step, blocking until it exits. Output goes straight to the terminal.
pub fn run_step(step: &BuildStep) -> Result<(), HarnessError> {
    let command = step.display();
    debug!(%command, "running build step");

    let status = Command::new(&step.program)
        .args(&step.args)
        .status()
        .map_err(|source| HarnessError::BuildSpawn {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(HarnessError::BuildFailed { command, status });
    }
    Ok(())
}

/// Clean and rebuild the benchmark suite, stopping at the first failing step.
pub fn rebuild(config: &HarnessConfig) -> Result<(), HarnessError> {
    for step in build_steps(config) {
        run_step(&step)?;
    }
    Ok(())
}
