use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

use tracing::debug;

use crate::errors::HarnessError;

/// Ways a benchmark run can fail to produce usable output.
#[derive(Debug)]
pub enum RunError {
    /// The executable could not be started (missing, not executable, ...).
    SpawnFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The process ran but exited unsuccessfully. Whatever it printed is kept.
    ExitedWithFailure {
        path: PathBuf,
        status: ExitStatus,
        stdout: String,
    },
    NonUtf8Output { path: PathBuf },
}

impl From<RunError> for HarnessError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::SpawnFailed { path, source } => HarnessError::BenchmarkSpawn { path, source },
            RunError::ExitedWithFailure { path, status, .. } => {
                HarnessError::BenchmarkFailed { path, status }
            }
            RunError::NonUtf8Output { path } => HarnessError::BenchmarkOutputNotUtf8 { path },
        }
    }
}

/// Run the benchmark with no arguments and return everything it wrote to stdout.
///
/// Blocks until the process exits; there is no timeout. Stderr is passed
/// through to the terminal.
pub fn run_benchmark(path: &Path) -> Result<String, RunError> {
    let start = Instant::now();
    let output = Command::new(path)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| RunError::SpawnFailed {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        path = %path.display(),
        status = %output.status,
        bytes = output.stdout.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "benchmark finished"
    );

    if !output.status.success() {
        return Err(RunError::ExitedWithFailure {
            path: path.to_path_buf(),
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        });
    }

    String::from_utf8(output.stdout).map_err(|_| RunError::NonUtf8Output {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_executable_is_spawn_failure() {
        let err = run_benchmark(Path::new("./definitely_not_task1_latency")).unwrap_err();
        assert!(matches!(err, RunError::SpawnFailed { .. }));
        let converted: HarnessError = err.into();
        assert!(matches!(converted, HarnessError::BenchmarkSpawn { .. }));
    }

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let script = write_script(tmp.path(), "bench.sh", "echo '0 100 1 0'\necho '1 105 0 0'");
        let out = run_benchmark(&script).unwrap();
        assert_eq!(out, "0 100 1 0\n1 105 0 0\n");
    }

    #[cfg(unix)]
    #[test]
    fn stderr_is_not_captured() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let script = write_script(tmp.path(), "bench.sh", "echo noise >&2\necho '0 1 2 3'");
        let out = run_benchmark(&script).unwrap();
        assert_eq!(out, "0 1 2 3\n");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_keeps_stdout() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let script = write_script(tmp.path(), "bench.sh", "echo partial\nexit 3");
        match run_benchmark(&script) {
            Err(RunError::ExitedWithFailure { status, stdout, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stdout, "partial\n");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn invalid_utf8_is_reported() {
        let tmp = assert_fs::TempDir::new().unwrap();
        let script = write_script(tmp.path(), "bench.sh", "printf '\\377\\376\\n'");
        assert!(matches!(
            run_benchmark(&script),
            Err(RunError::NonUtf8Output { .. })
        ));
    }
}
