use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(thiserror::Error, Debug)]
pub enum HarnessError {
    #[error("Failed to start build step '{command}': {source}")]
    BuildSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Build step '{command}' failed ({status})")]
    BuildFailed { command: String, status: ExitStatus },

    #[error("Failed to start benchmark {path}: {source}")]
    BenchmarkSpawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Benchmark {path} exited with {status}")]
    BenchmarkFailed { path: PathBuf, status: ExitStatus },

    #[error("Benchmark {path} wrote output that is not valid UTF-8")]
    BenchmarkOutputNotUtf8 { path: PathBuf },

    #[error("Malformed record on line {line_no}: {line:?} ({detail})")]
    MalformedRecord {
        line_no: usize,
        line: String,
        detail: String,
    },

    #[error("Failed to read data file {path}: {source}")]
    CsvRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse data file {path} at line {line_no}: {detail}")]
    CsvParse {
        path: PathBuf,
        line_no: usize,
        detail: String,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to render {path}: {detail}")]
    Plot { path: PathBuf, detail: String },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },
}
