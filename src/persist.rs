use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::errors::HarnessError;
use crate::types::{Dataset, Record};

pub const CSV_HEADER: &str = "# iteration,latency_ns,minor_faults,major_faults";

/// Write the dataset as comma-separated integers under a `#` header line.
///
/// Creates or truncates `path`. Callers skip this for empty datasets.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<(), HarnessError> {
    let write_err = |source| HarnessError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", CSV_HEADER).map_err(write_err)?;
    for record in dataset.records() {
        let [iteration, latency, minor, major] = record.as_row();
        writeln!(writer, "{},{},{},{}", iteration, latency, minor, major).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    debug!(rows = dataset.len(), path = %path.display(), "wrote csv");
    Ok(())
}

/// Load a file written by [`write_csv`] back into a dataset.
///
/// Lines starting with `#` and blank lines are skipped. Values written in
/// scientific notation (e.g. `1.000000000000000000e+02`) are accepted as long
/// as they are non-negative integers.
pub fn read_csv(path: &Path) -> Result<Dataset, HarnessError> {
    let file = File::open(path).map_err(|source| HarnessError::CsvRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|source| HarnessError::CsvRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parse_err = |detail: String| HarnessError::CsvParse {
            path: path.to_path_buf(),
            line_no: idx + 1,
            detail,
        };

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(parse_err(format!("expected 4 columns, found {}", fields.len())));
        }

        let mut values = [0u64; 4];
        for (i, field) in fields.iter().enumerate() {
            values[i] = parse_integer(field)
                .ok_or_else(|| parse_err(format!("column {} ({:?}) is not an integer", i + 1, field)))?;
        }
        records.push(Record::new(values[0], values[1], values[2], values[3]));
    }

    Ok(Dataset::new(records))
}

fn parse_integer(field: &str) -> Option<u64> {
    if let Ok(v) = field.parse::<u64>() {
        return Some(v);
    }
    let f: f64 = field.parse().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
