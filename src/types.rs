use serde::Serialize;

/// One measurement emitted by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Record {
    pub iteration: u64,
    pub latency_ns: u64,
    pub minor_faults: u64,
    pub major_faults: u64,
}

impl Record {
    pub fn new(iteration: u64, latency_ns: u64, minor_faults: u64, major_faults: u64) -> Self {
        Self {
            iteration,
            latency_ns,
            minor_faults,
            major_faults,
        }
    }

    /// Values in CSV column order.
    pub fn as_row(&self) -> [u64; 4] {
        [
            self.iteration,
            self.latency_ns,
            self.minor_faults,
            self.major_faults,
        ]
    }
}

/// Records in the order the benchmark produced them. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iterations(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.iteration).collect()
    }

    pub fn latencies(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.latency_ns).collect()
    }

    pub fn minor_faults(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.minor_faults).collect()
    }

    pub fn major_faults(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.major_faults).collect()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

/// Why a line of benchmark output was not treated as a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    NotDigitPrefixed,
    TooFewFields { found: usize },
}

/// Result of running the admission predicate over a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Accepted(Record),
    Rejected(Rejection),
    /// Digit-prefixed with enough fields, but one of the first four is not an integer.
    Malformed { field: usize, value: String },
}

/// Latency and fault summary for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub samples: usize,
    pub mean_latency_ns: f64,
    pub max_latency_ns: f64,
    pub min_latency_ns: f64,
    pub std_dev_latency_ns: f64,
    pub total_minor_faults: u128,
    pub total_major_faults: u128,
}
