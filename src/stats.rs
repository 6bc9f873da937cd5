use crate::types::{Dataset, Summary};

/// Compute the latency/fault summary, or `None` for an empty dataset.
///
/// The standard deviation uses the population formula (divides by `n`).
pub fn summarize(dataset: &Dataset) -> Option<Summary> {
    if dataset.is_empty() {
        return None;
    }

    let latencies: Vec<f64> = dataset
        .records()
        .iter()
        .map(|r| r.latency_ns as f64)
        .collect();
    let n = latencies.len() as f64;

    let mean = latencies.iter().sum::<f64>() / n;
    let variance = latencies.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let max = latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = latencies.iter().copied().fold(f64::INFINITY, f64::min);

    // Totals may exceed u64::MAX.
    let total_minor_faults = dataset
        .records()
        .iter()
        .map(|r| u128::from(r.minor_faults))
        .sum();
    let total_major_faults = dataset
        .records()
        .iter()
        .map(|r| u128::from(r.major_faults))
        .sum();

    Some(Summary {
        samples: dataset.len(),
        mean_latency_ns: mean,
        max_latency_ns: max,
        min_latency_ns: min,
        std_dev_latency_ns: variance.sqrt(),
        total_minor_faults,
        total_major_faults,
    })
}
