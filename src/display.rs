use std::path::Path;

use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Stream, Style};
use serde::Serialize;

use crate::types::Summary;

fn style_heading() -> Style {
    Style::new().cyan().bold()
}

fn style_value() -> Style {
    Style::new().yellow()
}

/// A progress line such as "Running ./task1_latency...", dimmed on colour terminals.
pub fn format_status(message: &str) -> String {
    message
        .if_supports_color(Stream::Stdout, |s| s.dimmed())
        .to_string()
}

/// "<label> saved to <path>" with the path highlighted.
pub fn format_saved(label: &str, path: &Path) -> String {
    let path_str = path.display().to_string();
    format!(
        "{} saved to {}",
        label,
        path_str.if_supports_color(Stream::Stdout, |s| s.green())
    )
}

pub fn format_no_data() -> String {
    "No data to plot"
        .if_supports_color(Stream::Stdout, |s| s.yellow())
        .to_string()
}

/// Human-readable statistics block. Latency figures use two decimals.
pub fn format_summary(summary: &Summary) -> String {
    let value_style = style_value();
    let latency = |label: &str, v: f64| {
        let value = format!("{:.2}", v);
        format!(
            "{}: {} ns\n",
            label,
            value.if_supports_color(Stream::Stdout, |s| s.style(value_style))
        )
    };
    let total = |label: &str, v: u128| {
        let value = v.to_string();
        format!(
            "{}: {}\n",
            label,
            value.if_supports_color(Stream::Stdout, |s| s.style(value_style))
        )
    };

    let mut out = String::new();
    out.push('\n');
    out.push_str(
        &"=== Task 1 statistics ==="
            .if_supports_color(Stream::Stdout, |s| s.style(style_heading()))
            .to_string(),
    );
    out.push('\n');
    out.push_str(&latency("Mean latency", summary.mean_latency_ns));
    out.push_str(&latency("Max latency", summary.max_latency_ns));
    out.push_str(&latency("Min latency", summary.min_latency_ns));
    out.push_str(&latency("Standard deviation", summary.std_dev_latency_ns));
    out.push_str(&total("Total minor faults", summary.total_minor_faults));
    out.push_str(&total("Total major faults", summary.total_major_faults));
    out
}

/// Pointers to the follow-on tasks. They need root, so they are never run from here.
pub fn format_next_steps() -> String {
    let cmd = |c: &str| {
        c.if_supports_color(Stream::Stdout, |s| s.bold())
            .to_string()
    };
    format!(
        "\nTo run Task 2 (requires sudo):\n  {}\n\nTo run Task 3 (requires sudo):\n  {}\n",
        cmd("make run_task2"),
        cmd("make run_task3")
    )
}

/// Where the run's artifacts ended up.
#[derive(Debug, Clone, Serialize)]
pub struct OutputPaths {
    pub csv: Option<String>,
    pub results: Option<String>,
    pub histogram: Option<String>,
}

#[derive(Serialize)]
struct JsonLatency {
    mean: f64,
    max: f64,
    min: f64,
    std_dev: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    samples: usize,
    latency_ns: Option<JsonLatency>,
    total_minor_faults: u128,
    total_major_faults: u128,
    outputs: &'a OutputPaths,
}

/// Machine-readable report. An empty run has `samples: 0` and `latency_ns: null`.
pub fn format_json(summary: Option<&Summary>, outputs: &OutputPaths, now: DateTime<Utc>) -> String {
    let report = JsonReport {
        generated_at: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        samples: summary.map_or(0, |s| s.samples),
        latency_ns: summary.map(|s| JsonLatency {
            mean: s.mean_latency_ns,
            max: s.max_latency_ns,
            min: s.min_latency_ns,
            std_dev: s.std_dev_latency_ns,
        }),
        total_minor_faults: summary.map_or(0, |s| s.total_minor_faults),
        total_major_faults: summary.map_or(0, |s| s.total_major_faults),
        outputs,
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-02-18T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample_summary() -> Summary {
        Summary {
            samples: 3,
            mean_latency_ns: 20.0,
            max_latency_ns: 30.0,
            min_latency_ns: 10.0,
            std_dev_latency_ns: 8.164_965_809,
            total_minor_faults: 3,
            total_major_faults: 0,
        }
    }

    #[test]
    fn summary_block_uses_two_decimals() {
        let out = format_summary(&sample_summary());
        assert!(out.contains("=== Task 1 statistics ==="));
        assert!(out.contains("Mean latency: 20.00 ns"));
        assert!(out.contains("Max latency: 30.00 ns"));
        assert!(out.contains("Min latency: 10.00 ns"));
        assert!(out.contains("Standard deviation: 8.16 ns"));
        assert!(out.contains("Total minor faults: 3"));
        assert!(out.contains("Total major faults: 0"));
    }

    #[test]
    fn next_steps_name_both_tasks() {
        let out = format_next_steps();
        assert!(out.contains("make run_task2"));
        assert!(out.contains("make run_task3"));
    }

    #[test]
    fn saved_line_includes_path() {
        let out = format_saved("Data", Path::new("task1_data.csv"));
        assert_eq!(out, "Data saved to task1_data.csv");
    }

    #[test]
    fn json_report_fields() {
        let outputs = OutputPaths {
            csv: Some("task1_data.csv".into()),
            results: Some("task1_results.png".into()),
            histogram: None,
        };
        let json = format_json(Some(&sample_summary()), &outputs, fixed_now());
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["generated_at"], "2026-02-18T00:00:00Z");
        assert_eq!(parsed["samples"], 3);
        assert_eq!(parsed["latency_ns"]["mean"], 20.0);
        assert_eq!(parsed["latency_ns"]["min"], 10.0);
        assert_eq!(parsed["total_minor_faults"], 3);
        assert_eq!(parsed["outputs"]["csv"], "task1_data.csv");
        assert!(parsed["outputs"]["histogram"].is_null());
    }

    #[test]
    fn json_report_empty_run() {
        let outputs = OutputPaths {
            csv: None,
            results: None,
            histogram: None,
        };
        let json = format_json(None, &outputs, fixed_now());
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["samples"], 0);
        assert!(parsed["latency_ns"].is_null());
    }
}
