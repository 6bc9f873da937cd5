//! PNG rendering of a benchmark run.
//!
//! Produces a three-panel time-series figure (latency, minor faults, major
//! faults against iteration) and a latency histogram. Figures are laid out in
//! inches and rasterised at the configured DPI.

use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::errors::HarnessError;
use crate::types::Dataset;

const RESULTS_SIZE_IN: (f64, f64) = (12.0, 10.0);
const HISTOGRAM_SIZE_IN: (f64, f64) = (10.0, 6.0);
const FONT: &str = "sans-serif";

/// Converts physical sizes (inches, points) to pixels for a given DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub dpi: u32,
}

impl Layout {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn pixels(&self, (width_in, height_in): (f64, f64)) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        ((width_in * dpi).round() as u32, (height_in * dpi).round() as u32)
    }

    /// Typographic points to pixels.
    pub fn pt(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    fn px(&self, points: f64) -> u32 {
        self.pt(points).round().max(1.0) as u32
    }
}

/// One subplot of the results figure.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: &'static str,
    pub y_label: &'static str,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
    pub y_range: Range<f64>,
}

/// Equal-width histogram over `[edges[0], edges[bins]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u32>,
}

impl Histogram {
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin `values` into `bins` equal-width buckets spanning their min and max.
///
/// The last bucket is closed on the right so the maximum is counted. A
/// constant input is centred in a unit-wide span.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let (lo, hi) = match min_max(values) {
        Some((lo, hi)) if lo < hi => (lo, hi),
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    };
    let width = (hi - lo) / bins as f64;

    let edges = (0..=bins).map(|i| lo + i as f64 * width).collect();
    let mut counts = vec![0u32; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

/// Axis span covering `values` with a 5% margin; a flat series gets a unit margin.
pub fn padded_range(values: &[f64]) -> Range<f64> {
    match min_max(values) {
        Some((lo, hi)) if lo < hi => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        }
        Some((v, _)) => (v - 1.0)..(v + 1.0),
        None => 0.0..1.0,
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

fn column(values: Vec<u64>) -> Vec<f64> {
    values.into_iter().map(|v| v as f64).collect()
}

/// Latency, minor-fault and major-fault series against iteration, top to bottom.
pub fn results_panels(dataset: &Dataset) -> Vec<Panel> {
    let iterations = column(dataset.iterations());
    let series = [
        (
            "Task 1: Memory access latency with page faults",
            "Latency (ns)",
            BLUE,
            column(dataset.latencies()),
        ),
        (
            "Minor Page Faults",
            "Minor faults",
            RGBColor(0, 128, 0),
            column(dataset.minor_faults()),
        ),
        (
            "Major Page Faults",
            "Major faults",
            RED,
            column(dataset.major_faults()),
        ),
    ];

    series
        .into_iter()
        .map(|(title, y_label, color, ys)| Panel {
            title,
            y_label,
            color,
            y_range: padded_range(&ys),
            points: iterations.iter().copied().zip(ys).collect(),
        })
        .collect()
}

/// Render the three-panel figure to `path`. Returns `false` without touching
/// the filesystem when the dataset is empty.
pub fn draw_results(dataset: &Dataset, path: &Path, layout: Layout) -> Result<bool, HarnessError> {
    if dataset.is_empty() {
        return Ok(false);
    }
    let x_range = padded_range(&column(dataset.iterations()));
    let panels = results_panels(dataset);
    render_results(&panels, x_range, path, layout).map_err(|e| HarnessError::Plot {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    debug!(path = %path.display(), "rendered results figure");
    Ok(true)
}

/// Render the latency histogram to `path`. Returns `false` for an empty dataset.
pub fn draw_histogram(
    dataset: &Dataset,
    path: &Path,
    bins: usize,
    layout: Layout,
) -> Result<bool, HarnessError> {
    if dataset.is_empty() {
        return Ok(false);
    }
    let hist = histogram(&column(dataset.latencies()), bins);
    render_histogram(&hist, path, layout).map_err(|e| HarnessError::Plot {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    debug!(path = %path.display(), bins, "rendered latency histogram");
    Ok(true)
}

fn render_results(
    panels: &[Panel],
    x_range: Range<f64>,
    path: &Path,
    layout: Layout,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, layout.pixels(RESULTS_SIZE_IN)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((panels.len(), 1));
    for (area, panel) in areas.iter().zip(panels) {
        let mut chart = ChartBuilder::on(area)
            .caption(panel.title, (FONT, layout.pt(12.0)).into_font())
            .margin(layout.px(8.0))
            .x_label_area_size(layout.px(28.0))
            .y_label_area_size(layout.px(48.0))
            .build_cartesian_2d(x_range.clone(), panel.y_range.clone())?;

        chart
            .configure_mesh()
            .x_desc("Iteration")
            .y_desc(panel.y_label)
            .axis_desc_style((FONT, layout.pt(10.0)))
            .label_style((FONT, layout.pt(9.0)))
            .bold_line_style(BLACK.mix(0.3))
            .light_line_style(BLACK.mix(0.08))
            .draw()?;

        chart.draw_series(LineSeries::new(
            panel.points.iter().copied(),
            panel.color.mix(0.7).stroke_width(layout.px(0.5)),
        ))?;
    }

    root.present()?;
    Ok(())
}

fn render_histogram(
    hist: &Histogram,
    path: &Path,
    layout: Layout,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, layout.pixels(HISTOGRAM_SIZE_IN)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_lo = hist.edges[0];
    let x_hi = hist.edges[hist.edges.len() - 1];
    let y_top = (f64::from(hist.max_count()) * 1.05).ceil() as u32 + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Task 1: Latency distribution", (FONT, layout.pt(12.0)).into_font())
        .margin(layout.px(8.0))
        .x_label_area_size(layout.px(28.0))
        .y_label_area_size(layout.px(48.0))
        .build_cartesian_2d(x_lo..x_hi, 0u32..y_top)?;

    chart
        .configure_mesh()
        .x_desc("Latency (ns)")
        .y_desc("Frequency")
        .axis_desc_style((FONT, layout.pt(10.0)))
        .label_style((FONT, layout.pt(9.0)))
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.08))
        .draw()?;

    let bars = move || {
        hist.counts
            .iter()
            .enumerate()
            .map(move |(i, &count)| [(hist.edges[i], 0u32), (hist.edges[i + 1], count)])
    };

    chart.draw_series(bars().map(|corners| Rectangle::new(corners, BLUE.mix(0.7).filled())))?;
    chart.draw_series(bars().map(|corners| Rectangle::new(corners, BLACK.stroke_width(1))))?;

    root.present()?;
    Ok(())
}
