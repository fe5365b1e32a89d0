//! A module for plotting per-node statistic distributions.
//!
//! The plots mirror the comparison figures of the original analysis: overlaid line histograms of
//! one statistic across several graphs, a log-log degree plot, and a 2x2 panel figure with one
//! graph per panel.

use std::{fmt, path::Path};

use plotters::prelude::*;

use crate::graph::Graph;

/// The per-node statistics a histogram can be built over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    Degree,
    Clustering,
    Betweenness,
}

impl Metric {
    /// The axis label used when plotting the metric.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Clustering => "clustering coefficient",
            Self::Betweenness => "node betweenness",
        }
    }
}

/// The reasons plotting can fail.
#[derive(Debug)]
pub enum HistError {
    /// Fewer than two bin edges were supplied.
    BadBins(usize),
    Render(String),
}

impl std::error::Error for HistError {}

impl fmt::Display for HistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadBins(count) => {
                write!(f, "need at least two bin edges, got {}", count)
            }
            Self::Render(msg) => write!(f, "error drawing histogram: {}", msg),
        }
    }
}

/// One labelled sample set to overlay on a histogram figure.
#[derive(Clone, Debug)]
pub struct HistSeries {
    pub label: String,
    pub color: RGBColor,
    pub samples: Vec<f64>,
}

impl HistSeries {
    /// Creates a series from a graph by sampling the given metric.
    pub fn from_graph<T>(
        label: &str,
        color: RGBColor,
        graph: &mut Graph<T>,
        metric: Metric,
    ) -> Self
    where
        T: Copy + Eq + std::hash::Hash + Ord + fmt::Debug,
    {
        Self {
            label: label.to_string(),
            color,
            samples: metric_samples(graph, metric),
        }
    }
}

/// Samples a metric for every vertex of a graph, in vertex order.
pub fn metric_samples<T>(graph: &mut Graph<T>, metric: Metric) -> Vec<f64>
where
    T: Copy + Eq + std::hash::Hash + Ord + fmt::Debug,
{
    let vertices = graph.vertices();

    match metric {
        Metric::Degree => {
            let centralities = graph.degree_centrality();
            vertices
                .iter()
                .map(|v| f64::from(centralities[v]))
                .collect()
        }
        Metric::Clustering => {
            let coefficients = graph.clustering_coefficients();
            vertices.iter().map(|v| coefficients[v]).collect()
        }
        Metric::Betweenness => {
            let threads = std::thread::available_parallelism().map_or(1, usize::from);
            let centralities = graph.betweenness_centrality(threads);
            vertices.iter().map(|v| centralities[v]).collect()
        }
    }
}

/// Returns `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Bins samples against a sorted sequence of bin edges.
///
/// Each bin is half-open except the last, which includes the final edge; samples outside the
/// edges are dropped.
pub fn bin_counts(samples: &[f64], edges: &[f64]) -> Vec<usize> {
    let bins = edges.len().saturating_sub(1);
    let mut counts = vec![0; bins];

    for sample in samples {
        for i in 0..bins {
            let last = i == bins - 1;
            if *sample >= edges[i] && (*sample < edges[i + 1] || (last && *sample == edges[i + 1]))
            {
                counts[i] += 1;
                break;
            }
        }
    }

    counts
}

/// Draws overlaid line histograms of several sample sets into one PNG, with a legend.
pub fn overlay_histogram(
    path: &Path,
    title: &str,
    x_desc: &str,
    edges: &[f64],
    series: &[HistSeries],
) -> Result<(), HistError> {
    if edges.len() < 2 {
        return Err(HistError::BadBins(edges.len()));
    }

    let centers = bin_centers(edges);
    let binned: Vec<Vec<usize>> = series
        .iter()
        .map(|s| bin_counts(&s.samples, edges))
        .collect();
    let y_max = binned
        .iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let root = BitMapBackend::new(path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(edges[0]..edges[edges.len() - 1], 0.0..y_max * 1.1)
        .map_err(to_render_error)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("occurrences")
        .x_labels(10)
        .draw()
        .map_err(to_render_error)?;

    for (s, counts) in series.iter().zip(&binned) {
        let color = s.color;
        let points = centers
            .iter()
            .copied()
            .zip(counts.iter().map(|c| *c as f64));

        chart
            .draw_series(LineSeries::new(
                points,
                ShapeStyle::from(&color).stroke_width(3),
            ))
            .map_err(to_render_error)?
            .label(s.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(to_render_error)?;

    root.present().map_err(to_render_error)?;
    Ok(())
}

/// Draws a log-log degree-occurrence plot for several sample sets into one PNG.
///
/// Bins with no occurrences (or a non-positive left edge) are skipped, since their logarithm is
/// undefined.
pub fn log_log_degree(
    path: &Path,
    edges: &[f64],
    series: &[HistSeries],
) -> Result<(), HistError> {
    if edges.len() < 2 {
        return Err(HistError::BadBins(edges.len()));
    }

    let lines: Vec<(RGBColor, String, Vec<(f64, f64)>)> = series
        .iter()
        .map(|s| {
            let counts = bin_counts(&s.samples, edges);
            let points = edges
                .iter()
                .zip(counts)
                .filter(|(edge, count)| **edge > 0.0 && *count > 0)
                .map(|(edge, count)| (edge.ln(), (count as f64).ln()))
                .collect();
            (s.color, s.label.clone(), points)
        })
        .collect();

    let all_points = lines.iter().flat_map(|(_, _, points)| points.iter());
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for (x, y) in all_points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }
    if x_min > x_max {
        // Nothing to plot.
        (x_min, x_max, y_min, y_max) = (0.0, 1.0, 0.0, 1.0);
    }

    let root = BitMapBackend::new(path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Degree distribution", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max + 0.1, y_min..y_max + 0.1)
        .map_err(to_render_error)?;

    chart
        .configure_mesh()
        .x_desc("log[degree]")
        .y_desc("log[occurrences]")
        .draw()
        .map_err(to_render_error)?;

    for (color, label, points) in lines {
        chart
            .draw_series(LineSeries::new(
                points,
                ShapeStyle::from(&color).stroke_width(3),
            ))
            .map_err(to_render_error)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(to_render_error)?;

    root.present().map_err(to_render_error)?;
    Ok(())
}

/// Draws up to four sample sets as a 2x2 panel figure with shared axis limits, one titled line
/// histogram per panel.
pub fn metric_panel(
    path: &Path,
    x_desc: &str,
    edges: &[f64],
    panels: &[HistSeries],
) -> Result<(), HistError> {
    if edges.len() < 2 {
        return Err(HistError::BadBins(edges.len()));
    }

    let centers = bin_centers(edges);
    let binned: Vec<Vec<usize>> = panels
        .iter()
        .map(|s| bin_counts(&s.samples, edges))
        .collect();
    // Shared limits keep the panels comparable.
    let y_max = binned
        .iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let root = BitMapBackend::new(path, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE).map_err(to_render_error)?;
    let areas = root.split_evenly((2, 2));

    for ((s, counts), area) in panels.iter().zip(&binned).zip(&areas) {
        let mut chart = ChartBuilder::on(area)
            .caption(&s.label, ("sans-serif", 35))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(edges[0]..edges[edges.len() - 1], 0.0..y_max * 1.1)
            .map_err(to_render_error)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc("occurrences")
            .x_labels(5)
            .y_labels(5)
            .draw()
            .map_err(to_render_error)?;

        let points = centers
            .iter()
            .copied()
            .zip(counts.iter().map(|c| *c as f64));
        chart
            .draw_series(LineSeries::new(
                points,
                ShapeStyle::from(&s.color).stroke_width(3),
            ))
            .map_err(to_render_error)?;
    }

    root.present().map_err(to_render_error)?;
    Ok(())
}

//
// Helpers
//

fn bin_centers(edges: &[f64]) -> Vec<f64> {
    edges
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

fn to_render_error<E: fmt::Display>(err: E) -> HistError {
    HistError::Render(err.to_string())
}
