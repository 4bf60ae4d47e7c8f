use plotters::prelude::*;
use std::path::Path;

use crate::error::{Error, Result};
use crate::runner::record::PredictionLog;

/// Text of a usage chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
}

impl ChartStyle {
    pub const DASHBOARD: ChartStyle = ChartStyle {
        title: "Live Predicted Water Usage",
        x_desc: "Time (s)",
        y_desc: "Predicted Usage (Litres)",
    };

    pub const LIVE: ChartStyle = ChartStyle {
        title: "Live Water Consumption Prediction - Pune",
        x_desc: "Time",
        y_desc: "Predicted Water Usage (MLD)",
    };
}

fn value_bounds(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad, hi + pad)
}

/// Draws the full history of `log` into a PNG at `path`, replacing any
/// previous frame.
pub fn create_usage_plot(log: &PredictionLog, style: &ChartStyle, path: &Path) -> Result<()> {
    let labels: Vec<String> = log.records().iter().map(|r| r.time_label()).collect();
    let values: Vec<f64> = log.predictions().collect();
    let (y_lo, y_hi) = value_bounds(&values);
    let x_max = values.len().max(1);

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(style.title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..x_max, y_lo..y_hi)
        .map_err(Error::plot)?;

    let label_for = |i: &usize| labels.get(*i).cloned().unwrap_or_default();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(x_max.min(12))
        .x_label_formatter(&label_for)
        .x_desc(style.x_desc)
        .y_desc(style.y_desc)
        .draw()
        .map_err(Error::plot)?;

    let points: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(Error::plot)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))
        .map_err(Error::plot)?;

    root.present().map_err(Error::plot)?;
    Ok(())
}
