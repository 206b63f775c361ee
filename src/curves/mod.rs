//! Interpolated execution-time curves over normalised problem size.
//!
//! Each `(matrix type, method)` series is sorted by
//! [`normalized_size`] and resampled on an even grid spanning the whole
//! dataset, so every method can be compared on the same abscissa.

mod interpolate;

pub use interpolate::LinearInterpolator;

use crate::data::{Dataset, MatrixType, Measurement, MethodId, MethodNames};
use crate::error::{Result, TopnError};
use crate::viz::{axis_range, plot_err, series_color};
use log::{debug, info};
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Default number of resampling points.
pub const DEFAULT_SAMPLES: usize = 500;

const SIZE_SCALE: f64 = 10_000.0;

/// `(dimension + topN) / 10000`
#[must_use]
pub fn normalized_size(m: &Measurement) -> f64 {
    m.size_index() as f64 / SIZE_SCALE
}

/// `samples` evenly spaced values from `start` to `end` inclusive.
#[must_use]
pub fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// One resampled method curve.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCurve {
    /// Method the curve was measured for
    pub method: MethodId,
    /// Resampled points `(normalised size, exec_time)`
    pub points: Vec<(f64, f64)>,
}

/// Resampled curves for every `(matrix type, method)` pair with enough
/// distinct sizes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecTimeCurves {
    grid: Vec<f64>,
    curves: BTreeMap<MatrixType, Vec<MethodCurve>>,
}

impl ExecTimeCurves {
    /// Interpolates every series on `samples` points spanning the global
    /// normalised size range.
    ///
    /// Series with fewer than two distinct sizes cannot be interpolated and
    /// are skipped.
    ///
    /// # Errors
    ///
    /// [`TopnError::EmptyData`] for an empty dataset, [`TopnError::InvalidConfig`]
    /// if `samples < 2`.
    pub fn build(dataset: &Dataset, samples: usize) -> Result<Self> {
        if samples < 2 {
            return Err(TopnError::invalid_config("samples", samples, ">= 2"));
        }
        if dataset.is_empty() {
            return Err(TopnError::EmptyData {
                context: format!("curve data '{}'", dataset.label()),
            });
        }

        let (lo, hi) = dataset
            .rows()
            .iter()
            .map(normalized_size)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        let grid = linspace(lo, hi, samples);

        let mut series: BTreeMap<(MatrixType, MethodId), Vec<&Measurement>> = BTreeMap::new();
        for m in dataset.rows() {
            series.entry((m.matrix_type, m.method)).or_default().push(m);
        }

        let mut curves: BTreeMap<MatrixType, Vec<MethodCurve>> = BTreeMap::new();
        for ((matrix_type, method), mut rows) in series {
            rows.sort_by(|a, b| normalized_size(a).total_cmp(&normalized_size(b)));
            let xs: Vec<f64> = rows.iter().map(|m| normalized_size(m)).collect();
            let ys: Vec<f64> = rows.iter().map(|m| m.exec_time).collect();

            let Some(interp) = LinearInterpolator::new(xs, ys) else {
                debug!(
                    "Skipping {} / method {}: fewer than two distinct sizes",
                    matrix_type, method
                );
                continue;
            };
            let points = grid.iter().map(|&x| (x, interp.eval(x))).collect();
            curves
                .entry(matrix_type)
                .or_default()
                .push(MethodCurve { method, points });
        }

        info!(
            "Interpolated {} series on {} points",
            curves.values().map(Vec::len).sum::<usize>(),
            grid.len()
        );
        Ok(Self { grid, curves })
    }

    /// Shared abscissa.
    #[must_use]
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Curves of one matrix type, sorted by method.
    #[must_use]
    pub fn for_type(&self, matrix_type: MatrixType) -> &[MethodCurve] {
        self.curves.get(&matrix_type).map_or(&[], Vec::as_slice)
    }

    /// Number of interpolated series.
    #[must_use]
    pub fn n_series(&self) -> usize {
        self.curves.values().map(Vec::len).sum()
    }
}

/// Draws a 2×3 grid with one panel per matrix type; the sixth panel
/// stays empty. All panels share the same axes ranges.
///
/// # Errors
///
/// [`TopnError::Plot`] if rendering fails.
pub fn render_grid_svg(curves: &ExecTimeCurves, path: &Path, names: &MethodNames) -> Result<()> {
    let all_points = || {
        curves
            .curves
            .values()
            .flatten()
            .flat_map(|c| c.points.iter())
    };
    let x_range = axis_range(all_points().map(|p| p.0));
    let y_range = axis_range(all_points().map(|p| p.1));

    let root = SVGBackend::new(path, (1500, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    root.draw(&Text::new(
        "Normalized Sum of Image Dimension and topN (/10,000)",
        (560, 975),
        ("sans-serif", 18).into_font(),
    ))
    .map_err(plot_err)?;
    root.draw(&Text::new(
        "Execution Time (s)",
        (8, 580),
        ("sans-serif", 18)
            .into_font()
            .transform(FontTransform::Rotate270),
    ))
    .map_err(plot_err)?;

    let inner = root.margin(10, 40, 40, 10);
    let areas = inner.split_evenly((2, 3));

    for (matrix_type, area) in MatrixType::ALL.iter().zip(areas.iter()) {
        let mut chart = ChartBuilder::on(area)
            .caption(matrix_type.name(), ("sans-serif", 16).into_font())
            .margin(8)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(plot_err)?;
        chart.configure_mesh().draw().map_err(plot_err)?;

        let type_curves = curves.for_type(*matrix_type);
        for curve in type_curves {
            let color = series_color(curve.method.class_index());
            chart
                .draw_series(LineSeries::new(
                    curve.points.iter().copied(),
                    color.stroke_width(2),
                ))
                .map_err(plot_err)?
                .label(names.name(curve.method))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        if !type_curves.is_empty() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }
    }

    root.present().map_err(plot_err)?;
    info!("Wrote interpolated curves to {}", path.display());
    Ok(())
}
