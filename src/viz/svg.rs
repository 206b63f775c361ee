//! SVG rendering with plotters.

use super::PredictionCurves;
use crate::error::{Result, TopnError};
use log::info;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const PANEL_WIDTH: u32 = 640;
const PANEL_HEIGHT: u32 = 520;

const SERIES_COLORS: [RGBColor; 6] = [
    BLUE,
    GREEN,
    RGBColor(214, 39, 40),
    RGBColor(204, 170, 0),
    BLACK,
    RGBColor(128, 128, 128),
];

pub(crate) fn plot_err<E: std::fmt::Display>(err: E) -> TopnError {
    TopnError::Plot(err.to_string())
}

pub(crate) fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

/// Padded `min..max` over `values`; a flat or empty input still yields a
/// drawable range.
pub(crate) fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

/// Renders one panel per matrix type in a single row.
///
/// Measured methods are solid lines with markers; the predicted-best curve
/// is a dashed red line.
///
/// # Errors
///
/// [`TopnError::Plot`] if there is nothing to draw or rendering fails.
pub fn render_svg(curves: &PredictionCurves, path: &Path) -> Result<()> {
    let panels = curves.panels();
    if panels.is_empty() {
        return Err(TopnError::Plot("no panels to render".into()));
    }

    let width = PANEL_WIDTH * panels.len() as u32;
    let root = SVGBackend::new(path, (width, PANEL_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let areas = root.split_evenly((1, panels.len()));

    for (panel, area) in panels.iter().zip(areas.iter()) {
        let points = || panel.all_series().flat_map(|s| s.points.iter());
        let x_range = axis_range(points().map(|p| p.0));
        let y_range = axis_range(points().map(|p| p.1));

        let mut chart = ChartBuilder::on(area)
            .caption(panel.title(), ("sans-serif", 16).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc("Unique Index (Dimension + topN)")
            .y_desc("Execution Time")
            .draw()
            .map_err(plot_err)?;

        for (i, series) in panel.actual.iter().enumerate() {
            let color = series_color(i);
            chart
                .draw_series(
                    LineSeries::new(series.points.iter().copied(), color.stroke_width(2))
                        .point_size(3),
                )
                .map_err(plot_err)?
                .label(series.name.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .draw_series(DashedLineSeries::new(
                panel.predicted.points.iter().copied(),
                8,
                4,
                RED.stroke_width(1),
            ))
            .map_err(plot_err)?
            .label(panel.predicted.name.clone())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    info!("Wrote prediction plot to {}", path.display());
    Ok(())
}
