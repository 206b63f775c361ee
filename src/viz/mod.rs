//! Actual versus predicted execution time curves.
//!
//! [`PredictionCurves::build`] turns annotated test rows into one panel per
//! matrix type: a solid series per benchmarked method and a dashed series
//! following the execution time of whichever method the model picked.
//! [`render_svg`] draws them, [`write_series_csv`] exports the same points.

mod svg;

pub(crate) use svg::{axis_range, plot_err, series_color};
pub use svg::render_svg;

use crate::data::{Dataset, MatrixType, MethodId, MethodNames};
use crate::error::{Result, TopnError};
use crate::evaluate::AnnotatedRow;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the dashed series.
pub const PREDICTED_SERIES: &str = "Predicted Best Algorithm";

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label
    pub name: String,
    /// Source method, `None` for the predicted-best series
    pub method: Option<MethodId>,
    /// `(dimension + topN, exec_time)` in row order
    pub points: Vec<(f64, f64)>,
}

/// All series of one matrix type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypePanel {
    /// Matrix type shown in this panel
    pub matrix_type: MatrixType,
    /// Measured series, sorted by method id
    pub actual: Vec<Series>,
    /// Time of the predicted method per configuration
    pub predicted: Series,
}

impl TypePanel {
    /// Panel title.
    #[must_use]
    pub fn title(&self) -> String {
        format!(
            "Type {}: Real vs Predicted Execution Time",
            self.matrix_type.name()
        )
    }

    /// Actual series followed by the predicted one.
    pub fn all_series(&self) -> impl Iterator<Item = &Series> {
        self.actual.iter().chain(std::iter::once(&self.predicted))
    }
}

/// Per-type comparison curves, types in ascending code order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionCurves {
    panels: Vec<TypePanel>,
}

impl PredictionCurves {
    /// Builds the curves from annotated rows.
    ///
    /// The predicted series takes, for every row, the execution time of the
    /// first dataset row with the same configuration and the predicted
    /// method.
    ///
    /// # Errors
    ///
    /// [`TopnError::Lookup`] if no such row exists.
    pub fn build(dataset: &Dataset, annotated: &[AnnotatedRow]) -> Result<Self> {
        Self::build_named(dataset, annotated, &MethodNames::default())
    }

    /// Like [`PredictionCurves::build`], labelling methods with `names`.
    ///
    /// # Errors
    ///
    /// [`TopnError::Lookup`] if a predicted configuration has no row.
    pub fn build_named(
        dataset: &Dataset,
        annotated: &[AnnotatedRow],
        names: &MethodNames,
    ) -> Result<Self> {
        let mut by_type: BTreeMap<MatrixType, Vec<&AnnotatedRow>> = BTreeMap::new();
        for row in annotated {
            by_type.entry(row.measurement.matrix_type).or_default().push(row);
        }

        let mut panels = Vec::with_capacity(by_type.len());
        for (matrix_type, rows) in by_type {
            let mut per_method: BTreeMap<MethodId, Vec<(f64, f64)>> = BTreeMap::new();
            for row in &rows {
                let m = &row.measurement;
                per_method
                    .entry(m.method)
                    .or_default()
                    .push((m.size_index() as f64, m.exec_time));
            }
            let actual = per_method
                .into_iter()
                .map(|(method, points)| Series {
                    name: names.name(method),
                    method: Some(method),
                    points,
                })
                .collect();

            let predicted_points = rows
                .iter()
                .map(|row| {
                    let m = &row.measurement;
                    dataset
                        .find(m.key(), row.predicted)
                        .map(|hit| (m.size_index() as f64, hit.exec_time))
                        .ok_or_else(|| TopnError::Lookup {
                            matrix_type: matrix_type.name().to_string(),
                            dimension: m.dimension,
                            top_n: m.top_n,
                            method: row.predicted.0,
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            debug!(
                "Panel {}: {} rows, {} predicted points",
                matrix_type,
                rows.len(),
                predicted_points.len()
            );
            panels.push(TypePanel {
                matrix_type,
                actual,
                predicted: Series {
                    name: PREDICTED_SERIES.to_string(),
                    method: None,
                    points: predicted_points,
                },
            });
        }

        Ok(Self { panels })
    }

    /// Panels in type order.
    #[must_use]
    pub fn panels(&self) -> &[TypePanel] {
        &self.panels
    }

    /// Panel for one type.
    #[must_use]
    pub fn panel(&self, matrix_type: MatrixType) -> Option<&TypePanel> {
        self.panels.iter().find(|p| p.matrix_type == matrix_type)
    }

    /// True if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }
}

#[derive(Serialize)]
struct PointRecord<'a> {
    #[serde(rename = "type")]
    matrix_type: &'a str,
    series: &'a str,
    x: f64,
    y: f64,
}

/// Writes every plotted point as `type,series,x,y`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_series_csv(curves: &PredictionCurves, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut written = 0usize;
    for panel in curves.panels() {
        for series in panel.all_series() {
            for &(x, y) in &series.points {
                writer.serialize(PointRecord {
                    matrix_type: panel.matrix_type.name(),
                    series: &series.name,
                    x,
                    y,
                })?;
                written += 1;
            }
        }
    }
    writer.flush()?;
    info!("Wrote {} plotted points to {}", written, path.display());
    Ok(())
}

#[cfg(test)]
mod tests;
