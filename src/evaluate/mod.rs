//! Scoring predictions against group labels and mapping them back onto
//! the row-level dataset.

use crate::data::{Measurement, MethodId, MethodNames};
use crate::error::{Result, TopnError};
use crate::grouping::GroupedDataset;
use crate::metrics::{accuracy, confusion_labels, confusion_matrix, ClassificationReport};
use crate::primitives::Matrix;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accuracy, per-class report and confusion matrix for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of groups predicted correctly
    pub accuracy: f32,
    /// Per-method precision/recall/F1
    pub report: ClassificationReport,
    /// `confusion[true][predicted]`, indexed by position in `labels`
    pub confusion: Matrix<usize>,
    /// Methods labelling the confusion rows and columns, ascending
    pub labels: Vec<MethodId>,
}

impl Evaluation {
    /// Scores one prediction per group against the true best methods.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length or are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use aprender_topn::data::{MethodId, MethodNames};
    /// use aprender_topn::evaluate::Evaluation;
    ///
    /// let truth = [MethodId(0), MethodId(1), MethodId(1)];
    /// let eval = Evaluation::compute(&truth, &truth, &MethodNames::default()).unwrap();
    /// assert_eq!(eval.summary_line(), "Accuracy: 100.00%");
    /// ```
    pub fn compute(predictions: &[MethodId], truth: &[MethodId], names: &MethodNames) -> Result<Self> {
        let y_pred: Vec<usize> = predictions.iter().map(|m| m.class_index()).collect();
        let y_true: Vec<usize> = truth.iter().map(|m| m.class_index()).collect();

        let accuracy = accuracy(&y_pred, &y_true)?;
        let report = ClassificationReport::new(&y_pred, &y_true, |label| {
            names.name(MethodId::from_class_index(label))
        })?;
        let confusion = confusion_matrix(&y_pred, &y_true)?;
        let labels = confusion_labels(&y_pred, &y_true)
            .into_iter()
            .map(MethodId::from_class_index)
            .collect();

        Ok(Self {
            accuracy,
            report,
            confusion,
            labels,
        })
    }

    /// Accuracy in percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> f32 {
        self.accuracy * 100.0
    }

    /// `Accuracy: xx.xx%`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("Accuracy: {:.2}%", self.accuracy_percent())
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary_line())?;
        write!(f, "{}", self.report)
    }
}

/// Repeats each group prediction `group_size` times so it lines up with
/// the rows of the dataset.
///
/// # Errors
///
/// [`TopnError::Alignment`] if the result would not have `expected_rows`
/// entries.
///
/// # Examples
///
/// ```
/// use aprender_topn::data::MethodId;
/// use aprender_topn::evaluate::repeat_predictions;
///
/// let rows = repeat_predictions(&[MethodId(0), MethodId(1), MethodId(0)], 2, 6).unwrap();
/// assert_eq!(rows.len(), 6);
/// assert_eq!(rows[3], MethodId(1));
/// ```
pub fn repeat_predictions(
    predictions: &[MethodId],
    group_size: usize,
    expected_rows: usize,
) -> Result<Vec<MethodId>> {
    let actual = predictions.len() * group_size;
    if actual != expected_rows {
        return Err(TopnError::Alignment {
            expected: expected_rows,
            actual,
        });
    }
    Ok(predictions
        .iter()
        .flat_map(|&p| std::iter::repeat(p).take(group_size))
        .collect())
}

/// A dataset row with its group's best offset and predicted method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// The underlying benchmark row
    pub measurement: Measurement,
    /// Position of the fastest row within the group
    pub best_offset: usize,
    /// Method predicted for the group
    pub predicted: MethodId,
}

/// Joins per-group predictions and best offsets onto every row of the
/// grouped dataset.
///
/// # Errors
///
/// [`TopnError::Alignment`] if `predictions` does not hold exactly one
/// entry per group.
pub fn annotate(grouped: &GroupedDataset, predictions: &[MethodId]) -> Result<Vec<AnnotatedRow>> {
    let rows = grouped.dataset().rows();
    let repeated = repeat_predictions(predictions, grouped.group_size(), rows.len())?;
    let offsets = grouped.best_offsets_per_row();
    debug!("Annotating {} rows of '{}'", rows.len(), grouped.dataset().label());

    Ok(rows
        .iter()
        .zip(offsets)
        .zip(repeated)
        .map(|((&measurement, best_offset), predicted)| AnnotatedRow {
            measurement,
            best_offset,
            predicted,
        })
        .collect())
}
