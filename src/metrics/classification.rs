//! Classification metrics for evaluating classifier performance.
//!
//! Provides accuracy, precision, recall, F1-score, and confusion matrix
//! computation for multi-class classification tasks. Labels are class
//! indices; averages run over the labels that appear in either input.

use crate::error::{Result, TopnError};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Averaging strategy for multi-class metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Average {
    /// Calculate metrics for each label, return unweighted mean.
    Macro,
    /// Calculate metrics globally by counting total TP, FP, FN.
    Micro,
    /// Weighted mean by support (number of true instances per label).
    Weighted,
}

/// Per-label counts shared by precision, recall and F1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ClassCounts {
    pub tp: usize,
    pub fp: usize,
    pub fn_: usize,
    pub support: usize,
}

impl ClassCounts {
    pub(crate) fn precision(&self) -> f32 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub(crate) fn recall(&self) -> f32 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub(crate) fn f1(&self) -> f32 {
        class_f1(self.tp, self.fp, self.fn_)
    }
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

pub(crate) fn check_inputs(y_pred: &[usize], y_true: &[usize]) -> Result<()> {
    if y_pred.len() != y_true.len() {
        return Err(TopnError::DimensionMismatch {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(TopnError::EmptyData {
            context: "metric inputs".into(),
        });
    }
    Ok(())
}

/// Sorted union of labels present in either input.
pub(crate) fn present_labels(y_pred: &[usize], y_true: &[usize]) -> Vec<usize> {
    let mut labels: Vec<usize> = y_true.iter().chain(y_pred).copied().collect();
    labels.sort_unstable();
    labels.dedup();
    labels
}

/// Counts TP, FP, FN and support for each label in `labels`.
pub(crate) fn compute_counts(
    y_pred: &[usize],
    y_true: &[usize],
    labels: &[usize],
) -> Vec<ClassCounts> {
    let mut counts = vec![ClassCounts::default(); labels.len()];
    let slot = |label: usize| labels.binary_search(&label).ok();

    for (&p, &t) in y_pred.iter().zip(y_true) {
        if let Some(i) = slot(t) {
            counts[i].support += 1;
            if p == t {
                counts[i].tp += 1;
            } else {
                counts[i].fn_ += 1;
            }
        }
        if p != t {
            if let Some(i) = slot(p) {
                counts[i].fp += 1;
            }
        }
    }
    counts
}

/// F1 from raw counts: `2·TP / (2·TP + FP + FN)`, or 0 when undefined.
fn class_f1(tp: usize, fp: usize, fn_: usize) -> f32 {
    ratio(2 * tp, 2 * tp + fp + fn_)
}

fn average_by(counts: &[ClassCounts], average: Average, per_class: impl Fn(&ClassCounts) -> f32) -> f32 {
    match average {
        Average::Macro => {
            if counts.is_empty() {
                return 0.0;
            }
            counts.iter().map(&per_class).sum::<f32>() / counts.len() as f32
        }
        Average::Weighted => {
            let total: usize = counts.iter().map(|c| c.support).sum();
            if total == 0 {
                return 0.0;
            }
            counts
                .iter()
                .map(|c| per_class(c) * c.support as f32 / total as f32)
                .sum()
        }
        Average::Micro => {
            let pooled = counts.iter().fold(ClassCounts::default(), |acc, c| ClassCounts {
                tp: acc.tp + c.tp,
                fp: acc.fp + c.fp,
                fn_: acc.fn_ + c.fn_,
                support: acc.support + c.support,
            });
            per_class(&pooled)
        }
    }
}

/// Compute classification accuracy.
///
/// accuracy = `correct_predictions` / `total_predictions`
///
/// # Errors
///
/// Returns an error if the inputs differ in length or are empty.
///
/// # Examples
///
/// ```
/// use aprender_topn::metrics::classification::accuracy;
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let acc = accuracy(&y_pred, &y_true).unwrap();
/// assert!((acc - 0.333333).abs() < 0.001);
/// ```
pub fn accuracy(y_pred: &[usize], y_true: &[usize]) -> Result<f32> {
    check_inputs(y_pred, y_true)?;

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    Ok(correct as f32 / y_true.len() as f32)
}

/// Compute precision score.
///
/// precision = TP / (TP + FP)
///
/// # Errors
///
/// Returns an error if the inputs differ in length or are empty.
///
/// # Examples
///
/// ```
/// use aprender_topn::metrics::classification::{precision, Average};
///
/// let y_true = vec![0, 1, 2, 0, 1, 2];
/// let y_pred = vec![0, 2, 1, 0, 0, 1];
/// let prec = precision(&y_pred, &y_true, Average::Macro).unwrap();
/// assert!(prec >= 0.0 && prec <= 1.0);
/// ```
pub fn precision(y_pred: &[usize], y_true: &[usize], average: Average) -> Result<f32> {
    check_inputs(y_pred, y_true)?;
    let labels = present_labels(y_pred, y_true);
    let counts = compute_counts(y_pred, y_true, &labels);
    Ok(average_by(&counts, average, ClassCounts::precision))
}

/// Compute recall score.
///
/// recall = TP / (TP + FN)
///
/// # Errors
///
/// Returns an error if the inputs differ in length or are empty.
pub fn recall(y_pred: &[usize], y_true: &[usize], average: Average) -> Result<f32> {
    check_inputs(y_pred, y_true)?;
    let labels = present_labels(y_pred, y_true);
    let counts = compute_counts(y_pred, y_true, &labels);
    Ok(average_by(&counts, average, ClassCounts::recall))
}

/// Compute F1 score.
///
/// F1 = 2 * (precision * recall) / (precision + recall)
///
/// # Errors
///
/// Returns an error if the inputs differ in length or are empty.
///
/// # Examples
///
/// ```
/// use aprender_topn::metrics::classification::{f1_score, Average};
///
/// let y_true = vec![1, 0, 1, 0];
/// let y_pred = vec![1, 1, 0, 0];
/// let f1 = f1_score(&y_pred, &y_true, Average::Macro).unwrap();
/// assert!((f1 - 0.5).abs() < 1e-5);
/// ```
pub fn f1_score(y_pred: &[usize], y_true: &[usize], average: Average) -> Result<f32> {
    check_inputs(y_pred, y_true)?;
    let labels = present_labels(y_pred, y_true);
    let counts = compute_counts(y_pred, y_true, &labels);
    Ok(average_by(&counts, average, ClassCounts::f1))
}

/// Compute confusion matrix.
///
/// Rows and columns follow the sorted union of labels present in either
/// input (see [`confusion_labels`]); element `[i,j]` counts samples whose
/// true label is the `i`-th label and whose prediction is the `j`-th.
///
/// # Errors
///
/// Returns an error if the inputs differ in length or are empty.
///
/// # Examples
///
/// ```
/// use aprender_topn::metrics::classification::confusion_matrix;
///
/// let y_true = vec![0, 0, 1, 1, 2, 2];
/// let y_pred = vec![0, 1, 1, 1, 2, 0];
/// let cm = confusion_matrix(&y_pred, &y_true).unwrap();
/// assert_eq!(cm.shape(), (3, 3));
/// assert_eq!(cm.get(2, 0), 1);
/// ```
pub fn confusion_matrix(y_pred: &[usize], y_true: &[usize]) -> Result<Matrix<usize>> {
    check_inputs(y_pred, y_true)?;

    let labels = present_labels(y_pred, y_true);
    let n_classes = labels.len();
    let slot = |label: usize| labels.binary_search(&label).unwrap_or_default();

    let mut data = vec![0usize; n_classes * n_classes];
    for (&pred, &true_label) in y_pred.iter().zip(y_true.iter()) {
        data[slot(true_label) * n_classes + slot(pred)] += 1;
    }

    Matrix::from_vec(n_classes, n_classes, data).map_err(|msg| TopnError::DimensionMismatch {
        expected: format!("{n_classes}x{n_classes} confusion matrix"),
        actual: msg.to_string(),
    })
}

/// Row and column labels of [`confusion_matrix`] for the same inputs.
///
/// # Examples
///
/// ```
/// use aprender_topn::metrics::classification::confusion_labels;
///
/// assert_eq!(confusion_labels(&[7, 1_000_000], &[7, 7]), vec![7, 1_000_000]);
/// ```
#[must_use]
pub fn confusion_labels(y_pred: &[usize], y_true: &[usize]) -> Vec<usize> {
    present_labels(y_pred, y_true)
}
