//! Tabular per-class precision/recall/F1 summary.

use super::classification::{check_inputs, compute_counts, present_labels, ClassCounts};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores of one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    /// Class index
    pub label: usize,
    /// Display name
    pub name: String,
    /// TP / (TP + FP)
    pub precision: f32,
    /// TP / (TP + FN)
    pub recall: f32,
    /// Harmonic mean of precision and recall
    pub f1_score: f32,
    /// Number of true instances
    pub support: usize,
}

/// Averaged scores over all classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AveragedScores {
    /// Averaged precision
    pub precision: f32,
    /// Averaged recall
    pub recall: f32,
    /// Averaged F1
    pub f1_score: f32,
    /// Total number of samples
    pub support: usize,
}

/// Per-class precision, recall, F1 and support, plus accuracy and
/// macro/weighted averages.
///
/// Classes are the sorted union of labels found in either input.
///
/// # Examples
///
/// ```
/// use aprender_topn::metrics::ClassificationReport;
///
/// let report = ClassificationReport::new(&[0, 1, 1], &[0, 1, 0], |l| format!("m{l}")).unwrap();
/// assert_eq!(report.classes.len(), 2);
/// assert!(report.to_string().contains("weighted avg"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// One entry per label, ascending
    pub classes: Vec<ClassScores>,
    /// Fraction of correct predictions
    pub accuracy: f32,
    /// Unweighted mean over classes
    pub macro_avg: AveragedScores,
    /// Mean weighted by support
    pub weighted_avg: AveragedScores,
}

impl ClassificationReport {
    /// Builds the report, naming each class label with `names`.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs differ in length or are empty.
    pub fn new<F>(y_pred: &[usize], y_true: &[usize], names: F) -> Result<Self>
    where
        F: Fn(usize) -> String,
    {
        check_inputs(y_pred, y_true)?;
        let labels = present_labels(y_pred, y_true);
        let counts = compute_counts(y_pred, y_true, &labels);

        let classes: Vec<ClassScores> = labels
            .iter()
            .zip(&counts)
            .map(|(&label, c)| ClassScores {
                label,
                name: names(label),
                precision: c.precision(),
                recall: c.recall(),
                f1_score: c.f1(),
                support: c.support,
            })
            .collect();

        let correct = y_pred.iter().zip(y_true).filter(|(p, t)| p == t).count();
        let total = y_true.len();

        Ok(Self {
            macro_avg: macro_average(&classes, total),
            weighted_avg: weighted_average(&counts, total),
            accuracy: correct as f32 / total as f32,
            classes,
        })
    }

    /// Total number of samples.
    #[must_use]
    pub fn support(&self) -> usize {
        self.macro_avg.support
    }
}

fn macro_average(classes: &[ClassScores], total: usize) -> AveragedScores {
    let n = classes.len().max(1) as f32;
    AveragedScores {
        precision: classes.iter().map(|c| c.precision).sum::<f32>() / n,
        recall: classes.iter().map(|c| c.recall).sum::<f32>() / n,
        f1_score: classes.iter().map(|c| c.f1_score).sum::<f32>() / n,
        support: total,
    }
}

fn weighted_average(counts: &[ClassCounts], total: usize) -> AveragedScores {
    let weight = |c: &ClassCounts| c.support as f32 / total as f32;
    AveragedScores {
        precision: counts.iter().map(|c| c.precision() * weight(c)).sum(),
        recall: counts.iter().map(|c| c.recall() * weight(c)).sum(),
        f1_score: counts.iter().map(|c| c.f1() * weight(c)).sum(),
        support: total,
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const AVG_LABEL: &str = "weighted avg";
        let width = self
            .classes
            .iter()
            .map(|c| c.name.len())
            .chain(std::iter::once(AVG_LABEL.len()))
            .max()
            .unwrap_or(AVG_LABEL.len());

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.name, c.precision, c.recall, c.f1_score, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support()
        )?;
        for (label, avg) in [("macro avg", &self.macro_avg), (AVG_LABEL, &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                label, avg.precision, avg.recall, avg.f1_score, avg.support
            )?;
        }
        Ok(())
    }
}
