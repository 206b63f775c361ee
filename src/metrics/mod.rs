//! Evaluation metrics for classifiers.
//!
//! Includes accuracy, precision, recall, F1-score, confusion matrix and a
//! per-class [`ClassificationReport`].

pub mod classification;
mod report;

pub use classification::{
    accuracy, confusion_labels, confusion_matrix, f1_score, precision, recall, Average,
};
pub use report::{AveragedScores, ClassScores, ClassificationReport};
