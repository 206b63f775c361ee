//! Core traits for the best-method classifier.
//!
//! The pipeline only talks to models through [`Classifier`], so any
//! multiclass model over [`FeatureRow`]s can stand in for the forest.

use crate::data::MethodId;
use crate::error::Result;
use crate::features::{FeatureRow, FeatureTable};

/// Supervised model mapping a configuration to its fastest method.
///
/// # Examples
///
/// ```
/// use aprender_topn::prelude::*;
///
/// let table = FeatureTable::from_parts(
///     vec![
///         FeatureRow::new(MatrixType::Random, 10, 5),
///         FeatureRow::new(MatrixType::Random, 1000, 5),
///     ],
///     vec![MethodId(1), MethodId(0)],
/// );
///
/// let mut model = ForestAdvisor::new().with_n_estimators(10);
/// model.fit(&table).unwrap();
/// let predictions = model.predict(table.rows()).unwrap();
/// assert_eq!(predictions.len(), 2);
/// ```
pub trait Classifier {
    /// Fits the model to one labelled row per group.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is empty or the model rejects its
    /// hyperparameters.
    fn fit(&mut self, table: &FeatureTable) -> Result<()>;

    /// Predicts the fastest method for one configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or cannot handle `row`.
    fn predict_one(&self, row: &FeatureRow) -> Result<MethodId>;

    /// Predicts every row in order.
    ///
    /// # Errors
    ///
    /// Fails on the first row [`Classifier::predict_one`] rejects.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<MethodId>> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}
