//! Random forest advisor behind the [`Classifier`] trait.
//!
//! [`ForestAdvisor`] wraps [`RandomForestClassifier`] and adds what the
//! raw forest does not know about: the matrix types seen during training
//! and a policy for configurations whose type was never seen.

use crate::data::{MatrixType, MethodId};
use crate::error::{Result, TopnError};
use crate::features::{encode_rows, FeatureRow, FeatureTable, FEATURE_NAMES};
use crate::traits::Classifier;
use crate::tree::RandomForestClassifier;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What to do with a prediction request for a matrix type absent from
/// training.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseenTypePolicy {
    /// Fail with [`TopnError::UnseenCategory`].
    #[default]
    Reject,
    /// Answer with the most frequent training label.
    MajorityFallback,
}

/// Forest-backed best-method classifier.
///
/// Defaults: 100 trees, seed 42, unlimited depth, unseen types rejected.
#[derive(Debug, Clone)]
pub struct ForestAdvisor {
    n_estimators: usize,
    max_depth: Option<usize>,
    seed: u64,
    unseen: UnseenTypePolicy,
    forest: Option<RandomForestClassifier>,
    seen_types: BTreeSet<MatrixType>,
    majority: Option<MethodId>,
}

impl ForestAdvisor {
    /// Advisor with default hyperparameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            seed: 42,
            unseen: UnseenTypePolicy::Reject,
            forest: None,
            seen_types: BTreeSet::new(),
            majority: None,
        }
    }

    /// Sets the number of trees.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Limits tree depth; `None` grows trees until leaves are pure.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the base seed for bootstraps and feature subsets.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the unseen matrix type policy.
    #[must_use]
    pub fn with_unseen_policy(mut self, policy: UnseenTypePolicy) -> Self {
        self.unseen = policy;
        self
    }

    /// Matrix types present in the training table.
    #[must_use]
    pub fn seen_types(&self) -> &BTreeSet<MatrixType> {
        &self.seen_types
    }

    /// Most frequent training label, ties to the smallest id.
    #[must_use]
    pub fn majority_label(&self) -> Option<MethodId> {
        self.majority
    }

    /// The fitted forest, if any.
    #[must_use]
    pub fn forest(&self) -> Option<&RandomForestClassifier> {
        self.forest.as_ref()
    }

    /// Feature importances paired with feature names.
    #[must_use]
    pub fn feature_importances(&self) -> Option<Vec<(String, f32)>> {
        let importances = self.forest.as_ref()?.feature_importances()?;
        Some(
            FEATURE_NAMES
                .iter()
                .zip(importances)
                .map(|(name, value)| ((*name).to_string(), value))
                .collect(),
        )
    }

    fn fitted_forest(&self) -> Result<&RandomForestClassifier> {
        self.forest.as_ref().ok_or_else(|| TopnError::NotFitted {
            operation: "predict".to_string(),
        })
    }
}

impl Default for ForestAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

fn most_frequent(labels: &[MethodId]) -> Option<MethodId> {
    let mut counts: BTreeMap<MethodId, usize> = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut best: Option<(MethodId, usize)> = None;
    for (label, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

impl Classifier for ForestAdvisor {
    fn fit(&mut self, table: &FeatureTable) -> Result<()> {
        if table.is_empty() {
            return Err(TopnError::EmptyData {
                context: "training feature table".into(),
            });
        }

        let mut forest = RandomForestClassifier::new(self.n_estimators).with_random_state(self.seed);
        if let Some(depth) = self.max_depth {
            forest = forest.with_max_depth(depth);
        }

        info!(
            "Fitting random forest: {} trees, {} groups, seed {}",
            self.n_estimators,
            table.len(),
            self.seed
        );
        forest.fit(&table.to_matrix(), &table.class_labels())?;

        self.seen_types = table.rows().iter().map(|r| r.matrix_type).collect();
        self.majority = most_frequent(table.labels());
        self.forest = Some(forest);
        debug!("Training types: {:?}", self.seen_types);
        Ok(())
    }

    fn predict_one(&self, row: &FeatureRow) -> Result<MethodId> {
        let forest = self.fitted_forest()?;

        if !self.seen_types.contains(&row.matrix_type) {
            match (self.unseen, self.majority) {
                (UnseenTypePolicy::MajorityFallback, Some(label)) => {
                    warn!(
                        "Matrix type '{}' unseen in training; falling back to majority label {}",
                        row.matrix_type, label
                    );
                    return Ok(label);
                }
                _ => {
                    return Err(TopnError::UnseenCategory {
                        matrix_type: row.matrix_type.name().to_string(),
                    })
                }
            }
        }

        let predicted = forest.predict(&encode_rows(std::slice::from_ref(row)))?;
        predicted
            .first()
            .map(|&class| MethodId::from_class_index(class))
            .ok_or_else(|| TopnError::DimensionMismatch {
                expected: "1 prediction".into(),
                actual: "0 predictions".into(),
            })
    }
}

#[cfg(test)]
mod tests;
