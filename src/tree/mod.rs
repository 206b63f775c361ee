//! Decision tree and random forest classifiers.
//!
//! This module implements:
//! - CART (Classification and Regression Trees) using Gini impurity
//! - Random Forest ensemble classifier (bootstrap + random feature subsets)
//!
//! # Example
//!
//! ```
//! use aprender_topn::primitives::Matrix;
//! use aprender_topn::tree::RandomForestClassifier;
//!
//! let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1");
//! let y = vec![0, 0, 1, 1];
//!
//! let mut forest = RandomForestClassifier::new(10).with_random_state(42);
//! forest.fit(&x, &y).expect("fit should succeed");
//! let predictions = forest.predict(&x).expect("fitted");
//! assert_eq!(predictions.len(), 4);
//! ```

mod helpers;

pub use helpers::{gini_impurity, gini_split};

use crate::error::{Result, TopnError};
use crate::primitives::Matrix;
use helpers::{
    accumulate_importances, bootstrap_sample, build_tree, encode_labels, make_rng, GrowParams,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Internal node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Training samples that reached this node
    pub n_samples: usize,
    /// Gini decrease of the split weighted by `n_samples`
    pub impurity_decrease: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Predicted class, as a position in the fitted classifier's `classes()`
    pub class_label: usize,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class prediction
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Number of leaves below (and including) this node.
    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Node(node) => node.left.n_leaves() + node.right.n_leaves(),
        }
    }

    fn classify(&self, sample: &[f32]) -> usize {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf.class_label,
                TreeNode::Node(internal) => {
                    node = if sample[internal.feature_idx] <= internal.threshold {
                        &internal.left
                    } else {
                        &internal.right
                    };
                }
            }
        }
    }
}

fn validate_training_data(x: &Matrix<f32>, y: &[usize]) -> Result<()> {
    let (n_rows, n_cols) = x.shape();
    if n_rows != y.len() {
        return Err(TopnError::DimensionMismatch {
            expected: format!("{n_rows} labels"),
            actual: format!("{} labels", y.len()),
        });
    }
    if n_rows == 0 || n_cols == 0 {
        return Err(TopnError::EmptyData {
            context: "cannot fit a tree with zero samples or zero features".to_string(),
        });
    }
    Ok(())
}

fn check_feature_count(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(TopnError::DimensionMismatch {
            expected: format!("{expected} features"),
            actual: format!("{actual} features"),
        })
    }
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity for splitting criterion and builds trees recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: Option<usize>,
    random_state: Option<u64>,
    n_features: Option<usize>,
    classes: Vec<usize>,
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            random_state: None,
            n_features: None,
            classes: Vec::new(),
        }
    }

    /// Sets the maximum depth of the tree (root has depth 0).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the minimum number of samples required to split a node.
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Considers only a random subset of `k` features at each split.
    pub fn with_max_features(mut self, k: usize) -> Self {
        self.max_features = Some(k);
        self
    }

    /// Seeds the feature subsampling.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Fits the decision tree to training data.
    ///
    /// # Arguments
    ///
    /// * `x` - Training features (n_samples × n_features)
    /// * `y` - Training labels (n_samples class ids, any values)
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` disagree in length or are empty.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        validate_training_data(x, y)?;
        let (classes, encoded) = encode_labels(y);
        let indices: Vec<usize> = (0..y.len()).collect();
        self.fit_indices(x, &encoded, &indices, classes)
    }

    /// Fits on a subset (possibly with repeats) of the rows of `x`.
    ///
    /// `encoded` holds positions into `classes`.
    fn fit_indices(
        &mut self,
        x: &Matrix<f32>,
        encoded: &[usize],
        indices: &[usize],
        classes: Vec<usize>,
    ) -> Result<()> {
        if indices.is_empty() {
            return Err(TopnError::EmptyData {
                context: "cannot fit a tree with zero samples".to_string(),
            });
        }
        let params = GrowParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: self.max_features,
            n_classes: classes.len(),
        };
        let mut rng = make_rng(self.random_state);
        self.n_features = Some(x.n_cols());
        self.classes = classes;
        self.tree = Some(build_tree(x, encoded, indices, 0, &params, &mut rng));
        Ok(())
    }

    /// Distinct training labels, ascending.
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn decode(&self, class: usize) -> usize {
        self.classes.get(class).copied().unwrap_or(class)
    }

    /// Predicts class labels for samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the feature count
    /// differs from training.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let tree = self.fitted_tree("predict")?;
        check_feature_count(self.n_features.unwrap_or(0), x.n_cols())?;
        Ok((0..x.n_rows())
            .map(|row| self.decode(tree.classify(x.row(row))))
            .collect())
    }

    /// Predicts the class label for a single sample.
    ///
    /// # Errors
    ///
    /// Same as [`DecisionTreeClassifier::predict`].
    pub fn predict_one(&self, sample: &[f32]) -> Result<usize> {
        let tree = self.fitted_tree("predict_one")?;
        check_feature_count(self.n_features.unwrap_or(0), sample.len())?;
        Ok(self.decode(tree.classify(sample)))
    }

    /// Computes the accuracy score on test data.
    ///
    /// # Errors
    ///
    /// Same as [`DecisionTreeClassifier::predict`].
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        let predictions = self.predict(x)?;
        crate::metrics::classification::accuracy(&predictions, y)
    }

    /// Depth of the fitted tree.
    pub fn depth(&self) -> Option<usize> {
        self.tree.as_ref().map(TreeNode::depth)
    }

    /// Root node of the fitted tree.
    pub fn root(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    fn fitted_tree(&self, operation: &str) -> Result<&TreeNode> {
        self.tree.as_ref().ok_or_else(|| TopnError::NotFitted {
            operation: operation.to_string(),
        })
    }
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Random Forest classifier - an ensemble of decision trees.
///
/// Each tree is trained on a bootstrap sample and considers a random subset
/// of features at every split (default `ceil(sqrt(n_features))`).
/// Predictions are majority votes; tied votes go to the smallest class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    max_features: Option<usize>,
    random_state: Option<u64>,
    n_features: Option<usize>,
    classes: Vec<usize>,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier.
    ///
    /// # Arguments
    ///
    /// * `n_estimators` - Number of trees in the forest
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            max_features: None,
            random_state: None,
            n_features: None,
            classes: Vec::new(),
        }
    }

    /// Sets the maximum depth for each tree.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Overrides the number of features considered per split.
    pub fn with_max_features(mut self, k: usize) -> Self {
        self.max_features = Some(k);
        self
    }

    /// Sets the random state for reproducibility.
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Number of trees requested.
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Number of distinct labels seen during training.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Distinct training labels, ascending; the column order of
    /// [`RandomForestClassifier::predict_proba`].
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Fits the random forest to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_estimators` is zero or the data is invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(TopnError::invalid_config("n_estimators", 0, ">= 1"));
        }
        validate_training_data(x, y)?;

        let (n_samples, n_features) = x.shape();
        let (classes, encoded) = encode_labels(y);
        let max_features = self
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize)
            .clamp(1, n_features);

        self.trees = Vec::with_capacity(self.n_estimators);
        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s.wrapping_add(i as u64));
            let bootstrap_indices = bootstrap_sample(n_samples, seed);

            let mut tree = DecisionTreeClassifier::new().with_max_features(max_features);
            if let Some(max_depth) = self.max_depth {
                tree = tree.with_max_depth(max_depth);
            }
            if let Some(s) = seed {
                tree = tree.with_random_state(s);
            }
            tree.fit_indices(x, &encoded, &bootstrap_indices, classes.clone())?;
            self.trees.push(tree);
        }

        self.n_features = Some(n_features);
        self.classes = classes;
        Ok(())
    }

    /// Per-tree predictions, `votes[tree][sample]`.
    fn tree_votes(&self, x: &Matrix<f32>) -> Result<Vec<Vec<usize>>> {
        if self.trees.is_empty() {
            return Err(TopnError::NotFitted {
                operation: "predict".to_string(),
            });
        }
        check_feature_count(self.n_features.unwrap_or(0), x.n_cols())?;
        self.trees.iter().map(|tree| tree.predict(x)).collect()
    }

    /// Makes predictions for input data by majority vote.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is not fitted or the feature count
    /// differs from training.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let votes = self.tree_votes(x)?;
        Ok((0..x.n_rows())
            .map(|sample| {
                let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
                for tree_votes in &votes {
                    *counts.entry(tree_votes[sample]).or_insert(0) += 1;
                }
                let mut best = (0, 0);
                for (class, count) in counts {
                    if count > best.1 {
                        best = (class, count);
                    }
                }
                best.0
            })
            .collect())
    }

    /// Calculates accuracy score on test data.
    ///
    /// # Errors
    ///
    /// Same as [`RandomForestClassifier::predict`].
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        let predictions = self.predict(x)?;
        crate::metrics::classification::accuracy(&predictions, y)
    }

    /// Predict class probabilities as vote proportions.
    ///
    /// Shape is `(n_samples, n_classes)` with columns in
    /// [`RandomForestClassifier::classes`] order; each row sums to 1.0.
    ///
    /// # Errors
    ///
    /// Same as [`RandomForestClassifier::predict`].
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let votes = self.tree_votes(x)?;
        let n_samples = x.n_rows();
        let n_classes = self.classes.len();
        let n_trees = self.trees.len() as f32;

        let mut proba = vec![0.0f32; n_samples * n_classes];
        for tree_votes in &votes {
            for (sample, label) in tree_votes.iter().enumerate() {
                if let Ok(col) = self.classes.binary_search(label) {
                    proba[sample * n_classes + col] += 1.0 / n_trees;
                }
            }
        }

        Matrix::from_vec(n_samples, n_classes, proba).map_err(|e| TopnError::DimensionMismatch {
            expected: format!("{n_samples}x{n_classes}"),
            actual: e.to_string(),
        })
    }

    /// Returns feature importances based on mean decrease in impurity.
    ///
    /// `Some(Vec<f32>)` normalized to sum to 1.0 (all zeros if no tree
    /// split), `None` before fitting.
    pub fn feature_importances(&self) -> Option<Vec<f32>> {
        let n_features = self.n_features?;
        let mut total = vec![0.0f32; n_features];
        for tree in &self.trees {
            if let Some(root) = tree.root() {
                accumulate_importances(root, &mut total);
            }
        }

        let sum: f32 = total.iter().sum();
        if sum > 0.0 {
            for importance in &mut total {
                *importance /= sum;
            }
        }
        Some(total)
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[DecisionTreeClassifier] {
        &self.trees
    }
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests;
