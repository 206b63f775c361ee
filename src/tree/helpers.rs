//! Helper functions for tree building.
//!
//! Trees are grown over index lists into the shared training matrix, so
//! no intermediate matrices are copied while recursing.

use super::{Leaf, Node, TreeNode};
use crate::primitives::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Growth limits shared by every node of one tree.
#[derive(Debug, Clone, Copy)]
pub(super) struct GrowParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: Option<usize>,
    pub n_classes: usize,
}

/// Seeded RNG, or an entropy-seeded one when no seed is given.
pub(super) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Sorted distinct labels and `y` rewritten as positions into them.
pub(super) fn encode_labels(y: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut classes = y.to_vec();
    classes.sort_unstable();
    classes.dedup();
    let encoded = y
        .iter()
        .map(|label| classes.binary_search(label).unwrap_or_default())
        .collect();
    (classes, encoded)
}

/// Calculate Gini impurity for a set of labels.
///
/// Formula: Gini = 1 - `Σ(p_i²)` where `p_i` is the proportion of class i.
pub fn gini_impurity(labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }

    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }
    gini_from_counts(counts.values().copied(), labels.len())
}

/// Calculate weighted Gini impurity for a split.
pub fn gini_split(left_labels: &[usize], right_labels: &[usize]) -> f32 {
    let n_left = left_labels.len() as f32;
    let n_right = right_labels.len() as f32;
    let n_total = n_left + n_right;

    if n_total == 0.0 {
        return 0.0;
    }

    (n_left / n_total) * gini_impurity(left_labels)
        + (n_right / n_total) * gini_impurity(right_labels)
}

fn gini_from_counts(counts: impl Iterator<Item = usize>, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f32;
    1.0 - counts
        .map(|c| {
            let p = c as f32 / n;
            p * p
        })
        .sum::<f32>()
}

/// Most frequent label; ties go to the smallest label.
pub(super) fn majority_class(labels: &[usize]) -> usize {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0usize) += 1;
    }
    let mut best = (0, 0);
    for (label, count) in counts {
        if count > best.1 {
            best = (label, count);
        }
    }
    best.0
}

/// Best threshold for one feature by sweeping the sorted values.
///
/// Thresholds are midpoints between consecutive distinct values.
/// Returns `Some((threshold, gain))` only for a strictly positive gain.
pub(super) fn find_best_split_for_feature(
    values: &[f32],
    labels: &[usize],
    n_classes: usize,
) -> Option<(f32, f32)> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut total = vec![0usize; n_classes];
    for &label in labels {
        total[label] += 1;
    }
    let parent = gini_from_counts(total.iter().copied(), n);

    let mut left = vec![0usize; n_classes];
    let mut best: Option<(f32, f32)> = None;

    for pos in 0..n - 1 {
        left[labels[order[pos]]] += 1;
        let lo = values[order[pos]];
        let hi = values[order[pos + 1]];
        if hi <= lo {
            continue;
        }

        let n_left = pos + 1;
        let n_right = n - n_left;
        let right = total.iter().zip(&left).map(|(t, l)| t - l);
        let weighted = (n_left as f32 / n as f32) * gini_from_counts(left.iter().copied(), n_left)
            + (n_right as f32 / n as f32) * gini_from_counts(right, n_right);
        let gain = parent - weighted;

        if gain > best.map_or(0.0, |(_, g)| g) {
            let mid = (lo + hi) / 2.0;
            let threshold = if mid < hi { mid } else { lo };
            best = Some((threshold, gain));
        }
    }

    best
}

/// Candidate features for one split: all of them, or a random subset.
fn candidate_features(n_features: usize, max_features: Option<usize>, rng: &mut StdRng) -> Vec<usize> {
    match max_features {
        Some(k) if k < n_features => {
            let mut picked = rand::seq::index::sample(rng, n_features, k.max(1)).into_vec();
            picked.sort_unstable();
            picked
        }
        _ => (0..n_features).collect(),
    }
}

/// Build a decision tree recursively over `indices`.
pub(super) fn build_tree(
    x: &Matrix<f32>,
    y: &[usize],
    indices: &[usize],
    depth: usize,
    params: &GrowParams,
    rng: &mut StdRng,
) -> TreeNode {
    let labels: Vec<usize> = indices.iter().map(|&i| y[i]).collect();
    let n_samples = labels.len();
    let leaf = |labels: &[usize]| {
        TreeNode::Leaf(Leaf {
            class_label: majority_class(labels),
            n_samples,
        })
    };

    let pure = labels.iter().all(|&l| l == labels[0]);
    let at_max_depth = params.max_depth.is_some_and(|d| depth >= d);
    if pure || at_max_depth || n_samples < params.min_samples_split {
        return leaf(&labels);
    }

    let mut best: Option<(usize, f32, f32)> = None;
    for feature_idx in candidate_features(x.n_cols(), params.max_features, rng) {
        let values: Vec<f32> = indices.iter().map(|&i| x.get(i, feature_idx)).collect();
        if let Some((threshold, gain)) =
            find_best_split_for_feature(&values, &labels, params.n_classes)
        {
            if gain > best.map_or(0.0, |(_, _, g)| g) {
                best = Some((feature_idx, threshold, gain));
            }
        }
    }

    let Some((feature_idx, threshold, gain)) = best else {
        return leaf(&labels);
    };

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| x.get(i, feature_idx) <= threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        return leaf(&labels);
    }

    let left = build_tree(x, y, &left_idx, depth + 1, params, rng);
    let right = build_tree(x, y, &right_idx, depth + 1, params, rng);

    TreeNode::Node(Node {
        feature_idx,
        threshold,
        n_samples,
        impurity_decrease: gain * n_samples as f32,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Accumulate weighted impurity decrease per feature.
pub(super) fn accumulate_importances(node: &TreeNode, importances: &mut [f32]) {
    if let TreeNode::Node(n) = node {
        importances[n.feature_idx] += n.impurity_decrease;
        accumulate_importances(&n.left, importances);
        accumulate_importances(&n.right, importances);
    }
}

/// Creates a bootstrap sample (random sample with replacement).
pub(super) fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    let mut rng = make_rng(random_state);
    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
}
