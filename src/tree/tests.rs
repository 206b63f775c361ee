//! Tests for decision tree algorithms.

use super::*;
use crate::primitives::Matrix;

fn and_gate() -> (Matrix<f32>, Vec<usize>) {
    let x = Matrix::from_vec(
        8,
        2,
        vec![
            0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, //
            0.1, 0.1, 0.1, 0.9, 0.9, 0.1, 0.9, 0.9,
        ],
    )
    .expect("8x2");
    let y = vec![0, 0, 0, 1, 0, 0, 0, 1];
    (x, y)
}

#[test]
fn test_gini_impurity() {
    assert!((gini_impurity(&[0, 0, 0]) - 0.0).abs() < 1e-6);
    assert!((gini_impurity(&[0, 1]) - 0.5).abs() < 1e-6);
    assert!((gini_impurity(&[]) - 0.0).abs() < 1e-6);
    let three = gini_impurity(&[0, 1, 2]);
    assert!((three - (1.0 - 3.0 / 9.0)).abs() < 1e-6);
}

#[test]
fn test_gini_split_pure_partitions() {
    assert!((gini_split(&[0, 0], &[1, 1]) - 0.0).abs() < 1e-6);
    assert!((gini_split(&[0, 1], &[0, 1]) - 0.5).abs() < 1e-6);
}

#[test]
fn test_tree_depth_and_leaves() {
    let tree = TreeNode::Node(Node {
        feature_idx: 0,
        threshold: 0.5,
        n_samples: 2,
        impurity_decrease: 1.0,
        left: Box::new(TreeNode::Leaf(Leaf {
            class_label: 0,
            n_samples: 1,
        })),
        right: Box::new(TreeNode::Leaf(Leaf {
            class_label: 1,
            n_samples: 1,
        })),
    });
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.n_leaves(), 2);
}

#[test]
fn test_decision_tree_perfect_separable() {
    let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1");
    let y = vec![0, 0, 1, 1];

    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit");

    assert_eq!(dt.predict(&x).expect("predict"), y);
    assert_eq!(dt.depth(), Some(1));
    match dt.root() {
        Some(TreeNode::Node(n)) => assert!((n.threshold - 5.5).abs() < 1e-6),
        other => panic!("expected split root, got {other:?}"),
    }
}

#[test]
fn test_decision_tree_learns_conjunction() {
    let (x, y) = and_gate();
    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit");
    assert_eq!(dt.predict(&x).expect("predict"), y);
    assert!((dt.score(&x, &y).expect("score") - 1.0).abs() < 1e-6);
}

#[test]
fn test_min_samples_split_stops_growth() {
    let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1");
    let y = vec![0, 0, 1, 1];

    let mut dt = DecisionTreeClassifier::new().with_min_samples_split(5);
    dt.fit(&x, &y).expect("fit");
    assert_eq!(dt.depth(), Some(0));
    assert_eq!(dt.predict(&x).expect("predict"), vec![0, 0, 0, 0]);

    let mut dt = DecisionTreeClassifier::new().with_min_samples_split(4);
    dt.fit(&x, &y).expect("fit");
    assert_eq!(dt.depth(), Some(1));
    assert_eq!(dt.predict(&x).expect("predict"), y);
}

#[test]
fn test_decision_tree_sparse_labels() {
    let x = Matrix::from_vec(4, 1, vec![0.0, 1.0, 10.0, 11.0]).expect("4x1");
    let y = vec![1_000_000, 1_000_000, 7, 7];
    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit");
    assert_eq!(dt.classes(), &[7, 1_000_000]);
    assert_eq!(dt.predict(&x).expect("predict"), y);
    assert_eq!(dt.predict_one(&[20.0]).expect("predict"), 7);
}

#[test]
fn test_decision_tree_max_depth_zero_is_majority() {
    let x = Matrix::from_vec(3, 1, vec![0.0, 1.0, 2.0]).expect("3x1");
    let y = vec![1, 1, 0];
    let mut dt = DecisionTreeClassifier::new().with_max_depth(0);
    dt.fit(&x, &y).expect("fit");
    assert_eq!(dt.predict(&x).expect("predict"), vec![1, 1, 1]);
}

#[test]
fn test_majority_tie_goes_to_smallest_label() {
    let x = Matrix::from_vec(2, 1, vec![3.0, 3.0]).expect("2x1");
    let y = vec![2, 1];
    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &y).expect("fit");
    assert_eq!(dt.predict_one(&[3.0]).expect("predict"), 1);
}

#[test]
fn test_decision_tree_not_fitted() {
    let dt = DecisionTreeClassifier::new();
    let x = Matrix::from_vec(1, 1, vec![0.0]).expect("1x1");
    assert!(matches!(dt.predict(&x), Err(TopnError::NotFitted { .. })));
}

#[test]
fn test_decision_tree_feature_mismatch() {
    let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("2x1");
    let mut dt = DecisionTreeClassifier::new();
    dt.fit(&x, &[0, 1]).expect("fit");
    assert!(matches!(
        dt.predict_one(&[0.0, 1.0]),
        Err(TopnError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_fit_rejects_mismatched_labels() {
    let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("2x1");
    let mut dt = DecisionTreeClassifier::new();
    assert!(matches!(
        dt.fit(&x, &[0]),
        Err(TopnError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_forest_separable_data() {
    let x = Matrix::from_vec(6, 1, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).expect("6x1");
    let y = vec![0, 0, 0, 1, 1, 1];
    let mut rf = RandomForestClassifier::new(25).with_random_state(42);
    rf.fit(&x, &y).expect("fit");

    let test = Matrix::from_vec(2, 1, vec![-1.0, 20.0]).expect("2x1");
    assert_eq!(rf.predict(&test).expect("predict"), vec![0, 1]);
    assert_eq!(rf.trees().len(), 25);
    assert_eq!(rf.n_classes(), 2);
}

#[test]
fn test_forest_is_reproducible_with_seed() {
    let (x, y) = and_gate();
    let mut a = RandomForestClassifier::new(15).with_random_state(7);
    let mut b = RandomForestClassifier::new(15).with_random_state(7);
    a.fit(&x, &y).expect("fit a");
    b.fit(&x, &y).expect("fit b");
    assert_eq!(a.predict(&x).expect("a"), b.predict(&x).expect("b"));
    assert_eq!(
        a.predict_proba(&x).expect("a").as_slice(),
        b.predict_proba(&x).expect("b").as_slice()
    );
}

#[test]
fn test_forest_proba_rows_sum_to_one() {
    let (x, y) = and_gate();
    let mut rf = RandomForestClassifier::new(10).with_random_state(3);
    rf.fit(&x, &y).expect("fit");
    let proba = rf.predict_proba(&x).expect("proba");
    assert_eq!(proba.shape(), (8, 2));
    for row in 0..proba.n_rows() {
        let sum: f32 = proba.row(row).iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "row {row} sums to {sum}");
    }
}

#[test]
fn test_forest_feature_importances() {
    // Only feature 1 carries signal.
    let x = Matrix::from_vec(
        6,
        2,
        vec![5.0, 0.0, 1.0, 1.0, 5.0, 2.0, 1.0, 10.0, 5.0, 11.0, 1.0, 12.0],
    )
    .expect("6x2");
    let y = vec![0, 0, 0, 1, 1, 1];
    let mut rf = RandomForestClassifier::new(20)
        .with_max_features(2)
        .with_random_state(1);
    assert!(rf.feature_importances().is_none());
    rf.fit(&x, &y).expect("fit");

    let importances = rf.feature_importances().expect("fitted");
    assert_eq!(importances.len(), 2);
    let sum: f32 = importances.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4);
    assert!(importances[1] > importances[0]);
}

#[test]
fn test_forest_sparse_labels() {
    let big = u32::MAX as usize;
    let x = Matrix::from_vec(6, 1, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]).expect("6x1");
    let y = vec![7, 7, 7, big, big, big];
    let mut rf = RandomForestClassifier::new(15).with_random_state(42);
    rf.fit(&x, &y).expect("fit");

    assert_eq!(rf.n_classes(), 2);
    assert_eq!(rf.classes(), &[7, big]);
    let test = Matrix::from_vec(2, 1, vec![-1.0, 20.0]).expect("2x1");
    assert_eq!(rf.predict(&test).expect("predict"), vec![7, big]);

    let proba = rf.predict_proba(&test).expect("proba");
    assert_eq!(proba.shape(), (2, 2));
    assert!(proba.get(0, 0) > proba.get(0, 1));
    assert!(proba.get(1, 1) > proba.get(1, 0));
}

#[test]
fn test_forest_zero_estimators() {
    let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("2x1");
    let mut rf = RandomForestClassifier::new(0);
    assert!(matches!(
        rf.fit(&x, &[0, 1]),
        Err(TopnError::InvalidConfig { .. })
    ));
}

#[test]
fn test_forest_not_fitted() {
    let rf = RandomForestClassifier::default();
    let x = Matrix::from_vec(1, 1, vec![0.0]).expect("1x1");
    assert!(matches!(rf.predict(&x), Err(TopnError::NotFitted { .. })));
    assert_eq!(rf.n_estimators(), 100);
}

#[test]
fn test_forest_predictions_in_label_range() {
    let (x, y) = and_gate();
    let mut rf = RandomForestClassifier::new(5).with_random_state(11);
    rf.fit(&x, &y).expect("fit");
    for p in rf.predict(&x).expect("predict") {
        assert!(p <= 1);
    }
}
