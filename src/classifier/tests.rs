use super::*;

/// Small dimensions favour method 1, large ones method 0.
fn separable_table() -> FeatureTable {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for dim in [10, 20, 30, 40, 50, 60] {
        rows.push(FeatureRow::new(MatrixType::Random, dim, 5));
        labels.push(MethodId(1));
    }
    for dim in [1000, 2000, 3000, 4000] {
        rows.push(FeatureRow::new(MatrixType::Random, dim, 5));
        labels.push(MethodId(0));
    }
    FeatureTable::from_parts(rows, labels)
}

#[test]
fn test_predict_before_fit() {
    let advisor = ForestAdvisor::new();
    let row = FeatureRow::new(MatrixType::Random, 10, 5);
    assert!(matches!(
        advisor.predict_one(&row),
        Err(TopnError::NotFitted { .. })
    ));
}

#[test]
fn test_fit_empty_table() {
    let mut advisor = ForestAdvisor::new();
    assert!(matches!(
        advisor.fit(&FeatureTable::default()),
        Err(TopnError::EmptyData { .. })
    ));
}

#[test]
fn test_zero_trees_rejected() {
    let mut advisor = ForestAdvisor::new().with_n_estimators(0);
    assert!(matches!(
        advisor.fit(&separable_table()),
        Err(TopnError::InvalidConfig { .. })
    ));
}

#[test]
fn test_separable_predictions() {
    let mut advisor = ForestAdvisor::new().with_n_estimators(50);
    advisor.fit(&separable_table()).expect("fit");

    let small = FeatureRow::new(MatrixType::Random, 5, 5);
    let large = FeatureRow::new(MatrixType::Random, 9000, 5);
    assert_eq!(advisor.predict_one(&small).expect("small"), MethodId(1));
    assert_eq!(advisor.predict_one(&large).expect("large"), MethodId(0));
}

#[test]
fn test_sparse_method_ids() {
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for dim in [10, 20, 30, 40] {
        rows.push(FeatureRow::new(MatrixType::Random, dim, 5));
        labels.push(MethodId(1_000_000));
    }
    for dim in [1000, 2000, 3000, 4000] {
        rows.push(FeatureRow::new(MatrixType::Random, dim, 5));
        labels.push(MethodId(7));
    }
    let mut advisor = ForestAdvisor::new().with_n_estimators(50);
    advisor.fit(&FeatureTable::from_parts(rows, labels)).expect("fit");

    let forest = advisor.forest().expect("fitted");
    assert_eq!(forest.classes(), &[7, 1_000_000]);
    let small = FeatureRow::new(MatrixType::Random, 5, 5);
    let large = FeatureRow::new(MatrixType::Random, 9000, 5);
    assert_eq!(advisor.predict_one(&small).expect("small"), MethodId(1_000_000));
    assert_eq!(advisor.predict_one(&large).expect("large"), MethodId(7));
}

#[test]
fn test_unseen_type_rejected_by_default() {
    let mut advisor = ForestAdvisor::new().with_n_estimators(5);
    advisor.fit(&separable_table()).expect("fit");
    let row = FeatureRow::new(MatrixType::Uniform, 10, 5);
    match advisor.predict_one(&row) {
        Err(TopnError::UnseenCategory { matrix_type }) => {
            assert_eq!(matrix_type, "Uniform Distribution");
        }
        other => panic!("expected unseen category, got {other:?}"),
    }
}

#[test]
fn test_unseen_type_majority_fallback() {
    let mut advisor = ForestAdvisor::new()
        .with_n_estimators(5)
        .with_unseen_policy(UnseenTypePolicy::MajorityFallback);
    advisor.fit(&separable_table()).expect("fit");

    assert_eq!(advisor.majority_label(), Some(MethodId(1)));
    let row = FeatureRow::new(MatrixType::SortedDescending, 9000, 5);
    assert_eq!(advisor.predict_one(&row).expect("fallback"), MethodId(1));
}

#[test]
fn test_same_seed_same_predictions() {
    let table = separable_table();
    let queries: Vec<FeatureRow> = [5, 45, 55, 500, 900, 2500, 7000]
        .iter()
        .map(|&d| FeatureRow::new(MatrixType::Random, d, 5))
        .collect();

    let mut a = ForestAdvisor::new().with_n_estimators(20).with_seed(9);
    let mut b = ForestAdvisor::new().with_n_estimators(20).with_seed(9);
    a.fit(&table).expect("fit a");
    b.fit(&table).expect("fit b");
    assert_eq!(
        a.predict(&queries).expect("a"),
        b.predict(&queries).expect("b")
    );
}

#[test]
fn test_feature_importances_named() {
    let mut advisor = ForestAdvisor::new().with_n_estimators(10);
    assert!(advisor.feature_importances().is_none());
    advisor.fit(&separable_table()).expect("fit");

    let importances = advisor.feature_importances().expect("fitted");
    let names: Vec<&str> = importances.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Type", "Dimension", "topN"]);
    // Type and topN are constant, so only Dimension can split.
    assert!((importances[1].1 - 1.0).abs() < 1e-4);
}

#[test]
fn test_seen_types_recorded() {
    let mut advisor = ForestAdvisor::new().with_n_estimators(3);
    advisor.fit(&separable_table()).expect("fit");
    assert_eq!(
        advisor.seen_types().iter().copied().collect::<Vec<_>>(),
        vec![MatrixType::Random]
    );
    assert_eq!(advisor.forest().map(|f| f.trees().len()), Some(3));
}

#[test]
fn test_majority_tie_prefers_smallest_id() {
    assert_eq!(
        most_frequent(&[MethodId(3), MethodId(1), MethodId(3), MethodId(1)]),
        Some(MethodId(1))
    );
    assert_eq!(most_frequent(&[]), None);
}
