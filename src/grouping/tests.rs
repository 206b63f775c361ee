use super::*;
use crate::data::Measurement;

fn dataset(rows: Vec<Measurement>) -> Dataset {
    Dataset::from_measurements("test", rows)
}

#[test]
fn test_head_to_head_label() {
    let data = dataset(vec![
        Measurement::new(0, 10, 5, 0, 2.0),
        Measurement::new(0, 10, 5, 1, 1.0),
    ]);
    let grouped = Grouper::new(2).label(&data).expect("label");
    assert_eq!(grouped.n_groups(), 1);
    let label = grouped.labels()[0];
    assert_eq!(label.best_method, MethodId(1));
    assert_eq!(label.best_offset, 1);
    assert_eq!(label.best_row, 1);
    assert!((label.best_time - 1.0).abs() < 1e-12);
}

#[test]
fn test_tie_goes_to_first_row() {
    let data = dataset(vec![
        Measurement::new(1, 10, 5, 3, 1.5),
        Measurement::new(1, 10, 5, 2, 1.5),
    ]);
    let grouped = Grouper::new(2).label(&data).expect("label");
    assert_eq!(grouped.labels()[0].best_method, MethodId(3));
    assert_eq!(grouped.labels()[0].best_offset, 0);
}

#[test]
fn test_offset_and_method_are_distinct_encodings() {
    // Method ids deliberately do not equal their in-group positions.
    let data = dataset(vec![
        Measurement::new(0, 10, 5, 2, 9.0),
        Measurement::new(0, 10, 5, 0, 3.0),
        Measurement::new(0, 20, 5, 2, 1.0),
        Measurement::new(0, 20, 5, 0, 3.0),
    ]);
    let grouped = Grouper::new(2).label(&data).expect("label");
    let l0 = grouped.labels()[0];
    let l1 = grouped.labels()[1];
    assert_eq!((l0.best_offset, l0.best_method), (1, MethodId(0)));
    assert_eq!((l1.best_offset, l1.best_method), (0, MethodId(2)));
    assert_eq!(l1.best_row, 2);
}

#[test]
fn test_group_size_three() {
    let data = dataset(vec![
        Measurement::new(2, 8, 2, 0, 3.0),
        Measurement::new(2, 8, 2, 1, 2.0),
        Measurement::new(2, 8, 2, 2, 1.0),
    ]);
    let grouped = Grouper::new(3).label(&data).expect("label");
    assert_eq!(grouped.labels()[0].best_offset, 2);
    assert_eq!(grouped.best_offsets_per_row(), vec![2, 2, 2]);
}

#[test]
fn test_short_group_rejected() {
    let data = dataset(vec![
        Measurement::new(0, 10, 5, 0, 2.0),
        Measurement::new(0, 10, 5, 1, 1.0),
        Measurement::new(0, 20, 5, 0, 1.0),
    ]);
    match Grouper::new(2).label(&data) {
        Err(TopnError::Grouping {
            rows, remainder, ..
        }) => {
            assert_eq!(rows, 3);
            assert_eq!(remainder, 1);
        }
        other => panic!("expected grouping error, got {other:?}"),
    }
}

#[test]
fn test_short_group_dropped() {
    let data = dataset(vec![
        Measurement::new(0, 10, 5, 0, 2.0),
        Measurement::new(0, 10, 5, 1, 1.0),
        Measurement::new(0, 20, 5, 0, 1.0),
    ]);
    let grouped = Grouper::new(2)
        .with_short_group_policy(ShortGroupPolicy::Drop)
        .label(&data)
        .expect("label");
    assert_eq!(grouped.n_groups(), 1);
    assert_eq!(grouped.dataset().len(), 2);
}

#[test]
fn test_only_short_group_is_empty() {
    let data = dataset(vec![Measurement::new(0, 10, 5, 0, 2.0)]);
    let result = Grouper::new(2)
        .with_short_group_policy(ShortGroupPolicy::Drop)
        .label(&data);
    assert!(matches!(result, Err(TopnError::EmptyData { .. })));
}

#[test]
fn test_zero_group_size() {
    let data = dataset(vec![Measurement::new(0, 10, 5, 0, 2.0)]);
    assert!(matches!(
        Grouper::new(0).label(&data),
        Err(TopnError::InvalidConfig { .. })
    ));
}

#[test]
fn test_heterogeneous_group_detected() {
    let data = dataset(vec![
        Measurement::new(0, 10, 5, 0, 2.0),
        Measurement::new(0, 12, 5, 1, 1.0),
    ]);
    match Grouper::new(2).label(&data) {
        Err(TopnError::HeterogeneousGroup { group, row, .. }) => {
            assert_eq!(group, 0);
            assert_eq!(row, 1);
        }
        other => panic!("expected heterogeneous group error, got {other:?}"),
    }
}

#[test]
fn test_homogeneity_check_can_be_disabled() {
    let data = dataset(vec![
        Measurement::new(0, 10, 5, 0, 2.0),
        Measurement::new(0, 12, 5, 1, 1.0),
    ]);
    let grouped = Grouper::new(2)
        .with_homogeneity_check(false)
        .label(&data)
        .expect("positional grouping");
    assert_eq!(grouped.labels()[0].best_method, MethodId(1));
}

#[test]
fn test_best_rows_and_win_counts() {
    let data = dataset(vec![
        Measurement::new(0, 10, 5, 0, 2.0),
        Measurement::new(0, 10, 5, 1, 1.0),
        Measurement::new(0, 20, 5, 0, 0.5),
        Measurement::new(0, 20, 5, 1, 1.0),
        Measurement::new(4, 20, 5, 0, 3.0),
        Measurement::new(4, 20, 5, 1, 1.0),
    ]);
    let grouped = Grouper::new(2).label(&data).expect("label");
    let best: Vec<u32> = grouped.best_rows().map(|m| m.method.0).collect();
    assert_eq!(best, vec![1, 0, 1]);

    let wins = grouped.win_counts();
    assert_eq!(wins[&MatrixType::Random][&MethodId(0)], 1);
    assert_eq!(wins[&MatrixType::Random][&MethodId(1)], 1);
    assert_eq!(wins[&MatrixType::Uniform][&MethodId(1)], 1);
    assert!(!wins[&MatrixType::Uniform].contains_key(&MethodId(0)));
}
