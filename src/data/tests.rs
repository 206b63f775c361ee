use super::*;
use crate::error::TopnError;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

#[test]
fn test_load_basic() {
    let file = csv_file(
        "Type,Dimension,topN,IDMethod,ExecTime\n\
         0,10,5,0,2.0\n\
         0,10,5,1,1.0\n",
    );
    let data = load_csv(file.path()).expect("load");
    assert_eq!(data.len(), 2);
    assert_eq!(data.rows()[1].method, MethodId(1));
    assert_eq!(data.rows()[0].matrix_type, MatrixType::Random);
    assert!((data.rows()[0].exec_time - 2.0).abs() < 1e-12);
}

#[test]
fn test_column_order_and_extra_columns() {
    let file = csv_file(
        "ExecTime,Note,IDMethod,topN,Dimension,Type\n\
         0.5,warm,1,3,64,4\n",
    );
    let data = load_csv(file.path()).expect("load");
    let m = data.rows()[0];
    assert_eq!(m.matrix_type, MatrixType::Uniform);
    assert_eq!(m.dimension, 64);
    assert_eq!(m.top_n, 3);
}

#[test]
fn test_integral_floats_accepted() {
    let file = csv_file("Type,Dimension,topN,IDMethod,ExecTime\n2.0,128.0,16,0,3.25\n");
    let data = load_csv(file.path()).expect("load");
    assert_eq!(data.rows()[0].dimension, 128);
    assert_eq!(data.rows()[0].matrix_type, MatrixType::SortedDescending);
}

#[test]
fn test_missing_file() {
    let err = load_csv("/definitely/not/here.csv").expect_err("must fail");
    assert!(matches!(err, TopnError::MissingFile { .. }));
}

#[test]
fn test_missing_column() {
    let file = csv_file("Type,Dimension,IDMethod,ExecTime\n0,10,0,1.0\n");
    match load_csv(file.path()) {
        Err(TopnError::Schema { line, column, .. }) => {
            assert_eq!(line, 1);
            assert_eq!(column, "topN");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_nan_exec_time_rejected() {
    let file = csv_file("Type,Dimension,topN,IDMethod,ExecTime\n0,10,5,0,1.0\n0,10,5,1,NaN\n");
    match load_csv(file.path()) {
        Err(TopnError::Schema { line, column, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(column, "ExecTime");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_empty_exec_time_rejected() {
    let file = csv_file("Type,Dimension,topN,IDMethod,ExecTime\n0,10,5,0,\n");
    assert!(matches!(
        load_csv(file.path()),
        Err(TopnError::Schema { .. })
    ));
}

#[test]
fn test_unknown_type_code() {
    let file = csv_file("Type,Dimension,topN,IDMethod,ExecTime\n7,10,5,0,1.0\n");
    match load_csv(file.path()) {
        Err(TopnError::Schema { column, .. }) => assert_eq!(column, "Type"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_header_only_is_empty() {
    let file = csv_file("Type,Dimension,topN,IDMethod,ExecTime\n");
    assert!(matches!(
        load_csv(file.path()),
        Err(TopnError::EmptyData { .. })
    ));
}

#[test]
fn test_semicolon_delimiter() {
    let data = CsvLoader::new()
        .with_delimiter(b';')
        .load_reader(
            "Type;Dimension;topN;IDMethod;ExecTime\n1;10;5;0;0.25\n".as_bytes(),
            "inline",
        )
        .expect("load");
    assert_eq!(data.label(), "inline");
    assert_eq!(data.rows()[0].matrix_type, MatrixType::SortedAscending);
}

#[test]
fn test_find_returns_first_match() {
    let data = Dataset::from_measurements(
        "t",
        vec![
            Measurement::new(0, 10, 5, 1, 3.0),
            Measurement::new(0, 10, 5, 1, 4.0),
        ],
    );
    let key = data.rows()[0].key();
    let hit = data.find(key, MethodId(1)).expect("present");
    assert!((hit.exec_time - 3.0).abs() < 1e-12);
    assert!(data.find(key, MethodId(0)).is_none());
}

#[test]
fn test_distinct_types_and_methods() {
    let data = Dataset::from_measurements(
        "t",
        vec![
            Measurement::new(3, 10, 5, 2, 1.0),
            Measurement::new(0, 10, 5, 0, 1.0),
            Measurement::new(3, 10, 5, 0, 1.0),
        ],
    );
    assert_eq!(
        data.matrix_types(),
        vec![MatrixType::Random, MatrixType::SpecificDistribution]
    );
    assert_eq!(data.methods(), vec![MethodId(0), MethodId(2)]);
}

#[test]
fn test_method_names_fallback() {
    let names = MethodNames::benchmark_defaults();
    assert_eq!(names.name(MethodId(0)), "processImageHeapBest");
    assert_eq!(names.name(MethodId(9)), "Algorithm 9");
}

#[test]
fn test_matrix_type_codes_roundtrip() {
    for t in MatrixType::ALL {
        assert_eq!(MatrixType::from_code(t.code()), Some(t));
    }
    assert_eq!(MatrixType::from_code(5), None);
}
