use super::*;
use crate::data::Measurement;
use crate::evaluate::annotate;
use crate::grouping::Grouper;

fn annotated(data: &Dataset, predictions: &[u32]) -> Vec<AnnotatedRow> {
    let grouped = Grouper::new(2).label(data).expect("label");
    let predictions: Vec<MethodId> = predictions.iter().copied().map(MethodId).collect();
    annotate(&grouped, &predictions).expect("annotate")
}

fn two_type_dataset() -> Dataset {
    Dataset::from_measurements(
        "test",
        vec![
            Measurement::new(4, 100, 10, 0, 3.0),
            Measurement::new(4, 100, 10, 1, 1.0),
            Measurement::new(0, 100, 10, 0, 2.0),
            Measurement::new(0, 100, 10, 1, 4.0),
            Measurement::new(0, 200, 10, 0, 5.0),
            Measurement::new(0, 200, 10, 1, 6.0),
        ],
    )
}

#[test]
fn test_panels_sorted_by_type_and_method() {
    let data = two_type_dataset();
    let curves = PredictionCurves::build(&data, &annotated(&data, &[1, 0, 0])).expect("build");

    let types: Vec<MatrixType> = curves.panels().iter().map(|p| p.matrix_type).collect();
    assert_eq!(types, vec![MatrixType::Random, MatrixType::Uniform]);

    let random = curves.panel(MatrixType::Random).expect("random");
    let methods: Vec<Option<MethodId>> = random.actual.iter().map(|s| s.method).collect();
    assert_eq!(methods, vec![Some(MethodId(0)), Some(MethodId(1))]);
    assert_eq!(random.actual[0].points, vec![(110.0, 2.0), (210.0, 5.0)]);
    assert_eq!(random.actual[1].name, "Algorithm 1");
    assert_eq!(
        random.title(),
        "Type Random Matrix: Real vs Predicted Execution Time"
    );
}

#[test]
fn test_predicted_series_follows_predicted_method() {
    let data = two_type_dataset();
    let curves = PredictionCurves::build(&data, &annotated(&data, &[1, 0, 1])).expect("build");

    let uniform = curves.panel(MatrixType::Uniform).expect("uniform");
    assert_eq!(uniform.predicted.points, vec![(110.0, 1.0), (110.0, 1.0)]);

    let random = curves.panel(MatrixType::Random).expect("random");
    assert_eq!(
        random.predicted.points,
        vec![(110.0, 2.0), (110.0, 2.0), (210.0, 6.0), (210.0, 6.0)]
    );
    assert_eq!(random.predicted.name, PREDICTED_SERIES);
    assert!(random.predicted.method.is_none());
}

#[test]
fn test_missing_predicted_row_is_lookup_error() {
    // Only method 0 was measured for this configuration.
    let data = Dataset::from_measurements(
        "test",
        vec![
            Measurement::new(0, 10, 5, 0, 2.0),
            Measurement::new(0, 10, 5, 0, 1.0),
        ],
    );
    match PredictionCurves::build(&data, &annotated(&data, &[1])) {
        Err(TopnError::Lookup {
            dimension,
            top_n,
            method,
            ..
        }) => {
            assert_eq!((dimension, top_n, method), (10, 5, 1));
        }
        other => panic!("expected lookup error, got {other:?}"),
    }
}

#[test]
fn test_named_series() {
    let data = two_type_dataset();
    let names = MethodNames::benchmark_defaults();
    let curves =
        PredictionCurves::build_named(&data, &annotated(&data, &[1, 0, 0]), &names).expect("build");
    let panel = &curves.panels()[0];
    assert_eq!(panel.actual[0].name, "processImageHeapBest");
}

#[test]
fn test_write_series_csv() {
    let data = two_type_dataset();
    let curves = PredictionCurves::build(&data, &annotated(&data, &[1, 0, 0])).expect("build");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("series.csv");
    write_series_csv(&curves, &path).expect("write");

    let text = std::fs::read_to_string(&path).expect("read");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("type,series,x,y"));
    // 6 actual points plus 6 predicted points.
    assert_eq!(lines.count(), 12);
    assert!(text.contains("Uniform Distribution,Predicted Best Algorithm,110.0,1.0"));
}

#[test]
fn test_render_svg_writes_file() {
    let data = two_type_dataset();
    let curves = PredictionCurves::build(&data, &annotated(&data, &[1, 0, 0])).expect("build");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("prediction.svg");
    render_svg(&curves, &path).expect("render");

    let svg = std::fs::read_to_string(&path).expect("read");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Real vs Predicted Execution Time"));
}

#[test]
fn test_render_empty_curves_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = render_svg(&PredictionCurves::default(), &dir.path().join("x.svg"));
    assert!(matches!(result, Err(TopnError::Plot(_))));
}

#[test]
fn test_axis_range_padding() {
    let r = axis_range([1.0, 3.0].into_iter());
    assert!(r.start < 1.0 && r.end > 3.0);
    let flat = axis_range([2.0].into_iter());
    assert_eq!(flat, 1.0..3.0);
    assert_eq!(axis_range(std::iter::empty()), 0.0..1.0);
}
