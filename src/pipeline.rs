//! End-to-end train / predict / evaluate run.
//!
//! load -> group -> extract -> fit -> predict -> evaluate -> annotate ->
//! optional plots. Any stage error aborts the run.

use crate::classifier::ForestAdvisor;
use crate::config::PipelineConfig;
use crate::curves::{render_grid_svg, ExecTimeCurves};
use crate::data::{load_csv, Dataset, MatrixType, MethodId, MethodNames};
use crate::error::Result;
use crate::evaluate::{annotate, AnnotatedRow, Evaluation};
use crate::features::{FeatureRow, FeatureTable};
use crate::grouping::{GroupedDataset, Grouper};
use crate::traits::Classifier;
use crate::viz::{render_svg, write_series_csv, PredictionCurves};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the per-type comparison plot inside `plot_dir`.
pub const PREDICTION_PLOT: &str = "prediction_curves.svg";
/// File name of the plotted points export inside `plot_dir`.
pub const PREDICTION_SERIES: &str = "prediction_series.csv";

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Training rows after any short-group truncation
    pub train_rows: usize,
    /// Labelled training groups
    pub train_groups: usize,
    /// Test rows after any short-group truncation
    pub test_rows: usize,
    /// Labelled test groups
    pub test_groups: usize,
    /// Scores of the test predictions
    pub evaluation: Evaluation,
    /// `(feature name, importance)`
    pub feature_importances: Vec<(String, f32)>,
    /// Groups won per method on the test set, by matrix type
    pub win_counts: BTreeMap<MatrixType, BTreeMap<MethodId, usize>>,
    /// Predicted method per test group
    pub predictions: Vec<MethodId>,
    /// Files written under `plot_dir`
    pub plots: Vec<PathBuf>,
    /// Test rows joined with their labels and predictions
    #[serde(skip)]
    pub annotated: Vec<AnnotatedRow>,
}

fn grouper(config: &PipelineConfig) -> Grouper {
    Grouper::new(config.group_size)
        .with_short_group_policy(config.short_groups)
        .with_homogeneity_check(config.check_homogeneity)
}

fn advisor(config: &PipelineConfig) -> ForestAdvisor {
    ForestAdvisor::new()
        .with_n_estimators(config.n_estimators)
        .with_max_depth(config.max_depth)
        .with_seed(config.seed)
        .with_unseen_policy(config.unseen_types)
}

/// Loads and labels the training file, then fits an advisor on it.
///
/// # Errors
///
/// Any load, grouping or fitting error.
pub fn train(config: &PipelineConfig) -> Result<(ForestAdvisor, GroupedDataset)> {
    config.validate()?;
    let train = load_csv(&config.train_path)?;
    let grouped = grouper(config).label(&train)?;
    info!(
        "Training set: {} rows in {} groups",
        grouped.dataset().len(),
        grouped.n_groups()
    );

    let mut model = advisor(config);
    model.fit(&FeatureTable::from_groups(&grouped))?;
    Ok((model, grouped))
}

/// Runs the full pipeline described by `config`.
///
/// # Errors
///
/// The first error of any stage.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport> {
    let (model, train_grouped) = train(config)?;

    let test = load_csv(&config.test_path)?;
    let test_grouped = grouper(config).label(&test)?;
    let test_table = FeatureTable::from_groups(&test_grouped);
    info!(
        "Test set: {} rows in {} groups",
        test_grouped.dataset().len(),
        test_grouped.n_groups()
    );

    let predictions = model.predict(test_table.rows())?;
    let evaluation = Evaluation::compute(&predictions, test_table.labels(), &config.method_names)?;
    info!("{}", evaluation.summary_line());

    let annotated = annotate(&test_grouped, &predictions)?;

    let plots = match &config.plot_dir {
        Some(dir) => write_prediction_plots(
            test_grouped.dataset(),
            &annotated,
            &config.method_names,
            dir,
        )?,
        None => Vec::new(),
    };

    Ok(PipelineReport {
        train_rows: train_grouped.dataset().len(),
        train_groups: train_grouped.n_groups(),
        test_rows: test_grouped.dataset().len(),
        test_groups: test_grouped.n_groups(),
        evaluation,
        feature_importances: model.feature_importances().unwrap_or_default(),
        win_counts: test_grouped.win_counts(),
        predictions,
        plots,
        annotated,
    })
}

/// Renders the comparison plot and series export into `dir`.
///
/// # Errors
///
/// Lookup, I/O or rendering errors.
pub fn write_prediction_plots(
    dataset: &Dataset,
    annotated: &[AnnotatedRow],
    names: &MethodNames,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let curves = PredictionCurves::build_named(dataset, annotated, names)?;
    fs::create_dir_all(dir)?;

    let svg = dir.join(PREDICTION_PLOT);
    render_svg(&curves, &svg)?;
    let csv = dir.join(PREDICTION_SERIES);
    write_series_csv(&curves, &csv)?;
    Ok(vec![svg, csv])
}

/// Trains on `config.train_path` and predicts a single configuration.
///
/// # Errors
///
/// Training errors, or the advisor's prediction error for `row`.
pub fn predict_config(config: &PipelineConfig, row: &FeatureRow) -> Result<MethodId> {
    let (model, _) = train(config)?;
    model.predict_one(row)
}

/// Interpolates every series of `data` and draws the 2×3 grid to `out`.
/// Returns the number of curves drawn.
///
/// # Errors
///
/// Load, interpolation or rendering errors.
pub fn plot_curves(data: &Path, out: &Path, samples: usize, names: &MethodNames) -> Result<usize> {
    let dataset = load_csv(data)?;
    let curves = ExecTimeCurves::build(&dataset, samples)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    render_grid_svg(&curves, out, names)?;
    Ok(curves.n_series())
}
