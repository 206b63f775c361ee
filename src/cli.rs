//! Command line definitions for `apr-topn`.

use crate::classifier::UnseenTypePolicy;
use crate::config::PipelineConfig;
use crate::curves::DEFAULT_SAMPLES;
use crate::data::{MatrixType, MethodNames};
use crate::error::{Result, TopnError};
use crate::features::FeatureRow;
use crate::grouping::ShortGroupPolicy;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Predicts the fastest top-N selection algorithm from benchmark data.
#[derive(Parser, Debug)]
#[command(name = "apr-topn")]
#[command(about = "Best top-N selection algorithm advisor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level selected by `-v`; `None` defers to `RUST_LOG`.
    #[must_use]
    pub fn log_level(&self) -> Option<LevelFilter> {
        match self.verbose {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train on one file, evaluate on another and report accuracy
    Evaluate(EvaluateArgs),
    /// Train and predict the best method for one configuration
    Predict(PredictArgs),
    /// Plot interpolated execution time curves per matrix type
    Curves(CurvesArgs),
}

/// Report output format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Accuracy line and classification report
    #[default]
    Table,
    /// Full run report as JSON
    Json,
}

/// Options shared by commands that train a model.
#[derive(Args, Debug, Default)]
pub struct TrainArgs {
    /// YAML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Training CSV
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Rows per configuration group
    #[arg(short, long)]
    pub group_size: Option<usize>,

    /// Number of trees
    #[arg(long)]
    pub trees: Option<usize>,

    /// Maximum tree depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drop a short trailing group instead of failing
    #[arg(long)]
    pub allow_short_groups: bool,

    /// Answer unseen matrix types with the majority label
    #[arg(long)]
    pub fallback_unseen: bool,

    /// Group purely by position
    #[arg(long)]
    pub no_homogeneity_check: bool,
}

impl TrainArgs {
    /// Loads the configuration file (or defaults) and applies the flags.
    ///
    /// # Errors
    ///
    /// Config file errors or invalid resulting values.
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(path) = &self.train {
            config.train_path = path.clone();
        }
        if let Some(g) = self.group_size {
            config.group_size = g;
        }
        if let Some(n) = self.trees {
            config.n_estimators = n;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.allow_short_groups {
            config.short_groups = ShortGroupPolicy::Drop;
        }
        if self.fallback_unseen {
            config.unseen_types = UnseenTypePolicy::MajorityFallback;
        }
        if self.no_homogeneity_check {
            config.check_homogeneity = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub train: TrainArgs,

    /// Test CSV
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// Directory for the comparison plot and series CSV
    #[arg(long)]
    pub plot_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl EvaluateArgs {
    /// Full pipeline configuration for this invocation.
    ///
    /// # Errors
    ///
    /// See [`TrainArgs::resolve`].
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = self.train.resolve()?;
        if let Some(path) = &self.test {
            config.test_path = path.clone();
        }
        if let Some(dir) = &self.plot_dir {
            config.plot_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub train: TrainArgs,

    /// Matrix type code (0-4)
    #[arg(long = "type", value_parser = clap::value_parser!(u32).range(0..=4))]
    pub matrix_type: u32,

    /// Matrix dimension
    #[arg(long)]
    pub dimension: u32,

    /// Number of selected elements
    #[arg(long)]
    pub top_n: u32,
}

impl PredictArgs {
    /// Configuration to classify.
    ///
    /// # Errors
    ///
    /// [`TopnError::InvalidConfig`] for an unknown type code.
    pub fn feature_row(&self) -> Result<FeatureRow> {
        let matrix_type = MatrixType::from_code(self.matrix_type)
            .ok_or_else(|| TopnError::invalid_config("type", self.matrix_type, "0..=4"))?;
        Ok(FeatureRow::new(matrix_type, self.dimension, self.top_n))
    }
}

#[derive(Args, Debug)]
pub struct CurvesArgs {
    /// Measurements CSV
    #[arg(long)]
    pub data: PathBuf,

    /// Output SVG
    #[arg(short, long, default_value = "exec_time_curves.svg")]
    pub out: PathBuf,

    /// Resampling points per curve
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,

    /// YAML configuration file supplying `method_names`
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CurvesArgs {
    /// Legend names: from the config file when given, else the benchmark
    /// defaults.
    ///
    /// # Errors
    ///
    /// Config file errors.
    pub fn method_names(&self) -> Result<MethodNames> {
        match &self.config {
            Some(path) => Ok(PipelineConfig::from_yaml_file(path)?.method_names),
            None => Ok(MethodNames::benchmark_defaults()),
        }
    }
}
