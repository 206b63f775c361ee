//! Pipeline configuration.
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration. Command line flags are applied on top of the file.

use crate::classifier::UnseenTypePolicy;
use crate::data::MethodNames;
use crate::error::{Result, TopnError};
use crate::grouping::ShortGroupPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one train/evaluate run.
///
/// # Examples
///
/// ```
/// use aprender_topn::config::PipelineConfig;
///
/// let config = PipelineConfig::from_yaml_str("group_size: 4\nseed: 7\n").unwrap();
/// assert_eq!(config.group_size, 4);
/// assert_eq!(config.n_estimators, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Training measurements
    pub train_path: PathBuf,
    /// Held-out measurements
    pub test_path: PathBuf,
    /// Rows per configuration group
    pub group_size: usize,
    /// Trees in the forest
    pub n_estimators: usize,
    /// Maximum tree depth, unlimited when absent
    pub max_depth: Option<usize>,
    /// Base random seed
    pub seed: u64,
    /// Handling of a trailing partial group
    pub short_groups: ShortGroupPolicy,
    /// Handling of matrix types absent from training
    pub unseen_types: UnseenTypePolicy,
    /// Require every row of a group to share (Type, Dimension, topN)
    pub check_homogeneity: bool,
    /// Display names indexed by method id
    pub method_names: MethodNames,
    /// Where to write plots; no plots when absent
    pub plot_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            train_path: PathBuf::from("filtered_matrix_data_test.csv"),
            test_path: PathBuf::from("filtered_matrix_data.csv"),
            group_size: 2,
            n_estimators: 100,
            max_depth: None,
            seed: 42,
            short_groups: ShortGroupPolicy::Reject,
            unseen_types: UnseenTypePolicy::Reject,
            check_homogeneity: true,
            method_names: MethodNames::benchmark_defaults(),
            plot_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML, unknown keys or invalid values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a YAML file.
    ///
    /// # Errors
    ///
    /// [`TopnError::MissingFile`] if the file cannot be read, otherwise as
    /// [`PipelineConfig::from_yaml_str`].
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TopnError::MissingFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`TopnError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            return Err(TopnError::invalid_config("group_size", 0, ">= 1"));
        }
        if self.n_estimators == 0 {
            return Err(TopnError::invalid_config("n_estimators", 0, ">= 1"));
        }
        Ok(())
    }
}
