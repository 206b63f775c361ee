//! Error types for the benchmark analysis pipeline.
//!
//! Every stage reports failures through [`TopnError`]. All variants are
//! fatal for the current run: the pipeline is one-shot and never retries
//! or returns partial results.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TopnError>;

/// Main error type for the top-N advisor.
///
/// # Examples
///
/// ```
/// use aprender_topn::error::TopnError;
///
/// let err = TopnError::Alignment { expected: 6, actual: 4 };
/// assert!(err.to_string().contains("alignment"));
/// ```
#[derive(Error, Debug)]
pub enum TopnError {
    /// Input CSV not found or unreadable.
    #[error("Input file not found or unreadable: {path}: {reason}")]
    MissingFile {
        /// Offending path
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Missing column, unparsable value or out-of-domain value.
    #[error("Schema error at line {line}, column '{column}': {message}")]
    Schema {
        /// 1-based line number (1 is the header)
        line: usize,
        /// Column name
        column: String,
        /// What went wrong
        message: String,
    },

    /// Dataset or vector has no rows where at least one is required.
    #[error("Empty data: {context}")]
    EmptyData {
        /// Where the empty input was found
        context: String,
    },

    /// Invalid configuration or hyperparameter value.
    #[error("Invalid configuration: {param} = {value}, expected {constraint}")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Row count does not split into whole groups.
    #[error("Grouping error: {rows} rows leave a short final group of {remainder} (group size {group_size})")]
    Grouping {
        /// Total number of rows
        rows: usize,
        /// Group size in use
        group_size: usize,
        /// Rows in the short final group
        remainder: usize,
    },

    /// Rows in one positional group do not share (Type, Dimension, topN).
    #[error("Group {group} is not homogeneous: row {row} has {found}, group starts with {expected}")]
    HeterogeneousGroup {
        /// Group index
        group: usize,
        /// Absolute row index of the first mismatching row
        row: usize,
        /// Configuration of the group's first row
        expected: String,
        /// Configuration of the mismatching row
        found: String,
    },

    /// Repeated predictions do not line up with the row-level dataset.
    #[error("Prediction alignment error: expected {expected} row-level predictions, got {actual}")]
    Alignment {
        /// Dataset row count
        expected: usize,
        /// Repeated prediction count
        actual: usize,
    },

    /// No dataset row matches a predicted configuration.
    #[error("Lookup error: no row for type {matrix_type}, dimension {dimension}, topN {top_n}, method {method}")]
    Lookup {
        /// Matrix type name
        matrix_type: String,
        /// Dimension
        dimension: u32,
        /// topN
        top_n: u32,
        /// Predicted method id
        method: u32,
    },

    /// Prediction requested for a matrix type absent from training.
    #[error("Unseen category: matrix type '{matrix_type}' was not present in the training data")]
    UnseenCategory {
        /// Matrix type name
        matrix_type: String,
    },

    /// Model used before `fit`.
    #[error("Model not fitted: call fit() before {operation}")]
    NotFitted {
        /// Operation that required a fitted model
        operation: String,
    },

    /// Mismatched lengths or shapes.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected size description
        expected: String,
        /// Actual size description
        actual: String,
    },

    /// I/O error while writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Low-level CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialisation error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plot rendering failed.
    #[error("Plot error: {0}")]
    Plot(String),
}

impl TopnError {
    /// Shorthand for a schema error.
    pub fn schema(line: usize, column: &str, message: impl Into<String>) -> Self {
        Self::Schema {
            line,
            column: column.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for an invalid configuration value.
    pub fn invalid_config(
        param: &str,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Process exit code for this error class.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig { .. } | Self::Yaml(_) => 2,
            Self::MissingFile { .. } | Self::Io(_) => 3,
            Self::Schema { .. } | Self::Csv(_) | Self::EmptyData { .. } => 4,
            Self::Grouping { .. }
            | Self::HeterogeneousGroup { .. }
            | Self::Alignment { .. }
            | Self::Lookup { .. }
            | Self::DimensionMismatch { .. } => 5,
            Self::UnseenCategory { .. } | Self::NotFitted { .. } => 6,
            Self::Json(_) | Self::Plot(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_display() {
        let err = TopnError::schema(3, "ExecTime", "not a number");
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("ExecTime"));
    }

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let missing = TopnError::MissingFile {
            path: PathBuf::from("x.csv"),
            reason: "gone".into(),
        };
        let align = TopnError::Alignment {
            expected: 6,
            actual: 4,
        };
        let unseen = TopnError::UnseenCategory {
            matrix_type: "Uniform Distribution".into(),
        };
        assert_eq!(missing.exit_code(), 3);
        assert_eq!(align.exit_code(), 5);
        assert_eq!(unseen.exit_code(), 6);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err: TopnError = io.into();
        assert!(matches!(err, TopnError::Io(_)));
        assert_eq!(err.exit_code(), 3);
    }
}
