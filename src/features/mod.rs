//! Feature and label extraction from labeled groups.

use crate::data::{ConfigKey, MatrixType, MethodId};
use crate::grouping::GroupedDataset;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Number of encoded features per row: type code, dimension, topN.
pub const N_FEATURES: usize = 3;

/// Feature names in encoding order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = ["Type", "Dimension", "topN"];

/// Classifier input: the configuration of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Matrix generation strategy
    pub matrix_type: MatrixType,
    /// Matrix dimension
    pub dimension: u32,
    /// Number of selected elements
    pub top_n: u32,
}

impl FeatureRow {
    /// Creates a feature row.
    #[must_use]
    pub fn new(matrix_type: MatrixType, dimension: u32, top_n: u32) -> Self {
        Self {
            matrix_type,
            dimension,
            top_n,
        }
    }

    /// Numeric encoding `[type_code, dimension, top_n]`.
    ///
    /// The type code is treated as ordinal by the trees; with only five
    /// codes every category remains reachable through threshold splits.
    #[must_use]
    pub fn to_features(&self) -> [f32; N_FEATURES] {
        [
            self.matrix_type.code() as f32,
            self.dimension as f32,
            self.top_n as f32,
        ]
    }
}

impl From<ConfigKey> for FeatureRow {
    fn from(key: ConfigKey) -> Self {
        Self::new(key.matrix_type, key.dimension, key.top_n)
    }
}

/// Parallel feature rows and best-method labels, one pair per group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
    labels: Vec<MethodId>,
}

impl FeatureTable {
    /// Takes the configuration and method of each group's fastest row.
    #[must_use]
    pub fn from_groups(grouped: &GroupedDataset) -> Self {
        let (rows, labels) = grouped
            .best_rows()
            .map(|m| (FeatureRow::from(m.key()), m.method))
            .unzip();
        Self { rows, labels }
    }

    /// Builds a table from explicit pairs.
    ///
    /// # Panics
    ///
    /// Panics if `rows` and `labels` differ in length.
    #[must_use]
    pub fn from_parts(rows: Vec<FeatureRow>, labels: Vec<MethodId>) -> Self {
        assert_eq!(rows.len(), labels.len(), "rows and labels must align");
        Self { rows, labels }
    }

    /// Feature rows in group order.
    #[must_use]
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Labels in group order.
    #[must_use]
    pub fn labels(&self) -> &[MethodId] {
        &self.labels
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Labels as class indices.
    #[must_use]
    pub fn class_labels(&self) -> Vec<usize> {
        self.labels.iter().map(|m| m.class_index()).collect()
    }

    /// Encodes all rows into an `n_groups × 3` matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f32> {
        encode_rows(&self.rows)
    }
}

/// Encodes feature rows into a row-major matrix.
#[must_use]
pub fn encode_rows(rows: &[FeatureRow]) -> Matrix<f32> {
    let encoded: Vec<[f32; N_FEATURES]> = rows.iter().map(FeatureRow::to_features).collect();
    Matrix::from_arrays(&encoded)
}
