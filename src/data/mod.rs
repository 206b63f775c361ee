//! Benchmark measurement data model and CSV loading.
//!
//! A [`Dataset`] is an ordered list of [`Measurement`]s, one per CSV row.
//! Row order matters: the grouper partitions rows by position.

mod loader;

pub use loader::{load_csv, CsvLoader, REQUIRED_COLUMNS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the benchmarked matrix/image was generated.
///
/// Encoded in the CSV `Type` column as `0..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixType {
    /// Uniformly random values (code 0)
    Random,
    /// Values sorted ascending (code 1)
    SortedAscending,
    /// Values sorted descending (code 2)
    SortedDescending,
    /// Values drawn from a specific distribution (code 3)
    SpecificDistribution,
    /// Uniform distribution (code 4)
    Uniform,
}

impl MatrixType {
    /// All known types in code order.
    pub const ALL: [MatrixType; 5] = [
        MatrixType::Random,
        MatrixType::SortedAscending,
        MatrixType::SortedDescending,
        MatrixType::SpecificDistribution,
        MatrixType::Uniform,
    ];

    /// Decodes the CSV code.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// CSV code of this type.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            MatrixType::Random => 0,
            MatrixType::SortedAscending => 1,
            MatrixType::SortedDescending => 2,
            MatrixType::SpecificDistribution => 3,
            MatrixType::Uniform => 4,
        }
    }

    /// Human readable name used in reports and plot titles.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MatrixType::Random => "Random Matrix",
            MatrixType::SortedAscending => "Sorted Ascending",
            MatrixType::SortedDescending => "Sorted Descending",
            MatrixType::SpecificDistribution => "With Specific Distribution",
            MatrixType::Uniform => "Uniform Distribution",
        }
    }
}

impl fmt::Display for MatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a benchmarked algorithm variant (CSV `IDMethod`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct MethodId(pub u32);

impl MethodId {
    /// Class label handed to the tree learners and metrics.
    ///
    /// Ids are categorical and may be sparse; the learners encode them
    /// densely themselves.
    #[must_use]
    pub fn class_index(self) -> usize {
        self.0 as usize
    }

    /// Inverse of [`MethodId::class_index`].
    #[must_use]
    pub fn from_class_index(idx: usize) -> Self {
        Self(idx as u32)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display names for method ids.
///
/// Ids without an entry render as `Algorithm <id>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodNames(pub Vec<String>);

impl MethodNames {
    /// Names of the image processing variants benchmarked so far.
    #[must_use]
    pub fn benchmark_defaults() -> Self {
        Self(
            [
                "processImageHeapBest",
                "processImageParallelV512",
                "processImageCS",
                "processImageSet",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        )
    }

    /// Name for `id`.
    #[must_use]
    pub fn name(&self, id: MethodId) -> String {
        self.0
            .get(id.class_index())
            .cloned()
            .unwrap_or_else(|| format!("Algorithm {id}"))
    }
}

/// The configuration a measurement was taken for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConfigKey {
    /// Matrix generation strategy
    pub matrix_type: MatrixType,
    /// Matrix dimension
    pub dimension: u32,
    /// Number of top elements selected
    pub top_n: u32,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(type={}, dimension={}, topN={})",
            self.matrix_type.code(),
            self.dimension,
            self.top_n
        )
    }
}

/// One benchmark row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Matrix generation strategy (`Type`)
    pub matrix_type: MatrixType,
    /// Matrix dimension (`Dimension`)
    pub dimension: u32,
    /// Number of selected elements (`topN`)
    pub top_n: u32,
    /// Algorithm variant (`IDMethod`)
    pub method: MethodId,
    /// Measured execution time (`ExecTime`)
    pub exec_time: f64,
}

impl Measurement {
    /// Convenience constructor taking raw codes.
    ///
    /// # Panics
    ///
    /// Panics if `type_code` is not a known [`MatrixType`] code.
    #[must_use]
    pub fn new(type_code: u32, dimension: u32, top_n: u32, method: u32, exec_time: f64) -> Self {
        Self {
            matrix_type: MatrixType::from_code(type_code).expect("known matrix type code"),
            dimension,
            top_n,
            method: MethodId(method),
            exec_time,
        }
    }

    /// Configuration key (everything but the method and time).
    #[must_use]
    pub fn key(&self) -> ConfigKey {
        ConfigKey {
            matrix_type: self.matrix_type,
            dimension: self.dimension,
            top_n: self.top_n,
        }
    }

    /// Plot abscissa used by the comparison figures.
    #[must_use]
    pub fn size_index(&self) -> u64 {
        u64::from(self.dimension) + u64::from(self.top_n)
    }
}

/// An ordered, immutable collection of measurements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    label: String,
    rows: Vec<Measurement>,
}

impl Dataset {
    /// Wraps in-memory measurements.
    #[must_use]
    pub fn from_measurements(label: impl Into<String>, rows: Vec<Measurement>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }

    /// Source label (usually the file path).
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// All rows in source order.
    #[must_use]
    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps only the first `len` rows.
    #[must_use]
    pub fn truncated(&self, len: usize) -> Self {
        Self {
            label: self.label.clone(),
            rows: self.rows[..len.min(self.rows.len())].to_vec(),
        }
    }

    /// First row matching the configuration and method, in row order.
    #[must_use]
    pub fn find(&self, key: ConfigKey, method: MethodId) -> Option<&Measurement> {
        self.rows
            .iter()
            .find(|m| m.method == method && m.key() == key)
    }

    /// Distinct matrix types, sorted.
    #[must_use]
    pub fn matrix_types(&self) -> Vec<MatrixType> {
        let mut types: Vec<MatrixType> = self.rows.iter().map(|m| m.matrix_type).collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    /// Distinct method ids, sorted.
    #[must_use]
    pub fn methods(&self) -> Vec<MethodId> {
        let mut methods: Vec<MethodId> = self.rows.iter().map(|m| m.method).collect();
        methods.sort_unstable();
        methods.dedup();
        methods
    }
}

#[cfg(test)]
mod tests;
