//! Positional grouping and best-algorithm labeling.
//!
//! Rows are partitioned into consecutive groups of `group_size`
//! measurements, each a head-to-head comparison of algorithm variants on
//! one configuration. For every group the fastest row is found with a
//! stable argmin (ties go to the earliest row) and recorded in two
//! encodings:
//!
//! - `best_offset`: position of the fastest row inside its group,
//! - `best_method`: the absolute `IDMethod` of that row (the class label).
//!
//! # Example
//!
//! ```
//! use aprender_topn::data::{Dataset, Measurement, MethodId};
//! use aprender_topn::grouping::Grouper;
//!
//! let data = Dataset::from_measurements("demo", vec![
//!     Measurement::new(0, 10, 5, 0, 2.0),
//!     Measurement::new(0, 10, 5, 1, 1.0),
//! ]);
//! let grouped = Grouper::new(2).label(&data).expect("whole groups");
//! assert_eq!(grouped.labels()[0].best_method, MethodId(1));
//! assert_eq!(grouped.labels()[0].best_offset, 1);
//! ```

use crate::data::{Dataset, MatrixType, Measurement, MethodId};
use crate::error::{Result, TopnError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do with a trailing group shorter than `group_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortGroupPolicy {
    /// Fail with [`TopnError::Grouping`].
    #[default]
    Reject,
    /// Discard the trailing rows and continue with the truncated dataset.
    Drop,
}

/// Per-group best-algorithm label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupLabel {
    /// Group index (`row / group_size`)
    pub group: usize,
    /// Absolute row index of the fastest measurement
    pub best_row: usize,
    /// Offset of the fastest measurement inside the group
    pub best_offset: usize,
    /// Method of the fastest measurement
    pub best_method: MethodId,
    /// Execution time of the fastest measurement
    pub best_time: f64,
}

/// Splits a dataset into positional groups and labels each one.
#[derive(Debug, Clone, Copy)]
pub struct Grouper {
    group_size: usize,
    short_groups: ShortGroupPolicy,
    check_homogeneity: bool,
}

impl Grouper {
    /// Creates a grouper rejecting short groups and checking homogeneity.
    #[must_use]
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size,
            short_groups: ShortGroupPolicy::Reject,
            check_homogeneity: true,
        }
    }

    /// Sets the short final group policy.
    #[must_use]
    pub fn with_short_group_policy(mut self, policy: ShortGroupPolicy) -> Self {
        self.short_groups = policy;
        self
    }

    /// Enables or disables the homogeneity check.
    #[must_use]
    pub fn with_homogeneity_check(mut self, enabled: bool) -> Self {
        self.check_homogeneity = enabled;
        self
    }

    /// Group size in use.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Partitions `dataset` and labels every group.
    ///
    /// # Errors
    ///
    /// - [`TopnError::InvalidConfig`] if `group_size` is zero
    /// - [`TopnError::EmptyData`] if no whole group exists
    /// - [`TopnError::Grouping`] for a short final group under `Reject`
    /// - [`TopnError::HeterogeneousGroup`] if the homogeneity check fails
    pub fn label(&self, dataset: &Dataset) -> Result<GroupedDataset> {
        let g = self.group_size;
        if g == 0 {
            return Err(TopnError::invalid_config("group_size", 0, ">= 1"));
        }

        let remainder = dataset.len() % g;
        let dataset = if remainder == 0 {
            dataset.clone()
        } else {
            match self.short_groups {
                ShortGroupPolicy::Reject => {
                    return Err(TopnError::Grouping {
                        rows: dataset.len(),
                        group_size: g,
                        remainder,
                    });
                }
                ShortGroupPolicy::Drop => {
                    warn!(
                        "{}: dropping {remainder} trailing rows that do not fill a group of {g}",
                        dataset.label()
                    );
                    dataset.truncated(dataset.len() - remainder)
                }
            }
        };

        if dataset.is_empty() {
            return Err(TopnError::EmptyData {
                context: format!("{}: no complete group of {g} rows", dataset.label()),
            });
        }

        let mut labels = Vec::with_capacity(dataset.len() / g);
        for (group, chunk) in dataset.rows().chunks_exact(g).enumerate() {
            if self.check_homogeneity {
                check_group(group, g, chunk)?;
            }
            let label = label_group(group, g, chunk);
            debug!(
                "group {group}: best offset {} method {} time {}",
                label.best_offset, label.best_method, label.best_time
            );
            labels.push(label);
        }

        Ok(GroupedDataset {
            dataset,
            group_size: g,
            labels,
        })
    }
}

fn check_group(group: usize, g: usize, chunk: &[Measurement]) -> Result<()> {
    let expected = chunk[0].key();
    for (offset, m) in chunk.iter().enumerate().skip(1) {
        if m.key() != expected {
            return Err(TopnError::HeterogeneousGroup {
                group,
                row: group * g + offset,
                expected: expected.to_string(),
                found: m.key().to_string(),
            });
        }
    }
    Ok(())
}

/// Stable argmin over a non-empty chunk.
fn label_group(group: usize, g: usize, chunk: &[Measurement]) -> GroupLabel {
    let mut best_offset = 0;
    for (offset, m) in chunk.iter().enumerate().skip(1) {
        if m.exec_time < chunk[best_offset].exec_time {
            best_offset = offset;
        }
    }
    let best_row = group * g + best_offset;
    let best = chunk[best_offset];
    GroupLabel {
        group,
        best_row,
        best_offset: best_row % g,
        best_method: best.method,
        best_time: best.exec_time,
    }
}

/// A dataset together with its per-group labels.
#[derive(Debug, Clone)]
pub struct GroupedDataset {
    dataset: Dataset,
    group_size: usize,
    labels: Vec<GroupLabel>,
}

impl GroupedDataset {
    /// The dataset the labels refer to (truncated under `Drop`).
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Group size used.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// One label per group, in group order.
    #[must_use]
    pub fn labels(&self) -> &[GroupLabel] {
        &self.labels
    }

    /// Number of groups.
    #[must_use]
    pub fn n_groups(&self) -> usize {
        self.labels.len()
    }

    /// Fastest measurement of each group.
    pub fn best_rows(&self) -> impl Iterator<Item = &Measurement> + '_ {
        self.labels
            .iter()
            .map(move |l| &self.dataset.rows()[l.best_row])
    }

    /// `best_offset` broadcast to every row of its group.
    #[must_use]
    pub fn best_offsets_per_row(&self) -> Vec<usize> {
        self.labels
            .iter()
            .flat_map(|l| std::iter::repeat(l.best_offset).take(self.group_size))
            .collect()
    }

    /// Number of groups won by each method, per matrix type.
    #[must_use]
    pub fn win_counts(&self) -> BTreeMap<MatrixType, BTreeMap<MethodId, usize>> {
        let mut wins: BTreeMap<MatrixType, BTreeMap<MethodId, usize>> = BTreeMap::new();
        for m in self.best_rows() {
            *wins
                .entry(m.matrix_type)
                .or_default()
                .entry(m.method)
                .or_insert(0) += 1;
        }
        wins
    }
}

#[cfg(test)]
mod tests;
