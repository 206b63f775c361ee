//! Aprender TopN: picks the fastest top-N selection algorithm for a
//! matrix configuration from benchmark measurements.
//!
//! Benchmark CSVs hold one execution time per `(Type, Dimension, topN,
//! IDMethod)`. Consecutive rows form groups over the same configuration;
//! the fastest method of each group becomes the class label of a random
//! forest whose features are the configuration itself.
//!
//! # Quick Start
//!
//! ```
//! use aprender_topn::prelude::*;
//!
//! let data = Dataset::from_measurements(
//!     "bench",
//!     vec![
//!         Measurement::new(0, 10, 5, 0, 2.0),
//!         Measurement::new(0, 10, 5, 1, 1.0),
//!         Measurement::new(0, 4000, 5, 0, 1.0),
//!         Measurement::new(0, 4000, 5, 1, 3.0),
//!     ],
//! );
//!
//! let grouped = Grouper::new(2).label(&data).unwrap();
//! let table = FeatureTable::from_groups(&grouped);
//! assert_eq!(table.labels(), &[MethodId(1), MethodId(0)]);
//!
//! let mut model = ForestAdvisor::new().with_n_estimators(10);
//! model.fit(&table).unwrap();
//! let predictions = model.predict(table.rows()).unwrap();
//! let eval = Evaluation::compute(&predictions, table.labels(), &MethodNames::default()).unwrap();
//! assert!(eval.accuracy_percent() >= 0.0);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Row-major Matrix
//! - [`data`]: Measurement model and CSV loading
//! - [`grouping`]: Positional groups and best-method labels
//! - [`features`]: Feature rows and encoding
//! - [`tree`]: Decision tree and random forest classifiers
//! - [`classifier`]: Forest-backed advisor behind the [`Classifier`] trait
//! - [`metrics`]: Accuracy, precision/recall/F1, confusion matrix, report
//! - [`evaluate`]: Evaluation and row-level annotation of predictions
//! - [`viz`]: Actual vs predicted execution time plots
//! - [`curves`]: Interpolated execution time curves
//! - [`config`]: YAML pipeline configuration
//! - [`pipeline`]: End-to-end run

pub mod classifier;
pub mod cli;
pub mod config;
pub mod curves;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod grouping;
pub mod metrics;
pub mod pipeline;
pub mod prelude;
pub mod primitives;
pub mod traits;
pub mod tree;
pub mod viz;

pub use error::{Result, TopnError};
pub use primitives::Matrix;
pub use traits::Classifier;
