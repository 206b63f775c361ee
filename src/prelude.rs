//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use aprender_topn::prelude::*;
//! ```

pub use crate::classifier::{ForestAdvisor, UnseenTypePolicy};
pub use crate::data::{load_csv, Dataset, MatrixType, Measurement, MethodId, MethodNames};
pub use crate::error::{Result, TopnError};
pub use crate::evaluate::{annotate, repeat_predictions, Evaluation};
pub use crate::features::{FeatureRow, FeatureTable};
pub use crate::grouping::{Grouper, ShortGroupPolicy};
pub use crate::primitives::Matrix;
pub use crate::traits::Classifier;
