//! Core compute primitives.
//!
//! Feature tables are handed to the tree learners as a row-major
//! [`Matrix`].

mod matrix;

pub use matrix::Matrix;
