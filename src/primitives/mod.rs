//! Core compute primitives (Vector, Matrix).
//!
//! Row-major, `f64` for all numerical work in the pipeline.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
